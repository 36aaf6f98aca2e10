//! mycoseq CLI Library
//!
//! Glue steps for a fungal ITS phylogenetics workflow. Each subcommand does
//! one job and exits; alignment, trimming and tree inference are left to
//! external tools (mafft, trimal, iqtree).
//!
//! # Overview
//!
//! - **Selection**: Print FASTA records by position (`mycoseq print`)
//! - **Filtering**: Drop short sequences (`mycoseq filter`)
//! - **iNaturalist**: Download ITS barcodes for a taxon (`mycoseq inat`)
//! - **GenBank**: Download ITS sequences via Entrez (`mycoseq genbank`)
//! - **MycoBank**: Resolve current species names (`mycoseq current-name`)
//! - **Configuration**: Inspect effective settings (`mycoseq config`)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod report;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mycoseq - fetch, filter, and print fungal ITS sequences
#[derive(Parser, Debug)]
#[command(name = "mycoseq")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging and per-item details)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// iNaturalist API base URL
    #[arg(
        long,
        env = "INAT_API_URL",
        default_value = config::DEFAULT_INAT_URL,
        global = true,
        hide_env_values = true
    )]
    pub inat_url: String,

    /// MycoBank taxon names API base URL
    #[arg(
        long,
        env = "MYCOBANK_API_URL",
        default_value = config::DEFAULT_MYCOBANK_URL,
        global = true,
        hide_env_values = true
    )]
    pub mycobank_url: String,

    /// NCBI E-utilities base URL
    #[arg(
        long,
        env = "ENTREZ_API_URL",
        default_value = config::DEFAULT_ENTREZ_URL,
        global = true,
        hide_env_values = true
    )]
    pub entrez_url: String,

    /// Print the CLI reference as Markdown and exit
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print sequences from a multi-FASTA file by their position in the file
    Print {
        /// Path to the FASTA file
        fasta_file: PathBuf,

        /// Sequence positions or inclusive ranges (e.g. 1 3 5-7)
        #[arg(required = true, num_args = 1..)]
        positions: Vec<String>,
    },

    /// Remove sequences shorter than a minimum length from a multi-FASTA file
    Filter {
        /// Path to the FASTA file
        fasta_file: PathBuf,

        /// Minimum length of sequences to keep
        length: usize,

        /// Output path (defaults to <input>_length-filtered.fasta)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download ITS sequences for an iNaturalist taxon ID
    Inat {
        /// iNaturalist taxon ID (e.g. 951406 for Pseudorhizina)
        taxon_id: String,

        /// Path to write FASTA output; metadata goes next to it as .tsv
        #[arg(short, long, value_name = "OUTPUT_PATH", default_value = "inat.fasta")]
        output: PathBuf,

        /// Observations requested per page (API maximum 200)
        #[arg(long, alias = "per_page", default_value_t = 200)]
        per_page: u32,

        /// Maximum number of pages to fetch
        #[arg(long, alias = "max_pages")]
        max_pages: Option<u32>,

        /// Delay in seconds between page requests
        #[arg(long, default_value_t = 0.5)]
        delay: f64,
    },

    /// Download ITS sequences for a taxon name from GenBank
    Genbank {
        /// Taxon name (e.g. Pseudorhizina)
        taxon_name: String,

        /// Destination FASTA file (defaults to <taxon>_ITS_genbank.fasta)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only fetch sequences from type material
        #[arg(long, alias = "type_only")]
        type_only: bool,

        /// Do not ask for confirmation before large downloads
        #[arg(short, long)]
        yes: bool,

        /// Accessions per GenBank metadata request
        #[arg(long, default_value_t = 20)]
        batch_size: usize,
    },

    /// Get the current MycoBank name for a list of species
    CurrentName {
        /// Species list file (one species per line)
        species_list: PathBuf,

        /// File of species names to leave out of the query (one per line)
        #[arg(long, value_name = "FILE_PATH")]
        exclude: Option<PathBuf>,

        /// Number of species per API request
        #[arg(long, default_value_t = 20)]
        batch_size: usize,

        /// Path to write the query results TSV
        #[arg(short, long, value_name = "OUTPUT_PATH", default_value = "mycobank_results.tsv")]
        output: PathBuf,

        /// Path to write the excluded species TSV
        #[arg(
            long,
            value_name = "EXCLUDED_OUTPUT_PATH",
            default_value = "excluded_species.tsv"
        )]
        excluded_output: PathBuf,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show all configuration
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Effective configuration: environment first, then command-line overrides
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        config.set_endpoints(&self.inat_url, &self.mycobank_url, &self.entrez_url);
        config.set_verbose(self.verbose);
        Ok(config)
    }
}
