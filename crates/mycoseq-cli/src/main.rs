//! mycoseq CLI - Main entry point

use clap::Parser;
use mycoseq_cli::{commands, Cli, Commands, ConfigCommand};
use mycoseq_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    // Credentials may live in a .env file next to the data
    let dotenv = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // Ensure a command is provided
    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    // Verbose mode raises console logging to debug; environment wins either way
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("mycoseq")
        .build();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging, so initialization errors are ignored
    let _ = init_logging(&log_config);

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {},
        Err(e) => debug!(error = %e, "Could not load .env file"),
    }

    // Execute command
    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> mycoseq_cli::Result<()> {
    let Some(ref command) = cli.command else {
        unreachable!("Command should have been validated in main");
    };

    let config = cli.config()?;

    match command {
        Commands::Print {
            fasta_file,
            positions,
        } => commands::print::run(fasta_file, positions).await,

        Commands::Filter {
            fasta_file,
            length,
            output,
        } => commands::filter::run(fasta_file, *length, output.as_deref()).await,

        Commands::Inat {
            taxon_id,
            output,
            per_page,
            max_pages,
            delay,
        } => {
            let options = commands::inat::InatOptions {
                taxon_id: taxon_id.clone(),
                output: output.clone(),
                per_page: *per_page,
                max_pages: *max_pages,
                delay_secs: *delay,
            };
            commands::inat::run(&config, options).await
        },

        Commands::Genbank {
            taxon_name,
            output,
            type_only,
            yes,
            batch_size,
        } => {
            let options = commands::genbank::GenbankOptions {
                taxon_name: taxon_name.clone(),
                output: output.clone(),
                type_only: *type_only,
                assume_yes: *yes,
                batch_size: *batch_size,
            };
            commands::genbank::run(&config, options).await
        },

        Commands::CurrentName {
            species_list,
            exclude,
            batch_size,
            output,
            excluded_output,
        } => {
            let options = commands::current_name::CurrentNameOptions {
                species_list: species_list.clone(),
                exclude: exclude.clone(),
                batch_size: *batch_size,
                output: output.clone(),
                excluded_output: excluded_output.clone(),
            };
            commands::current_name::run(&config, options).await
        },

        Commands::Config { command } => match command {
            ConfigCommand::Get { key } => commands::config::get(&config, key).await,
            ConfigCommand::Show { json } => commands::config::show(&config, *json).await,
        },
    }
}
