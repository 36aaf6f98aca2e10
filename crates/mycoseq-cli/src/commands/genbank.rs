//! `mycoseq genbank` command implementation
//!
//! Searches the nucleotide database for ITS sequences of a taxon, downloads
//! them as FASTA and renames each record to `Genus_species_accession_geo`.

use crate::api::{endpoints, EntrezClient};
use crate::commands::ensure_parent_dir;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::progress::create_spinner;
use colored::Colorize;
use mycoseq_common::fasta::{parse_fasta_str, write_fasta_file};
use mycoseq_common::genbank::{
    extract_geo, normalize_geo, parse_accession, reformat_header, split_flatfile_records,
    UNKNOWN_GEO,
};
use mycoseq_common::FastaRecord;
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result counts above this ask for confirmation first
pub const CONFIRM_THRESHOLD: u64 = 1000;

/// Options for `mycoseq genbank`
#[derive(Debug, Clone)]
pub struct GenbankOptions {
    pub taxon_name: String,
    pub output: Option<PathBuf>,
    pub type_only: bool,
    pub assume_yes: bool,
    pub batch_size: usize,
}

/// Download and rename ITS sequences for a taxon
pub async fn run(config: &Config, options: GenbankOptions) -> Result<()> {
    let mut client = EntrezClient::from_config(config)?;
    let query = endpoints::entrez_its_query(&options.taxon_name, options.type_only);

    println!("Searching GenBank for '{}'...", options.taxon_name.bold());
    debug!(query = %query, "Entrez query");

    let count = client.count(&query).await?;
    println!("Found {} sequences.", count);

    if count == 0 {
        return Err(CliError::NoSequences(query));
    }
    if count > CONFIRM_THRESHOLD && !options.assume_yes {
        confirm_large_download(count)?;
    }

    let ids = client.search_ids(&query, count).await?;

    let spinner = create_spinner(&format!("Fetching {} sequences...", ids.len()));
    let fasta = client.fetch_fasta(&ids).await;
    spinner.finish_and_clear();
    let records = parse_fasta_str(&fasta?)?;
    println!("Fetched {} sequences.", records.len());

    let accessions: Vec<String> = records
        .iter()
        .map(|r| parse_accession(r.id()).to_string())
        .collect();

    let spinner = create_spinner("Fetching locality metadata...");
    let geo = fetch_geo_metadata(&mut client, &accessions, options.batch_size).await;
    spinner.finish_and_clear();

    let renamed = rename_records(records, &geo);

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&options.taxon_name));
    ensure_parent_dir(&output)?;
    let written = write_fasta_file(&output, &renamed)?;

    let shown = output.canonicalize().unwrap_or_else(|_| output.clone());
    println!(
        "{} {} sequences written to {}",
        "✓".green(),
        written,
        shown.display()
    );

    info!(
        taxon = %options.taxon_name,
        type_only = options.type_only,
        sequences = written,
        output = %output.display(),
        "GenBank download complete"
    );

    Ok(())
}

/// Ask before downloading a large result set
///
/// Without an interactive terminal the download is refused; pass `--yes`.
fn confirm_large_download(count: u64) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Aborted(format!(
            "{} sequences found and no terminal to confirm; re-run with --yes",
            count
        )));
    }

    let proceed = inquire::Confirm::new(&format!(
        "Downloading {} sequences may take a while. Continue?",
        count
    ))
    .with_default(false)
    .prompt()
    .map_err(|e| CliError::Aborted(e.to_string()))?;

    if proceed {
        Ok(())
    } else {
        Err(CliError::Aborted("download declined".to_string()))
    }
}

/// `<taxon>_ITS_genbank.fasta` with spaces as underscores
pub fn default_output_path(taxon_name: &str) -> PathBuf {
    PathBuf::from(format!("{}_ITS_genbank.fasta", taxon_name.trim().replace(' ', "_")))
}

/// Locality of each accession, fetched in batches of GenBank records
///
/// A failed batch maps all of its accessions to `NA`.
pub async fn fetch_geo_metadata(
    client: &mut EntrezClient,
    accessions: &[String],
    batch_size: usize,
) -> HashMap<String, String> {
    let mut geo = HashMap::new();

    for batch in accessions.chunks(batch_size.max(1)) {
        match client.fetch_genbank(batch).await {
            Ok(text) => geo.extend(geo_from_flatfile(&text, batch)),
            Err(e) => {
                warn!(first = %batch[0], size = batch.len(), error = %e, "GenBank batch failed");
                eprintln!(
                    "{} Could not fetch metadata for {} accessions starting at {}: {}",
                    "warning:".yellow(),
                    batch.len(),
                    batch[0],
                    e
                );
                geo.extend(batch.iter().map(|acc| (acc.clone(), UNKNOWN_GEO.to_string())));
            },
        }
    }

    geo
}

/// Normalized locality for each requested accession in a flat-file batch
pub fn geo_from_flatfile(text: &str, accessions: &[String]) -> HashMap<String, String> {
    let found: HashMap<String, String> = split_flatfile_records(text)
        .into_iter()
        .map(|(acc, record)| {
            let geo = extract_geo(&record)
                .map(|raw| normalize_geo(&raw))
                .unwrap_or_else(|| UNKNOWN_GEO.to_string());
            (acc, geo)
        })
        .collect();

    accessions
        .iter()
        .map(|acc| {
            let geo = found
                .get(acc)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_GEO.to_string());
            (acc.clone(), geo)
        })
        .collect()
}

/// Replace each header with `Genus_species_accession_geo`
pub fn rename_records(records: Vec<FastaRecord>, geo: &HashMap<String, String>) -> Vec<FastaRecord> {
    records
        .into_iter()
        .map(|record| {
            let accession = parse_accession(record.id()).to_string();
            let place = geo.get(&accession).map(String::as_str).unwrap_or(UNKNOWN_GEO);
            let header = reformat_header(&record.header, &accession, place);
            FastaRecord::new(header, record.sequence)
        })
        .collect()
}
