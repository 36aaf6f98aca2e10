//! `mycoseq inat` command implementation
//!
//! Downloads every observation of a taxon that carries a `DNA Barcode ITS`
//! field, cleans the sequences and writes them as FASTA plus a metadata TSV.

use crate::api::endpoints::INAT_ITS_FIELD;
use crate::api::{InatClient, Observation, Taxon};
use crate::commands::ensure_parent_dir;
use crate::config::Config;
use crate::error::Result;
use crate::report::write_tsv;
use colored::Colorize;
use mycoseq_common::fasta::write_fasta_file;
use mycoseq_common::sequence::clean_its_sequence;
use mycoseq_common::FastaRecord;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Largest page size the iNaturalist API accepts
pub const MAX_PER_PAGE: u32 = 200;

/// Options for `mycoseq inat`
#[derive(Debug, Clone)]
pub struct InatOptions {
    pub taxon_id: String,
    pub output: PathBuf,
    pub per_page: u32,
    pub max_pages: Option<u32>,
    pub delay_secs: f64,
}

/// One row of the metadata TSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InatMetadata {
    pub header: String,
    pub species: String,
    pub species_rank: String,
    pub country: String,
    pub state: String,
    pub inat_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub observed_on: String,
    pub user: String,
    pub raw_seq_length: usize,
    pub cleaned_seq_length: usize,
}

/// Observations gathered by the page loop
#[derive(Debug, Default)]
pub struct Harvest {
    /// `total_results` as last reported by the API
    pub total: u64,

    /// Observations carrying an ITS field
    pub observations: Vec<Observation>,

    pub pages: u32,
}

/// Download ITS sequences for a taxon
pub async fn run(config: &Config, options: InatOptions) -> Result<()> {
    let per_page = clamp_per_page(options.per_page);
    let delay = Duration::try_from_secs_f64(options.delay_secs).unwrap_or(Duration::ZERO);
    let mut client = InatClient::from_config(config)?;

    println!(
        "Downloading taxon_id={} (per_page={})...",
        options.taxon_id.bold(),
        per_page
    );

    let harvest =
        fetch_observations(&client, &options.taxon_id, per_page, options.max_pages, delay).await;

    println!();
    println!("Total number of observations: {}", harvest.total);
    println!("Observations with ITS sequence data: {}", harvest.observations.len());
    println!();
    println!("Parsing sequences and fetching location information.");

    let (records, metadata) = build_records(&mut client, &harvest.observations).await;

    ensure_parent_dir(&options.output)?;
    let written = write_fasta_file(&options.output, &records)?;
    println!(
        "Wrote {} records to FASTA: {}",
        written.to_string().green(),
        options.output.display()
    );

    let tsv_path = options.output.with_extension("tsv");
    if metadata.is_empty() {
        warn!(taxon_id = %options.taxon_id, "No metadata to write");
        eprintln!("{} No metadata to write.", "warning:".yellow());
    } else {
        write_tsv(&tsv_path, &metadata)?;
        println!("Wrote metadata TSV: {}", tsv_path.display());
    }

    info!(
        taxon_id = %options.taxon_id,
        pages = harvest.pages,
        observations = harvest.observations.len(),
        records = written,
        places = client.cached_places(),
        "iNaturalist download complete"
    );

    Ok(())
}

/// Page size accepted by the API, with a warning when the request was larger
pub fn clamp_per_page(per_page: u32) -> u32 {
    if per_page > MAX_PER_PAGE {
        warn!(requested = per_page, "per_page above API limit, using {}", MAX_PER_PAGE);
        eprintln!(
            "{} per_page > {}; using {} (API limit).",
            "warning:".yellow(),
            MAX_PER_PAGE,
            MAX_PER_PAGE
        );
        MAX_PER_PAGE
    } else {
        per_page.max(1)
    }
}

/// Walk the observation pages of a taxon, keeping those with an ITS field
///
/// Stops after `max_pages` pages, on a short page, or on the first page that
/// fails after retries. Whatever was collected before a failure is kept.
pub async fn fetch_observations(
    client: &InatClient,
    taxon_id: &str,
    per_page: u32,
    max_pages: Option<u32>,
    delay: Duration,
) -> Harvest {
    let mut harvest = Harvest::default();
    let mut page = 1;

    loop {
        let data = match client.observations_page(taxon_id, page, per_page).await {
            Ok(data) => data,
            Err(e) => {
                warn!(taxon_id = %taxon_id, page = page, error = %e, "Page request failed");
                eprintln!("{} An error occurred on page {}: {}", "warning:".yellow(), page, e);
                break;
            },
        };

        harvest.pages += 1;
        harvest.total = data.total_results;
        let returned = data.results.len();

        let with_its: Vec<Observation> = data
            .results
            .into_iter()
            .filter(|obs| obs.has_field(INAT_ITS_FIELD))
            .collect();

        println!(
            "Fetched page {}: {} observations, {} with ITS",
            page,
            returned,
            with_its.len()
        );
        debug!(taxon_id = %taxon_id, page = page, returned = returned, with_its = with_its.len(), "Fetched page");
        harvest.observations.extend(with_its);

        if max_pages.is_some_and(|max| page >= max) {
            println!("Max pages limit reached.");
            break;
        }
        if returned < per_page as usize {
            println!("Last page reached.");
            break;
        }

        page += 1;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    harvest
}

/// Label and normalized rank for a taxon
///
/// Species become `Genus-epithet`, genera `Genus-sp.`, anything else
/// `rank_Name`. A missing taxon is labelled `NA`.
pub fn species_label(taxon: Option<&Taxon>) -> (String, String) {
    let Some(taxon) = taxon else {
        return ("NA".to_string(), "NA".to_string());
    };

    let name = taxon.name.clone().unwrap_or_else(|| "NA".to_string());
    let rank = taxon
        .rank
        .as_deref()
        .map(|r| r.trim().to_lowercase())
        .unwrap_or_else(|| "NA".to_string());

    let label = match rank.as_str() {
        "species" => name.replace(' ', "-"),
        "genus" => format!("{}-sp.", name),
        _ => format!("{}_{}", rank, name),
    };

    (label, rank)
}

/// FASTA header for an observation; spaces become underscores
pub fn observation_header(label: &str, inat_id: &str, country: &str, state: &str) -> String {
    format!("{}_iNat{}_{}-{}", label, inat_id, country, state).replace(' ', "_")
}

/// Turn observations into FASTA records and metadata rows
///
/// Observations whose ITS value holds no valid DNA run are skipped.
pub async fn build_records(
    client: &mut InatClient,
    observations: &[Observation],
) -> (Vec<FastaRecord>, Vec<InatMetadata>) {
    let mut records = Vec::new();
    let mut metadata = Vec::new();

    for obs in observations {
        let Some(raw_seq) = obs.field_value(INAT_ITS_FIELD) else {
            continue;
        };

        let (label, rank) = species_label(obs.taxon.as_ref());
        let inat_id = obs
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "NA".to_string());

        let Some(cleaned) = clean_its_sequence(&raw_seq) else {
            warn!(inat_id = %inat_id, species = %label, "ITS value contains no valid DNA, skipping");
            eprintln!(
                "{} Sequence for {} (iNat{}) contains no valid DNA, skipping.",
                "warning:".yellow(),
                label,
                inat_id
            );
            continue;
        };

        let place_ids = obs.place_ids.as_deref().unwrap_or_default();
        let (country, state) = client.country_state(place_ids).await;
        let (longitude, latitude) = obs.coordinates();

        let header = observation_header(&label, &inat_id, &country, &state);

        metadata.push(InatMetadata {
            header: header.clone(),
            species: label,
            species_rank: rank,
            country,
            state,
            inat_id,
            latitude,
            longitude,
            observed_on: obs.observed_on.clone().unwrap_or_default(),
            user: obs
                .user
                .as_ref()
                .and_then(|u| u.login.clone())
                .unwrap_or_default(),
            raw_seq_length: raw_seq.chars().count(),
            cleaned_seq_length: cleaned.chars().count(),
        });
        records.push(FastaRecord::new(header, cleaned));
    }

    (records, metadata)
}
