//! `mycoseq current-name` command implementation
//!
//! Looks up each species of a list in MycoBank and reports whether the name
//! is current, and if not, what the current name is.

use crate::api::{endpoints, MycoBankClient, TaxonName};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::progress::create_progress_bar;
use crate::report::{read_list, write_tsv};
use colored::Colorize;
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Substrings marking a provisional or uncertain name
pub const AMBIGUOUS_MARKERS: [&str; 5] = ["[", "]", "sp.", "cf.", "aff."];

/// Options for `mycoseq current-name`
#[derive(Debug, Clone)]
pub struct CurrentNameOptions {
    pub species_list: PathBuf,
    pub exclude: Option<PathBuf>,
    pub batch_size: usize,
    pub output: PathBuf,
    pub excluded_output: PathBuf,
}

/// Outcome of a lookup, as written to the results TSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStatus {
    Current,
    NotCurrent,
    NoRecords,
    NoValid,
    NoCurrent,
    MultipleRecords,
    Error,
}

impl NameStatus {
    /// All statuses in summary order
    pub const ALL: [NameStatus; 7] = [
        NameStatus::Current,
        NameStatus::NotCurrent,
        NameStatus::NoRecords,
        NameStatus::NoValid,
        NameStatus::NoCurrent,
        NameStatus::MultipleRecords,
        NameStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NameStatus::Current => "current",
            NameStatus::NotCurrent => "not_current",
            NameStatus::NoRecords => "no_records",
            NameStatus::NoValid => "no_valid",
            NameStatus::NoCurrent => "no_current",
            NameStatus::MultipleRecords => "multiple_records",
            NameStatus::Error => "error",
        }
    }
}

/// Why a species was left out of the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    UserExcluded,
    Ambiguous,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::UserExcluded => "user_excluded",
            ExclusionReason::Ambiguous => "ambiguous",
        }
    }
}

/// Row of the excluded species TSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedSpecies {
    pub species: String,
    pub reason: ExclusionReason,
}

/// Row of the results TSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameResult {
    pub species_query: String,
    pub status: NameStatus,
    pub current_name: String,
}

impl NameResult {
    fn new(species: &str, status: NameStatus, current_name: Option<String>) -> Self {
        Self {
            species_query: species.to_string(),
            status,
            current_name: current_name.unwrap_or_else(|| "NA".to_string()),
        }
    }
}

/// What the search results say about one species
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Final answer without further requests
    Done(NameStatus, Option<String>),

    /// The name is a synonym; the current name record must be fetched
    Synonym { current_name_id: i64 },

    /// Several records point at different current names
    Ambiguous(Vec<TaxonName>),
}

/// Split a species list into names to query and excluded names
pub fn partition_species(
    species: &[String],
    user_excluded: &[String],
) -> (Vec<String>, Vec<ExcludedSpecies>) {
    let mut to_check = Vec::new();
    let mut excluded = Vec::new();

    for sp in species {
        let reason = if user_excluded.contains(sp) {
            Some(ExclusionReason::UserExcluded)
        } else if AMBIGUOUS_MARKERS.iter().any(|m| sp.contains(m)) {
            Some(ExclusionReason::Ambiguous)
        } else {
            None
        };

        match reason {
            Some(reason) => excluded.push(ExcludedSpecies {
                species: sp.clone(),
                reason,
            }),
            None => to_check.push(sp.clone()),
        }
    }

    (to_check, excluded)
}

/// Decide the status of a species from the items of its batch search
pub fn resolve(species: &str, items: &[TaxonName]) -> Resolution {
    let wanted = species.trim().to_lowercase();

    let candidates: Vec<&TaxonName> = items
        .iter()
        .filter(|item| {
            item.id.is_some() && item.name.trim().to_lowercase() == wanted && item.is_acceptable()
        })
        .collect();

    let Some(first) = candidates.first() else {
        let filtered_out = items.iter().any(|item| item.name.to_lowercase() == wanted);
        let status = if filtered_out {
            NameStatus::NoValid
        } else {
            NameStatus::NoRecords
        };
        return Resolution::Done(status, None);
    };

    if candidates
        .iter()
        .any(|item| item.current_name_id() != first.current_name_id())
    {
        return Resolution::Ambiguous(candidates.into_iter().cloned().collect());
    }

    match first.current_name_id() {
        None => Resolution::Done(NameStatus::NoCurrent, None),
        Some(current) if Some(current) == first.id => {
            Resolution::Done(NameStatus::Current, Some(first.name.clone()))
        },
        Some(current) => Resolution::Synonym {
            current_name_id: current,
        },
    }
}

/// Counts shown in the final summary
#[derive(Debug, Default)]
pub struct Summary {
    pub total_input: usize,
    pub excluded_user: usize,
    pub excluded_ambiguous: usize,
    pub queried: usize,
    pub statuses: HashMap<NameStatus, usize>,
}

impl Summary {
    pub fn count(&self, status: NameStatus) -> usize {
        self.statuses.get(&status).copied().unwrap_or(0)
    }

    fn print(&self) {
        println!();
        println!("{}", "=========== FINAL SUMMARY ===========".cyan().bold());
        println!("{:<34}{}", "Total species in input file:", self.total_input);
        println!("{:<34}{}", "Excluded (user list):", self.excluded_user);
        println!("{:<34}{}", "Excluded (ambiguous):", self.excluded_ambiguous);
        println!("{:<34}{}", "Queried:", self.queried);
        println!();
        println!("Query Results:");
        for status in NameStatus::ALL {
            println!("{:>20}: {}", status.as_str(), self.count(status));
        }
        println!("{}", "=====================================".cyan().bold());
    }
}

/// Resolve current names for a species list
pub async fn run(config: &Config, options: CurrentNameOptions) -> Result<()> {
    let client = MycoBankClient::from_config(config)?;
    let verbose = config.is_verbose();

    let species = read_input_list(&options.species_list)?;
    let user_excluded = match &options.exclude {
        Some(path) => read_input_list(path)?,
        None => Vec::new(),
    };

    let (to_check, excluded) = partition_species(&species, &user_excluded);

    if !excluded.is_empty() {
        write_tsv(&options.excluded_output, &excluded)?;
        if verbose {
            for row in &excluded {
                println!("Skipping '{}' ({})", row.species, row.reason.as_str());
            }
            println!("Excluded species written to {}", options.excluded_output.display());
        }
    }

    let results = query_names(&client, &to_check, options.batch_size, verbose).await;
    write_tsv(&options.output, &results)?;
    println!("Results written to {}", options.output.display());

    let mut summary = Summary {
        total_input: species.len(),
        excluded_user: excluded
            .iter()
            .filter(|e| e.reason == ExclusionReason::UserExcluded)
            .count(),
        excluded_ambiguous: excluded
            .iter()
            .filter(|e| e.reason == ExclusionReason::Ambiguous)
            .count(),
        queried: to_check.len(),
        ..Default::default()
    };
    for result in &results {
        *summary.statuses.entry(result.status).or_insert(0) += 1;
    }
    summary.print();

    info!(
        queried = summary.queried,
        current = summary.count(NameStatus::Current),
        not_current = summary.count(NameStatus::NotCurrent),
        errors = summary.count(NameStatus::Error),
        "MycoBank lookup complete"
    );

    Ok(())
}

/// Print a line above the progress bar, even when the bar is hidden
fn say(pb: &ProgressBar, line: String) {
    pb.suspend(|| println!("{}", line));
}

fn read_input_list(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    read_list(path)
}

/// Query MycoBank batch by batch, one result per species in input order
pub async fn query_names(
    client: &MycoBankClient,
    species: &[String],
    batch_size: usize,
    verbose: bool,
) -> Vec<NameResult> {
    let pb = create_progress_bar(species.len() as u64, "Querying MycoBank");
    let mut results = Vec::with_capacity(species.len());

    for batch in species.chunks(batch_size.max(1)) {
        let items = match client.search_batch(batch).await {
            Ok(items) => items,
            Err(e) => {
                warn!(first = %batch[0], size = batch.len(), error = %e, "MycoBank batch failed");
                say(&pb, format!(
                    "{} Batch starting at '{}' failed: {}",
                    "✗".red(),
                    batch[0],
                    e
                ));
                results.extend(
                    batch
                        .iter()
                        .map(|sp| NameResult::new(sp, NameStatus::Error, None)),
                );
                pb.inc(batch.len() as u64);
                continue;
            },
        };

        for sp in batch {
            let result = match resolve(sp, &items) {
                Resolution::Done(status, name) => NameResult::new(sp, status, name),
                Resolution::Ambiguous(options) => {
                    if verbose {
                        say(&pb, format!("Multiple records found for '{}':", sp));
                        for option in &options {
                            let link = option
                                .mycobank_nr
                                .map(endpoints::mycobank_page_url)
                                .unwrap_or_else(|| "<unknown>".to_string());
                            say(&pb, format!("    {} ({})", option.name, link));
                        }
                    }
                    NameResult::new(sp, NameStatus::MultipleRecords, None)
                },
                Resolution::Synonym { current_name_id } => {
                    match client.get_name(current_name_id).await {
                        Ok(current) => {
                            let name = if current.name.is_empty() {
                                "<unknown>".to_string()
                            } else {
                                current.name
                            };
                            if verbose {
                                let nr = current
                                    .mycobank_nr
                                    .map(|n| n.to_string())
                                    .unwrap_or_else(|| "<unknown>".to_string());
                                say(&pb, format!(
                                    "The current MycoBank name for '{}' is '{}' (MycoBank #{}): {}",
                                    sp,
                                    name,
                                    nr,
                                    endpoints::mycobank_page_url(&nr)
                                ));
                            }
                            NameResult::new(sp, NameStatus::NotCurrent, Some(name))
                        },
                        Err(e) => {
                            warn!(species = %sp, id = current_name_id, error = %e, "Current name lookup failed");
                            NameResult::new(sp, NameStatus::Error, None)
                        },
                    }
                },
            };

            debug!(species = %sp, status = result.status.as_str(), "Resolved");
            if verbose && result.status == NameStatus::Current {
                say(&pb, format!("{} '{}' is the current MycoBank name.", "✓".green(), sp));
            }
            results.push(result);
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::Synonymy;

    fn item(id: i64, name: &str, status: &str, current: Option<i64>) -> TaxonName {
        TaxonName {
            id: Some(id),
            name: name.to_string(),
            name_status: Some(status.to_string()),
            synonymy: Some(Synonymy {
                current_name_id: current,
            }),
            mycobank_nr: Some(100_000 + id),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_partition_species() {
        let species = strings(&[
            "Gyromitra esculenta",
            "Morchella sp.",
            "Helvella [provisional]",
            "Peziza cf. varia",
            "Discina ancilis",
        ]);
        let (to_check, excluded) = partition_species(&species, &strings(&["Discina ancilis"]));

        assert_eq!(to_check, strings(&["Gyromitra esculenta"]));
        assert_eq!(excluded.len(), 4);
        assert_eq!(excluded[0].reason, ExclusionReason::Ambiguous);
        assert_eq!(excluded[3].species, "Discina ancilis");
        assert_eq!(excluded[3].reason, ExclusionReason::UserExcluded);
    }

    #[test]
    fn test_resolve_current() {
        let items = vec![
            item(1, "Gyromitra esculenta", "Legitimate", Some(1)),
            item(2, "Gyromitra esculenta var. alba", "Legitimate", Some(1)),
        ];
        assert_eq!(
            resolve("gyromitra esculenta ", &items),
            Resolution::Done(NameStatus::Current, Some("Gyromitra esculenta".to_string()))
        );
    }

    #[test]
    fn test_resolve_synonym() {
        let items = vec![item(5, "Helvella californica", "Legitimate", Some(9))];
        assert_eq!(
            resolve("Helvella californica", &items),
            Resolution::Synonym { current_name_id: 9 }
        );
    }

    #[test]
    fn test_resolve_no_records_and_no_valid() {
        let items = vec![item(3, "Peziza badia", "Illegitimate", Some(3))];
        assert_eq!(
            resolve("Peziza badia", &items),
            Resolution::Done(NameStatus::NoValid, None)
        );
        assert_eq!(
            resolve("Peziza varia", &items),
            Resolution::Done(NameStatus::NoRecords, None)
        );
    }

    #[test]
    fn test_resolve_skips_incomplete_records() {
        let nameless = item(2, "", "Legitimate", Some(2));
        let without_id = TaxonName {
            id: None,
            ..item(3, "Gyromitra esculenta", "Legitimate", Some(7))
        };
        let items = vec![
            item(1, "Gyromitra esculenta", "Legitimate", Some(1)),
            nameless,
            without_id.clone(),
        ];

        assert_eq!(
            resolve("Gyromitra esculenta", &items),
            Resolution::Done(NameStatus::Current, Some("Gyromitra esculenta".to_string()))
        );
        assert_eq!(
            resolve("Gyromitra esculenta", &[without_id]),
            Resolution::Done(NameStatus::NoValid, None)
        );
    }

    #[test]
    fn test_resolve_multiple_and_no_current() {
        let items = vec![
            item(1, "Discina ancilis", "Legitimate", Some(1)),
            item(2, "Discina ancilis", "Legitimate", Some(7)),
        ];
        assert!(matches!(
            resolve("Discina ancilis", &items),
            Resolution::Ambiguous(options) if options.len() == 2
        ));

        let items = vec![item(4, "Morchella elata", "Legitimate", None)];
        assert_eq!(
            resolve("Morchella elata", &items),
            Resolution::Done(NameStatus::NoCurrent, None)
        );
    }

    #[test]
    fn test_status_serialization() {
        let row = NameResult::new("Peziza varia", NameStatus::MultipleRecords, None);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["status"], "multiple_records");
        assert_eq!(json["current_name"], "NA");
        for status in NameStatus::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
    }
}
