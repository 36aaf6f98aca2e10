//! Cleaning of raw ITS sequence submissions
//!
//! Community-submitted sequences often carry leading primer notes, quality
//! annotations or stray punctuation. Cleaning drops everything before the first
//! convincing stretch of nucleotide codes.

use regex::Regex;
use std::sync::LazyLock;

/// Valid IUPAC nucleotide codes
pub const IUPAC_DNA: &str = "ACGTRYWSMKHBVDN";

/// Shortest stretch of IUPAC codes accepted as the start of real sequence
pub const MIN_VALID_RUN: usize = 20;

#[allow(clippy::expect_used)]
static VALID_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("[{}]{{{},}}", IUPAC_DNA, MIN_VALID_RUN)).expect("valid IUPAC pattern")
});

/// Clean a raw ITS sequence
///
/// Whitespace is removed and the sequence upper-cased, then everything before
/// the first run of at least [`MIN_VALID_RUN`] IUPAC codes is dropped. The
/// remainder is kept as-is. Returns `None` when no such run exists.
pub fn clean_its_sequence(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if compact.is_empty() {
        return None;
    }

    VALID_RUN
        .find(&compact)
        .map(|m| compact[m.start()..].to_string())
}
