//! GenBank flat-file helpers
//!
//! Only the pieces needed to label downloaded ITS sequences: accession
//! numbers, the collection locality qualifiers, and header rewriting.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static GEO_LOC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"/geo_loc_name="([^"]+)""#).expect("valid geo_loc_name pattern"));

#[allow(clippy::expect_used)]
static COUNTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"/country="([^"]+)""#).expect("valid country pattern"));

const US_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

const CANADA_PROVINCES: &[(&str, &str)] = &[
    ("Alberta", "AB"),
    ("British Columbia", "BC"),
    ("Manitoba", "MB"),
    ("New Brunswick", "NB"),
    ("Newfoundland and Labrador", "NL"),
    ("Nova Scotia", "NS"),
    ("Ontario", "ON"),
    ("Prince Edward Island", "PE"),
    ("Quebec", "QC"),
    ("Saskatchewan", "SK"),
    ("Northwest Territories", "NT"),
    ("Nunavut", "NU"),
    ("Yukon", "YT"),
];

/// Placeholder used wherever locality is unknown
pub const UNKNOWN_GEO: &str = "NA";

/// Postal abbreviation of a US state name
pub fn us_state_abbr(name: &str) -> Option<&'static str> {
    lookup(US_STATES, name)
}

/// Postal abbreviation of a Canadian province or territory name
pub fn canada_province_abbr(name: &str) -> Option<&'static str> {
    lookup(CANADA_PROVINCES, name)
}

fn lookup(table: &[(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    let name = name.trim();
    table
        .iter()
        .find(|(full, _)| *full == name)
        .map(|(_, abbr)| *abbr)
}

/// Accession without its version suffix (`AB123456.1` -> `AB123456`)
pub fn parse_accession(record_id: &str) -> &str {
    record_id.split('.').next().unwrap_or(record_id)
}

/// Split a multi-record GenBank text into `(accession, record text)` pairs
///
/// Records end with a `//` line. Records without an `ACCESSION` line are skipped.
pub fn split_flatfile_records(text: &str) -> Vec<(String, String)> {
    let mut records = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim_end() == "//" {
            push_record(&mut records, &current);
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_record(&mut records, &current);

    records
}

fn push_record(records: &mut Vec<(String, String)>, text: &str) {
    let accession = text.lines().find_map(|line| {
        line.strip_prefix("ACCESSION")
            .and_then(|rest| rest.split_whitespace().next())
    });

    if let Some(acc) = accession {
        records.push((acc.to_string(), text.to_string()));
    }
}

/// Raw collection locality of one record
///
/// `/geo_loc_name` takes priority over the older `/country` qualifier.
/// Qualifier values wrapped over several lines are joined with single spaces.
pub fn extract_geo(record_text: &str) -> Option<String> {
    GEO_LOC_NAME
        .captures(record_text)
        .or_else(|| COUNTRY.captures(record_text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Normalize a locality into the short form used in headers
///
/// US and Canadian localities keep the state or province when it is
/// recognized; everything else keeps the country only.
pub fn normalize_geo(raw: &str) -> String {
    let raw = raw.trim();

    let normalized = if let Some(rest) = raw
        .strip_prefix("USA:")
        .or_else(|| raw.strip_prefix("United States:"))
    {
        let state = region(rest);
        match us_state_abbr(state) {
            Some(_) => format!("USA-{}", state),
            None => "USA".to_string(),
        }
    } else if let Some(rest) = raw.strip_prefix("Canada:") {
        let province = region(rest);
        match canada_province_abbr(province) {
            Some(_) => format!("Canada-{}", province),
            None => "Canada".to_string(),
        }
    } else {
        first_segment(raw).to_string()
    };

    let normalized = normalized.replace(' ', "_");
    if normalized.is_empty() {
        UNKNOWN_GEO.to_string()
    } else {
        normalized
    }
}

fn first_segment(s: &str) -> &str {
    s.split(':').next().unwrap_or(s).trim()
}

// State or province part of "State, County: Locality"
fn region(s: &str) -> &str {
    s.split([':', ',']).next().unwrap_or(s).trim()
}

/// Build the `<Genus>_<species>_<accession>_<geo>` header
///
/// `description` is the original FASTA header, e.g.
/// `MN123456.1 Pseudorhizina californica voucher X internal transcribed spacer 1`.
pub fn reformat_header(description: &str, accession: &str, geo: &str) -> String {
    let parts: Vec<&str> = description.split_whitespace().collect();

    let species = if parts.len() < 3 {
        parts
            .get(1)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Unknown_sp".to_string())
    } else {
        format!("{}_{}", parts[1], parts[2])
    };

    format!("{}_{}_{}", species, accession, geo)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const TWO_RECORDS: &str = r#"LOCUS       MN000001                 612 bp    DNA     linear   PLN 01-JAN-2020
DEFINITION  Pseudorhizina californica internal transcribed spacer 1.
ACCESSION   MN000001
VERSION     MN000001.1
FEATURES             Location/Qualifiers
     source          1..612
                     /organism="Pseudorhizina californica"
                     /country="USA: California, Marin
                     County"
//
LOCUS       MN000002                 598 bp    DNA     linear   PLN 01-JAN-2020
ACCESSION   MN000002
FEATURES             Location/Qualifiers
     source          1..598
                     /geo_loc_name="Canada: British Columbia"
                     /country="Canada"
//
"#;

    #[test]
    fn test_parse_accession() {
        assert_eq!(parse_accession("AB123456.1"), "AB123456");
        assert_eq!(parse_accession("AB123456"), "AB123456");
    }

    #[test]
    fn test_split_flatfile_records() {
        let records = split_flatfile_records(TWO_RECORDS);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "MN000001");
        assert_eq!(records[1].0, "MN000002");
        assert!(records[1].1.contains("British Columbia"));
    }

    #[test]
    fn test_extract_geo_prefers_geo_loc_name() {
        let records = split_flatfile_records(TWO_RECORDS);
        assert_eq!(
            extract_geo(&records[0].1).unwrap(),
            "USA: California, Marin County"
        );
        assert_eq!(extract_geo(&records[1].1).unwrap(), "Canada: British Columbia");
        assert_eq!(extract_geo("LOCUS x\nACCESSION y\n"), None);
    }

    #[test]
    fn test_normalize_geo_drops_county() {
        assert_eq!(normalize_geo("USA: California, Marin County"), "USA-California");
        assert_eq!(normalize_geo("Canada: Quebec: Gatineau Park"), "Canada-Quebec");
    }

    #[test]
    fn test_normalize_geo_us_states() {
        assert_eq!(normalize_geo("USA: New York"), "USA-New_York");
        assert_eq!(normalize_geo("United States: Oregon"), "USA-Oregon");
        assert_eq!(normalize_geo("USA: Puerto Rico"), "USA");
        assert_eq!(normalize_geo("USA"), "USA");
    }

    #[test]
    fn test_normalize_geo_canada_and_others() {
        assert_eq!(normalize_geo("Canada: British Columbia"), "Canada-British_Columbia");
        assert_eq!(normalize_geo("Canada: Somewhere"), "Canada");
        assert_eq!(normalize_geo("New Zealand: Auckland"), "New_Zealand");
        assert_eq!(normalize_geo("Germany"), "Germany");
        assert_eq!(normalize_geo(""), "NA");
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(us_state_abbr(" Texas "), Some("TX"));
        assert_eq!(us_state_abbr("Ontario"), None);
        assert_eq!(canada_province_abbr("Yukon"), Some("YT"));
    }

    #[test]
    fn test_reformat_header() {
        assert_eq!(
            reformat_header(
                "MN000001.1 Pseudorhizina californica voucher 12 ITS",
                "MN000001",
                "USA-California"
            ),
            "Pseudorhizina_californica_MN000001_USA-California"
        );
        assert_eq!(reformat_header("X1.1 Fungi", "X1", "NA"), "Fungi_X1_NA");
        assert_eq!(reformat_header("X1.1", "X1", "NA"), "Unknown_sp_X1_NA");
    }
}
