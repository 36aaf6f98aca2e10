//! API endpoint URL builders
//!
//! Helper functions to construct request URLs. Every builder accepts a base
//! URL with or without a trailing slash.

use urlencoding::encode;

/// Observation field holding the ITS barcode on iNaturalist
pub const INAT_ITS_FIELD: &str = "DNA Barcode ITS";

/// Human-facing MycoBank record page, followed by the MycoBank number
pub const MYCOBANK_PAGE_URL: &str =
    "https://www.mycobank.org/page/Name%20details%20page/field/Mycobank%20%23/";

/// Tool name reported to NCBI
pub const ENTREZ_TOOL: &str = "mycoseq";

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}

// ============================================================================
// iNaturalist
// ============================================================================

/// Build observation search URL for one page
pub fn inat_observations_url(base_url: &str, taxon_id: &str, page: u32, per_page: u32) -> String {
    format!(
        "{}/observations?taxon_id={}&page={}&per_page={}",
        base(base_url),
        encode(taxon_id),
        page,
        per_page
    )
}

/// Build place details URL
pub fn inat_place_url(base_url: &str, place_id: u64) -> String {
    format!("{}/places/{}", base(base_url), place_id)
}

// ============================================================================
// MycoBank
// ============================================================================

/// Filter expression matching any of the given names by prefix
pub fn mycobank_name_filter(species: &[String]) -> String {
    species
        .iter()
        .map(|sp| format!("name startWith '{}'", sp.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Build taxon name search URL
pub fn mycobank_search_url(base_url: &str, filter: &str) -> String {
    format!("{}?filter={}", base(base_url), encode(filter))
}

/// Build taxon name record URL
pub fn mycobank_record_url(base_url: &str, id: i64) -> String {
    format!("{}/{}", base(base_url), id)
}

/// Link to the MycoBank page of a record
pub fn mycobank_page_url(mycobank_nr: impl std::fmt::Display) -> String {
    format!("{}{}", MYCOBANK_PAGE_URL, mycobank_nr)
}

// ============================================================================
// NCBI Entrez
// ============================================================================

/// Entrez search term for ITS sequences of a taxon
pub fn entrez_its_query(taxon_name: &str, type_only: bool) -> String {
    let mut query = format!("{}[Organism] AND internal[All Fields]", taxon_name);
    if type_only {
        query.push_str(" AND type_material[Properties]");
    }
    query
}

/// Identification parameters appended to every Entrez request
pub fn entrez_identity(email: Option<&str>, api_key: Option<&str>) -> String {
    let mut params = format!("&tool={}", ENTREZ_TOOL);
    if let Some(email) = email {
        params.push_str(&format!("&email={}", encode(email)));
    }
    if let Some(key) = api_key {
        params.push_str(&format!("&api_key={}", encode(key)));
    }
    params
}

/// Build esearch URL against the nucleotide database
pub fn entrez_esearch_url(base_url: &str, term: &str, retmax: u64, identity: &str) -> String {
    format!(
        "{}/esearch.fcgi?db=nucleotide&retmode=json&retmax={}&term={}{}",
        base(base_url),
        retmax,
        encode(term),
        identity
    )
}

/// Encoded efetch parameters for a list of IDs or accessions
pub fn entrez_efetch_params(ids: &[String], rettype: &str, identity: &str) -> String {
    format!(
        "db=nucleotide&rettype={}&retmode=text&id={}{}",
        rettype,
        encode(&ids.join(",")),
        identity
    )
}

/// Build efetch URL without parameters, for form POSTs
pub fn entrez_efetch_endpoint(base_url: &str) -> String {
    format!("{}/efetch.fcgi", base(base_url))
}

/// Build efetch URL for a list of IDs or accessions
pub fn entrez_efetch_url(base_url: &str, ids: &[String], rettype: &str, identity: &str) -> String {
    format!(
        "{}?{}",
        entrez_efetch_endpoint(base_url),
        entrez_efetch_params(ids, rettype, identity)
    )
}
