//! API response types
//!
//! Only the fields the commands read are modelled. Everything is lenient:
//! missing or null fields fall back to defaults instead of failing the page.

use serde::{Deserialize, Deserializer, Serialize};

/// Read a field that may be missing or `null` as its default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// iNaturalist
// ============================================================================

/// One page of `/observations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationsPage {
    #[serde(default)]
    pub total_results: u64,

    #[serde(default)]
    pub results: Vec<Observation>,
}

/// An iNaturalist observation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Observation {
    pub id: Option<u64>,

    pub taxon: Option<Taxon>,

    /// Observation field values
    #[serde(default)]
    pub ofvs: Vec<ObservationFieldValue>,

    #[serde(default)]
    pub place_ids: Option<Vec<u64>>,

    pub geojson: Option<GeoJson>,

    pub observed_on: Option<String>,

    pub user: Option<User>,
}

impl Observation {
    /// Raw value of the named observation field, if present
    pub fn field_value(&self, name: &str) -> Option<String> {
        self.ofvs
            .iter()
            .find(|ofv| ofv.name.as_deref() == Some(name))
            .map(|ofv| match &ofv.value {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            })
    }

    /// Whether the observation carries the named observation field
    pub fn has_field(&self, name: &str) -> bool {
        self.ofvs.iter().any(|ofv| ofv.name.as_deref() == Some(name))
    }

    /// `(longitude, latitude)` of the public location
    pub fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        match self.geojson.as_ref().and_then(|g| g.coordinates.as_ref()) {
            Some(coords) => (coords.first().copied(), coords.get(1).copied()),
            None => (None, None),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxon {
    pub name: Option<String>,
    pub rank: Option<String>,
}

/// Observation field value; `value` is free-form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationFieldValue {
    pub name: Option<String>,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoJson {
    pub coordinates: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub login: Option<String>,
}

/// Response of `/places/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub results: Vec<Place>,
}

/// A standard iNaturalist place
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Place {
    pub id: Option<u64>,
    pub name: Option<String>,

    /// 0 = country, 10 = state/province, 20 = county
    pub admin_level: Option<i64>,
}

/// Admin level of countries
pub const ADMIN_LEVEL_COUNTRY: i64 = 0;

/// Admin level of states and provinces
pub const ADMIN_LEVEL_STATE: i64 = 10;

// ============================================================================
// MycoBank
// ============================================================================

/// Result of a taxon name search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonNamesPage {
    #[serde(default)]
    pub items: Vec<TaxonName>,
}

/// A MycoBank taxon name record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonName {
    /// Record ID; records without one can never be resolved
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Legitimate, Illegitimate, Invalid, ...
    pub name_status: Option<String>,

    pub synonymy: Option<Synonymy>,

    pub mycobank_nr: Option<i64>,
}

impl TaxonName {
    /// Record ID of the current name this record points to
    pub fn current_name_id(&self) -> Option<i64> {
        self.synonymy.as_ref().and_then(|s| s.current_name_id)
    }

    /// Illegitimate and invalid names never count as a match
    pub fn is_acceptable(&self) -> bool {
        !matches!(self.name_status.as_deref(), Some("Illegitimate") | Some("Invalid"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synonymy {
    pub current_name_id: Option<i64>,
}

// ============================================================================
// NCBI Entrez
// ============================================================================

/// esearch JSON envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ESearchResponse {
    pub esearchresult: ESearchResult,
}

/// esearch result; Entrez reports numbers as strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ESearchResult {
    #[serde(default)]
    pub count: String,

    #[serde(default)]
    pub idlist: Vec<String>,

    #[serde(rename = "ERROR")]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_tolerates_nulls_and_numbers() {
        let obs: Observation = serde_json::from_value(serde_json::json!({
            "id": 12,
            "taxon": {"name": "Pseudorhizina californica", "rank": "species"},
            "ofvs": [
                {"name": "Voucher Number", "value": 451},
                {"name": "DNA Barcode ITS", "value": "ACGT"}
            ],
            "place_ids": null,
            "geojson": {"coordinates": [-122.5, 38.1]},
            "observed_on": null
        }))
        .unwrap();

        assert!(obs.has_field("DNA Barcode ITS"));
        assert_eq!(obs.field_value("DNA Barcode ITS").unwrap(), "ACGT");
        assert_eq!(obs.field_value("Voucher Number").unwrap(), "451");
        assert_eq!(obs.field_value("Spore Print"), None);
        assert_eq!(obs.coordinates(), (Some(-122.5), Some(38.1)));
        assert!(obs.place_ids.is_none());
    }

    #[test]
    fn test_taxon_name_fields() {
        let name: TaxonName = serde_json::from_value(serde_json::json!({
            "id": 10,
            "name": "Gyromitra esculenta",
            "nameStatus": "Legitimate",
            "synonymy": {"currentNameId": 10},
            "mycobankNr": 100123
        }))
        .unwrap();

        assert_eq!(name.current_name_id(), Some(10));
        assert_eq!(name.mycobank_nr, Some(100123));
        assert!(name.is_acceptable());

        let invalid = TaxonName {
            name_status: Some("Invalid".to_string()),
            ..name
        };
        assert!(!invalid.is_acceptable());
    }

    #[test]
    fn test_taxon_names_page_tolerates_incomplete_items() {
        let page: TaxonNamesPage = serde_json::from_value(serde_json::json!({
            "items": [
                {"id": 1, "name": "Gyromitra esculenta", "nameStatus": "Legitimate",
                 "synonymy": {"currentNameId": 1}},
                {"id": 2, "name": null, "nameStatus": null, "synonymy": null},
                {"name": "Gyromitra esculenta", "mycobankNr": null}
            ]
        }))
        .unwrap();

        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].id, Some(1));
        assert_eq!(page.items[1].name, "");
        assert_eq!(page.items[1].current_name_id(), None);
        assert_eq!(page.items[2].id, None);
        assert_eq!(page.items[2].name, "Gyromitra esculenta");
    }

    #[test]
    fn test_esearch_result() {
        let resp: ESearchResponse = serde_json::from_str(
            r#"{"header":{},"esearchresult":{"count":"2","retmax":"2","idlist":["101","102"]}}"#,
        )
        .unwrap();
        assert_eq!(resp.esearchresult.count, "2");
        assert_eq!(resp.esearchresult.idlist, vec!["101", "102"]);
    }
}
