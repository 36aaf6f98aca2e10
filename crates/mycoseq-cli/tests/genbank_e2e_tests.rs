//! End-to-end tests for `mycoseq genbank`
//!
//! Entrez esearch/efetch are served by wiremock via `--entrez-url`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const FASTA: &str = "\
>MN000001.1 Pseudorhizina californica voucher DBG-F-028 internal transcribed spacer 1
ACGTACGTACGTAAAA
>MN000002.1 Pseudorhizina sphaerospora isolate 7 ITS region
CCCCGGGG
";

const FLATFILE: &str = "\
LOCUS       MN000001                 16 bp    DNA     linear   PLN 01-JAN-2020
ACCESSION   MN000001
FEATURES             Location/Qualifiers
     source          1..16
                     /geo_loc_name=\"USA: California, Humboldt County\"
//
LOCUS       MN000002                  8 bp    DNA     linear   PLN 01-JAN-2020
ACCESSION   MN000002
FEATURES             Location/Qualifiers
     source          1..8
                     /country=\"Russia: Primorsky Krai\"
//
";

fn mycoseq(dir: &Path, server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("mycoseq").unwrap();
    cmd.current_dir(dir)
        .arg("--entrez-url")
        .arg(server.uri())
        .env_remove("NCBI_API_KEY")
        .env_remove("NCBI_EMAIL")
        .env_remove("LOG_LEVEL")
        .env_remove("LOG_OUTPUT");
    cmd
}

async fn mount_search(server: &MockServer, count: u64, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": count.to_string(), "idlist": []}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", count.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": count.to_string(), "idlist": ids}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_genbank_renames_records() {
    let server = MockServer::start().await;
    mount_search(&server, 2, &["2001", "2002"]).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("rettype", "fasta"))
        .and(query_param("id", "2001,2002"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FASTA))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("rettype", "gb"))
        .and(query_param("id", "MN000001,MN000002"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FLATFILE))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();

    mycoseq(dir.path(), &server)
        .args(["genbank", "Pseudorhizina"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 sequences."))
        .stdout(predicate::str::contains("Pseudorhizina_ITS_genbank.fasta"));

    let text = std::fs::read_to_string(dir.path().join("Pseudorhizina_ITS_genbank.fasta")).unwrap();
    assert_eq!(
        text,
        ">Pseudorhizina_californica_MN000001_USA-California\nACGTACGTACGTAAAA\n\
         >Pseudorhizina_sphaerospora_MN000002_Russia\nCCCCGGGG\n"
    );
}

#[tokio::test]
async fn test_genbank_type_only_query_and_failed_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param(
            "term",
            "Pseudorhizina[Organism] AND internal[All Fields] AND type_material[Properties]",
        ))
        .and(query_param("retmax", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": "1", "idlist": []}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": "1", "idlist": ["2001"]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("rettype", "fasta"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(">MN000001.1 Pseudorhizina californica ITS\nACGT\n"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("rettype", "gb"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out").join("types.fasta");

    mycoseq(dir.path(), &server)
        .args(["genbank", "Pseudorhizina", "--type-only", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Could not fetch metadata"));

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        ">Pseudorhizina_californica_MN000001_NA\nACGT\n"
    );
}

#[tokio::test]
async fn test_genbank_no_results() {
    let server = MockServer::start().await;
    mount_search(&server, 0, &[]).await;

    let dir = TempDir::new().unwrap();

    mycoseq(dir.path(), &server)
        .args(["genbank", "Nonexistent taxon"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No sequences found"));
}

#[tokio::test]
async fn test_genbank_large_result_needs_confirmation() {
    let server = MockServer::start().await;
    mount_search(&server, 5000, &[]).await;

    let dir = TempDir::new().unwrap();

    // stdin is not a terminal under the test harness
    mycoseq(dir.path(), &server)
        .args(["genbank", "Morchella"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Aborted"))
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test]
async fn test_genbank_yes_skips_confirmation() {
    let server = MockServer::start().await;
    mount_search(&server, 5000, &["2001", "2002"]).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("rettype", "fasta"))
        .and(query_param("id", "2001,2002"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FASTA))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("rettype", "gb"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FLATFILE))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();

    mycoseq(dir.path(), &server)
        .args(["genbank", "Morchella", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 5000 sequences."))
        .stdout(predicate::str::contains("Fetched 2 sequences."))
        .stderr(predicate::str::contains("Aborted").not());

    let text = std::fs::read_to_string(dir.path().join("Morchella_ITS_genbank.fasta")).unwrap();
    assert_eq!(
        text,
        ">Pseudorhizina_californica_MN000001_USA-California\nACGTACGTACGTAAAA\n\
         >Pseudorhizina_sphaerospora_MN000002_Russia\nCCCCGGGG\n"
    );
}
