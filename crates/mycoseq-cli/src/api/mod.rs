//! API client module
//!
//! HTTP clients for the three services the toolkit talks to: iNaturalist,
//! MycoBank, and NCBI Entrez.

pub mod endpoints;
pub mod entrez;
pub mod inat;
pub mod mycobank;
pub mod retry;
pub mod types;

pub use entrez::EntrezClient;
pub use inat::InatClient;
pub use mycobank::MycoBankClient;
pub use types::*;

use crate::error::Result;
use reqwest::Client;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("mycoseq/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client with the configured timeout
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;

    Ok(client)
}
