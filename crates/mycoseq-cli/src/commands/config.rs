//! `mycoseq config` command implementation
//!
//! Shows the effective configuration. Settings come from the environment
//! (or `.env`) and global flags, so there is nothing to write.

use crate::config::Config;
use crate::error::{CliError, Result};
use colored::Colorize;

/// Environment variable behind each configuration key
const ENV_VARS: [(&str, &str); 7] = [
    ("inat_url", "INAT_API_URL"),
    ("mycobank_url", "MYCOBANK_API_URL"),
    ("entrez_url", "ENTREZ_API_URL"),
    ("ncbi_email", "NCBI_EMAIL"),
    ("ncbi_api_key", "NCBI_API_KEY"),
    ("mycobank_token", "MYCOBANK_ACCESS_TOKEN"),
    ("timeout_secs", "MYCOSEQ_API_TIMEOUT_SECS"),
];

/// Get configuration value
pub async fn get(config: &Config, key: &str) -> Result<()> {
    let value = config.get(key).ok_or_else(|| {
        CliError::config(format!(
            "Unknown config key: {} (expected one of: {})",
            key,
            Config::KEYS.join(", ")
        ))
    })?;

    println!("{}", value);
    Ok(())
}

/// Show all configuration
pub async fn show(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&render_json(config))?);
        return Ok(());
    }

    println!("{}", "mycoseq Configuration:".cyan().bold());
    println!();
    for key in Config::KEYS {
        let value = config.get(key).unwrap_or_default();
        println!("{:<16} {}", format!("{}:", key), value);
    }
    println!();
    println!("{}", "Environment Variables:".cyan());
    for (_, var) in ENV_VARS {
        println!("  {}", var);
    }

    Ok(())
}

/// Every key with its display value; credentials appear as `set` / `not set`
fn render_json(config: &Config) -> serde_json::Value {
    let map = Config::KEYS
        .iter()
        .map(|key| {
            let value = config.get(key).unwrap_or_default();
            (key.to_string(), serde_json::Value::String(value))
        })
        .collect();
    serde_json::Value::Object(map)
}
