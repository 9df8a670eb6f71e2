//! Loading the saved-messages export.
//!
//! The export is a JSON array of save records. It is read from
//! `source.path` when set, otherwise fetched once from `source.url`.
//! Failed requests are reported, not retried.

use anyhow::{bail, Context, Result};
use guardados_core::models::RawSaveRecord;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;

/// Load raw save records from the configured source.
pub async fn load_records(config: &Config) -> Result<Vec<RawSaveRecord>> {
    let records = match (&config.source.path, &config.source.url) {
        (Some(path), _) => read_records(path)?,
        (None, Some(url)) => fetch_records(url, config.source.timeout_secs).await?,
        (None, None) => bail!("No data source configured"),
    };
    info!(records = records.len(), "loaded save records");
    Ok(records)
}

/// Parse records from a local JSON file.
pub fn read_records(path: &Path) -> Result<Vec<RawSaveRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    parse_records(&content).with_context(|| format!("Invalid data file: {}", path.display()))
}

/// Parse records from a JSON array.
pub fn parse_records(json: &str) -> Result<Vec<RawSaveRecord>> {
    let records: Vec<RawSaveRecord> =
        serde_json::from_str(json).context("Expected a JSON array of save records")?;
    Ok(records)
}

async fn fetch_records(url: &str, timeout_secs: u64) -> Result<Vec<RawSaveRecord>> {
    debug!(url, "fetching save records");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        bail!("Data endpoint error {}: {}", status, body_text);
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read response from {}", url))?;
    parse_records(&body).with_context(|| format!("Invalid response from {}", url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let records = parse_records(
            r#"[{"Message ID": "1", "Author name": "Ana", "Content": "Hola", "Topic": "Salud"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].author_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_parse_records_rejects_object() {
        let err = parse_records(r#"{"data": []}"#).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_read_records_missing_file() {
        let err = read_records(Path::new("/nonexistent/guardados.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read data file"));
    }
}
