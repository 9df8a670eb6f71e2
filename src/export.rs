//! Export the aggregated archive as JSON.
//!
//! Produces the deduplicated messages with their unified topics and
//! saved-by lists, suitable for a static page or further scripting.

use anyhow::{Context, Result};
use guardados_core::aggregate::extract_unique_topics_with_counts;
use guardados_core::models::{Message, TopicCount};
use serde::Serialize;
use std::path::Path;

use crate::archive::Archive;
use crate::config::Config;

#[derive(Serialize)]
struct ExportData<'a> {
    messages: &'a [Message],
    topics: Vec<TopicCount>,
}

/// Export aggregated messages as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub async fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let archive = Archive::load(config).await?;
    let json = to_json(&archive.messages)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            eprintln!(
                "Exported {} messages to {}",
                archive.messages.len(),
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

fn to_json(messages: &[Message]) -> Result<String> {
    let data = ExportData {
        messages,
        topics: extract_unique_topics_with_counts(messages),
    };
    Ok(serde_json::to_string_pretty(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TopicsConfig;
    use guardados_core::models::RawSaveRecord;

    #[test]
    fn test_export_shape() {
        let records: Vec<RawSaveRecord> = serde_json::from_str(
            r#"[
                {"Message ID": "7", "Author name": "Ana", "Content": "Hola", "User": "x", "Topic": "Salud salud"},
                {"Message ID": "7", "Author name": "Ana", "Content": "Hola", "User": "y", "Topic": "SALUD"}
            ]"#,
        )
        .unwrap();
        let archive = Archive::from_records(&records, &TopicsConfig::default());
        let json = to_json(&archive.messages).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let messages = value["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["save_count"], 2);
        assert_eq!(value["topics"][0]["canonical_topic"], "Salud");
        assert_eq!(value["topics"][0]["total_count"], 2);
    }
}
