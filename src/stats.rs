//! Archive statistics.
//!
//! A quick summary of what the export contains: unique messages, total
//! saves, distinct authors and topics. Used by `guardados stats` to check
//! that a data source loads as expected.

use anyhow::Result;
use guardados_core::aggregate::{extract_unique_authors, extract_unique_topics_with_counts};
use guardados_core::models::Message;
use guardados_core::stats::Statistics;

use crate::archive::Archive;
use crate::config::Config;

/// Run the stats command: load, aggregate and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let archive = Archive::load(config).await?;
    print!("{}", format_summary(config, &archive.messages));
    Ok(())
}

fn format_summary(config: &Config, messages: &[Message]) -> String {
    let stats = Statistics::compute(messages, messages.len());
    let authors = extract_unique_authors(messages).len();
    let topics = extract_unique_topics_with_counts(messages).len();
    let with_image = messages.iter().filter(|m| m.has_image).count();
    let undated = messages
        .iter()
        .filter(|m| m.created_timestamp.is_none())
        .count();

    let source = match (&config.source.path, &config.source.url) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(url)) => url.clone(),
        (None, None) => "(ninguna)".to_string(),
    };

    let mut out = String::new();
    out.push_str("Guardados — Estadísticas del archivo\n");
    out.push_str("====================================\n\n");
    out.push_str(&format!("  {:<12} {}\n\n", "Fuente:", source));
    out.push_str(&format!("  {:<12} {}\n", "Mensajes:", stats.total_messages));
    out.push_str(&format!("  {:<12} {}\n", "Guardados:", stats.total_saves));
    out.push_str(&format!("  {:<12} {}\n", "Autores:", authors));
    out.push_str(&format!("  {:<12} {}\n", "Temas:", topics));
    out.push_str(&format!("  {:<12} {}\n", "Con imagen:", with_image));
    if undated > 0 {
        out.push_str(&format!("  {:<12} {}\n", "Sin fecha:", undated));
    }
    out
}
