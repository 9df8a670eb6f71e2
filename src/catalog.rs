//! The `authors` and `topics` commands: the lists that populate the
//! browser's author and topic pickers.

use anyhow::Result;
use guardados_core::aggregate::{extract_unique_authors, extract_unique_topics_with_counts};
use guardados_core::models::TopicCount;

use crate::archive::Archive;
use crate::config::Config;

/// Print every author with at least one saved message, alphabetically.
pub async fn run_authors(config: &Config) -> Result<()> {
    let archive = Archive::load(config).await?;
    let authors = extract_unique_authors(&archive.messages);

    if authors.is_empty() {
        println!("No hay autores.");
        return Ok(());
    }

    for author in &authors {
        println!("{}", author);
    }
    Ok(())
}

/// Print the most used topics, `limit` defaulting to `topics.popular_limit`.
pub async fn run_topics(config: &Config, limit: Option<usize>) -> Result<()> {
    let archive = Archive::load(config).await?;
    let vocabulary = extract_unique_topics_with_counts(&archive.messages);
    let limit = limit.unwrap_or(config.topics.popular_limit);

    if vocabulary.is_empty() {
        println!("No hay temas.");
        return Ok(());
    }

    print!("{}", format_topic_table(&vocabulary, limit));
    if vocabulary.len() > limit {
        println!("({} más, usa --limit para verlos)", vocabulary.len() - limit);
    }
    Ok(())
}

/// One `#Topic  count` line per entry, counts right-aligned.
fn format_topic_table(vocabulary: &[TopicCount], limit: usize) -> String {
    let shown = &vocabulary[..limit.min(vocabulary.len())];
    let width = shown
        .iter()
        .map(|t| t.canonical_topic.chars().count() + 1)
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for topic in shown {
        let label = format!("#{}", topic.canonical_topic);
        let pad = width.saturating_sub(label.chars().count());
        out.push_str(&format!("{}{}  {:>4}\n", label, " ".repeat(pad), topic.total_count));
    }
    out
}
