//! Message aggregation: one [`Message`] per message id.
//!
//! The remote export has one row per bookmark, so a message saved by five
//! users appears five times. [`aggregate`] folds those rows into a single
//! message carrying every save, in encounter order, and the message's
//! unified topics.
//!
//! Rows missing a required identity field (message id, author name,
//! non-blank content) are skipped, never treated as an error.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::collate::spanish_cmp;
use crate::models::{parse_timestamp, Message, RawSaveRecord, SaveEntry, TopicCount};
use crate::normalize::{Normalizer, TagPolicy};
use crate::unify::unify_topics;

/// Required identity fields of a raw record.
struct Identity<'a> {
    message_id: &'a str,
    author_name: &'a str,
    content: &'a str,
}

fn identity(record: &RawSaveRecord) -> Option<Identity<'_>> {
    let content = record.content.as_deref().filter(|c| !c.trim().is_empty())?;
    let message_id = record.message_id.as_deref().filter(|id| !id.trim().is_empty())?;
    let author_name = record.author_name.as_deref().filter(|a| !a.trim().is_empty())?;
    Some(Identity {
        message_id,
        author_name,
        content,
    })
}

fn save_entry(record: &RawSaveRecord) -> SaveEntry {
    SaveEntry {
        user: record.user.clone(),
        user_id: record.user_id.clone(),
        saved_at: record.saved_at.clone(),
        topics: record.topic.clone().unwrap_or_default(),
    }
}

/// Deduplicate raw save records into messages.
///
/// Output order is the first-seen order of message ids. Identity fields
/// come from the first record of each id; every record (the first
/// included) contributes one entry to `saved_by`.
pub fn aggregate<N: Normalizer + ?Sized>(
    records: &[RawSaveRecord],
    policy: TagPolicy,
    normalizer: &mut N,
) -> Vec<Message> {
    let mut messages: Vec<Message> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(id) = identity(record) else {
            skipped += 1;
            debug!(
                message_id = record.message_id.as_deref().unwrap_or(""),
                "skipping save record without id, author, or content"
            );
            continue;
        };

        match index.get(id.message_id) {
            Some(&pos) => {
                let message = &mut messages[pos];
                message.saved_by.push(save_entry(record));
                message.save_count += 1;
            }
            None => {
                index.insert(id.message_id.to_string(), messages.len());
                messages.push(Message {
                    message_id: id.message_id.to_string(),
                    author_id: record.author_id.clone(),
                    author_name: id.author_name.to_string(),
                    content: id.content.to_string(),
                    created: record.created.clone(),
                    created_timestamp: record.created.as_deref().and_then(parse_timestamp),
                    permalink: record.permalink.clone(),
                    has_image: record.has_image,
                    save_count: 1,
                    saved_by: vec![save_entry(record)],
                    unified_topics: Vec::new(),
                    topic_array: Vec::new(),
                    topic_search_field: String::new(),
                });
            }
        }
    }

    for message in &mut messages {
        message.unified_topics = unify_topics(&message.saved_by, policy, normalizer);
        message.topic_array = message
            .unified_topics
            .iter()
            .map(|t| t.canonical_topic.clone())
            .collect();
        message.topic_search_field = message.topic_array.join(" ");
    }

    debug!(
        records = records.len(),
        messages = messages.len(),
        skipped,
        "aggregated save records"
    );

    messages
}

/// Distinct author display names, sorted.
pub fn extract_unique_authors(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .map(|m| m.author_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Global topic vocabulary with counts summed over all messages.
///
/// Topics are merged by normalized key; the first canonical spelling seen
/// is kept for display. Sorted by total count descending, then by Spanish
/// case-insensitive collation of the spelling.
pub fn extract_unique_topics_with_counts(messages: &[Message]) -> Vec<TopicCount> {
    let mut vocabulary: Vec<TopicCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for message in messages {
        for topic in &message.unified_topics {
            match index.get(topic.normalized_key.as_str()) {
                Some(&pos) => vocabulary[pos].total_count += topic.count,
                None => {
                    index.insert(topic.normalized_key.as_str(), vocabulary.len());
                    vocabulary.push(TopicCount {
                        canonical_topic: topic.canonical_topic.clone(),
                        normalized_key: topic.normalized_key.clone(),
                        total_count: topic.count,
                    });
                }
            }
        }
    }

    vocabulary.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| spanish_cmp(&a.canonical_topic, &b.canonical_topic))
    });
    vocabulary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{NormalizationCache, PureNormalizer};

    fn record(id: &str, author: &str, content: &str, user: &str, topic: &str) -> RawSaveRecord {
        RawSaveRecord {
            message_id: Some(id.to_string()),
            author_name: Some(author.to_string()),
            content: Some(content.to_string()),
            created: Some("2025-06-01T10:00:00Z".to_string()),
            user: Some(user.to_string()),
            topic: Some(topic.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_same_message() {
        let records = vec![
            record("m1", "Ana", "Hola", "luis", "Salud salud"),
            record("m1", "Ana", "Hola", "eva", "SALUD"),
        ];
        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);

        assert_eq!(messages.len(), 1);
        let m = &messages[0];
        assert_eq!(m.save_count, 2);
        assert_eq!(m.unified_topics.len(), 1);
        assert_eq!(m.unified_topics[0].canonical_topic, "Salud");
        assert_eq!(m.unified_topics[0].count, 2);
        assert_eq!(m.topic_array, vec!["Salud"]);
        assert_eq!(m.topic_search_field, "Salud");
    }

    #[test]
    fn test_save_count_matches_saved_by() {
        let records = vec![
            record("m1", "Ana", "Uno", "a", "x"),
            record("m2", "Bea", "Dos", "a", ""),
            record("m1", "Ana", "Uno", "b", "y"),
            record("m1", "Ana", "Uno", "c", "x"),
        ];
        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        for m in &messages {
            assert_eq!(m.save_count, m.saved_by.len());
        }
        assert_eq!(messages[0].save_count, 3);
        assert_eq!(messages[1].save_count, 1);
    }

    #[test]
    fn test_first_seen_order_and_identity() {
        let mut first = record("m2", "Bea", "Primera", "a", "");
        first.permalink = Some("https://t.me/c/1/2".to_string());
        let mut later = record("m2", "Otra", "Distinta", "b", "");
        later.permalink = Some("https://example.org".to_string());
        let records = vec![first, record("m1", "Ana", "Uno", "a", ""), later];

        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        let ids: Vec<&str> = messages.iter().map(|m| m.message_id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1"]);
        assert_eq!(messages[0].author_name, "Bea");
        assert_eq!(messages[0].content, "Primera");
        assert_eq!(messages[0].permalink.as_deref(), Some("https://t.me/c/1/2"));
        let users: Vec<Option<&str>> =
            messages[0].saved_by.iter().map(|s| s.user.as_deref()).collect();
        assert_eq!(users, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn test_blank_content_excluded() {
        let mut no_content = record("m3", "Ana", "", "a", "x");
        no_content.content = None;
        let records = vec![
            record("m1", "Ana", "   ", "a", "x"),
            no_content,
            record("m2", "Ana", "Vale", "a", "x"),
        ];
        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_id, "m2");
        assert_eq!(messages[0].save_count, 1);
    }

    #[test]
    fn test_missing_identity_skipped() {
        let mut no_id = record("x", "Ana", "Hola", "a", "");
        no_id.message_id = None;
        let mut no_author = record("m9", "Ana", "Hola", "a", "");
        no_author.author_name = None;
        let messages = aggregate(&[no_id, no_author], TagPolicy::All, &mut PureNormalizer);
        assert!(messages.is_empty());
    }

    #[test]
    fn test_created_timestamp_parsed_or_none() {
        let mut bad = record("m2", "Ana", "Dos", "a", "");
        bad.created = Some("not a date".to_string());
        let records = vec![record("m1", "Ana", "Uno", "a", ""), bad];
        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        assert_eq!(messages[0].created_timestamp, Some(1_748_772_000_000));
        assert_eq!(messages[1].created_timestamp, None);
        assert_eq!(messages[1].created.as_deref(), Some("not a date"));
    }

    #[test]
    fn test_aggregate_deterministic() {
        let records = vec![
            record("m1", "Ana", "Uno", "a", "Salud Política"),
            record("m2", "Bea", "Dos", "b", "política"),
            record("m1", "Ana", "Uno", "c", "salud vivienda"),
        ];
        let first = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        let second = aggregate(&records, TagPolicy::All, &mut NormalizationCache::new(1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_unique_authors_sorted() {
        let records = vec![
            record("m1", "Carlos", "Uno", "a", ""),
            record("m2", "Ana", "Dos", "a", ""),
            record("m3", "Carlos", "Tres", "a", ""),
        ];
        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        assert_eq!(extract_unique_authors(&messages), vec!["Ana", "Carlos"]);
    }

    #[test]
    fn test_vocabulary_sums_and_sorts() {
        let records = vec![
            record("m1", "Ana", "Uno", "a", "Salud cultura"),
            record("m1", "Ana", "Uno", "b", "salud"),
            record("m2", "Bea", "Dos", "a", "SALUD Bici"),
            record("m3", "Eva", "Tres", "a", "Árbol"),
        ];
        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        let vocab = extract_unique_topics_with_counts(&messages);

        let got: Vec<(&str, usize)> = vocab
            .iter()
            .map(|t| (t.canonical_topic.as_str(), t.total_count))
            .collect();
        // salud: 2 (m1) + 1 (m2); first-seen canonical "Salud" wins.
        // Equal counts fall back to Spanish collation, accents ignored.
        assert_eq!(
            got,
            vec![("Salud", 3), ("Árbol", 1), ("Bici", 1), ("cultura", 1)]
        );
    }

    #[test]
    fn test_per_message_and_global_orders_differ() {
        let records = vec![record("m1", "Ana", "Uno", "a", "Zamora Arte")];
        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        assert_eq!(messages[0].topic_array, vec!["Zamora", "Arte"]);

        let vocab: Vec<String> = extract_unique_topics_with_counts(&messages)
            .into_iter()
            .map(|t| t.canonical_topic)
            .collect();
        assert_eq!(vocab, vec!["Arte", "Zamora"]);
    }
}
