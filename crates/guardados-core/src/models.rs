//! Data models that flow through the aggregation pipeline.
//!
//! [`RawSaveRecord`] mirrors one row of the remote saved-messages export:
//! one row per user bookmark, so the same message appears once per user
//! who saved it. [`Message`] is the deduplicated view built by
//! [`aggregate`](crate::aggregate::aggregate).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One user-save event as exported by the remote endpoint.
///
/// Every field is optional at the wire level. Required identity fields
/// (message id, author name, content) are validated at the aggregation
/// boundary, where incomplete records are skipped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSaveRecord {
    #[serde(rename = "Message ID", default, deserialize_with = "de_opt_id")]
    pub message_id: Option<String>,
    #[serde(rename = "Author ID", default, deserialize_with = "de_opt_id")]
    pub author_id: Option<String>,
    #[serde(rename = "Author name", default)]
    pub author_name: Option<String>,
    #[serde(rename = "Content", default)]
    pub content: Option<String>,
    #[serde(rename = "Created", default)]
    pub created: Option<String>,
    #[serde(rename = "Telegram link", default)]
    pub permalink: Option<String>,
    #[serde(rename = "Image", default, deserialize_with = "de_flag")]
    pub has_image: bool,
    #[serde(rename = "User", default)]
    pub user: Option<String>,
    #[serde(rename = "User ID", default, deserialize_with = "de_opt_id")]
    pub user_id: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    pub saved_at: Option<String>,
    /// Space-separated topic tags chosen by the saving user.
    #[serde(rename = "Topic", default)]
    pub topic: Option<String>,
}

/// A single bookmark of a message, with the saver's own topic tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveEntry {
    pub user: Option<String>,
    pub user_id: Option<String>,
    pub saved_at: Option<String>,
    /// Raw topic string as typed by this user (empty when absent).
    pub topics: String,
}

/// One user's contribution to a unified topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicContribution {
    pub user: Option<String>,
    pub original_topic: String,
}

/// A topic after grouping all spelling variants of a message's saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedTopic {
    /// Display spelling chosen for the group.
    pub canonical_topic: String,
    /// Comparison key shared by every variant in the group.
    pub normalized_key: String,
    /// Number of saves that tagged the message with this topic.
    pub count: usize,
    pub users: Vec<TopicContribution>,
}

/// A deduplicated message with every save that references it.
///
/// Invariant: `save_count == saved_by.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message_id: String,
    pub author_id: Option<String>,
    pub author_name: String,
    pub content: String,
    /// Creation timestamp exactly as received.
    pub created: Option<String>,
    /// Parsed creation time in epoch milliseconds, `None` when unparseable.
    pub created_timestamp: Option<i64>,
    pub permalink: Option<String>,
    pub has_image: bool,
    pub save_count: usize,
    pub saved_by: Vec<SaveEntry>,
    pub unified_topics: Vec<UnifiedTopic>,
    /// Canonical topics in `unified_topics` order.
    pub topic_array: Vec<String>,
    /// Canonical topics joined with spaces, matched by text search.
    pub topic_search_field: String,
}

/// Global topic vocabulary entry (summed across messages).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub canonical_topic: String,
    pub normalized_key: String,
    pub total_count: usize,
}

/// Parse a creation timestamp into epoch milliseconds.
///
/// Accepts RFC 3339, RFC 2822, naive `YYYY-MM-DD[T ]HH:MM:SS[.fff]`
/// (read as UTC) and bare `YYYY-MM-DD` dates. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Identifiers arrive as strings or numbers depending on the exporter.
fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "si" | "sí"
        ),
        _ => false,
    })
}
