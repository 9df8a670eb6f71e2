//! Filtering and sorting of aggregated messages.
//!
//! [`apply_filters`] never mutates its input. All constraints in a
//! [`FilterState`] compose with logical AND; empty fields impose none.
//!
//! # Ordering
//!
//! Sorting is stable: messages with equal keys keep their input order
//! (the first-seen order produced by aggregation). Messages whose creation
//! timestamp could not be parsed sort last in both date orders and never
//! match a `week` or `month` window.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Message;
use crate::normalize::Normalizer;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Recency filter on message creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeWindow {
    #[default]
    All,
    /// Created within the last 7 days.
    Week,
    /// Created within the last 30 days.
    Month,
}

impl TimeWindow {
    /// Earliest accepted creation time (epoch ms), `None` for [`TimeWindow::All`].
    pub fn cutoff_ms(self, now: DateTime<Utc>) -> Option<i64> {
        let now_ms = now.timestamp_millis();
        match self {
            TimeWindow::All => None,
            TimeWindow::Week => Some(now_ms - 7 * DAY_MS),
            TimeWindow::Month => Some(now_ms - 30 * DAY_MS),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeWindow::All => "all",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
        })
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(TimeWindow::All),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            other => anyhow::bail!("Unknown time window: '{}'. Use all, week, or month.", other),
        }
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Most saved first.
    #[default]
    SavesDesc,
    SavesAsc,
    /// Newest first.
    DateDesc,
    DateAsc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::SavesDesc => "saves-desc",
            SortOrder::SavesAsc => "saves-asc",
            SortOrder::DateDesc => "date-desc",
            SortOrder::DateAsc => "date-asc",
        })
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "saves-desc" => Ok(SortOrder::SavesDesc),
            "saves-asc" => Ok(SortOrder::SavesAsc),
            "date-desc" => Ok(SortOrder::DateDesc),
            "date-asc" => Ok(SortOrder::DateAsc),
            other => anyhow::bail!(
                "Unknown sort order: '{}'. Use saves-desc, saves-asc, date-desc, or date-asc.",
                other
            ),
        }
    }
}

/// The browser's current query. Owned by the caller, read-only here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text search over content, author, and topics.
    pub search_term: String,
    /// Exact author display name.
    pub author: Option<String>,
    /// Topic in any spelling; compared by normalized key.
    pub topic: Option<String>,
    pub time_window: TimeWindow,
    pub sort_order: SortOrder,
}

/// Filter and sort messages.
///
/// `now` anchors the time window so results are reproducible. The topic
/// filter value is normalized once; messages are matched against their
/// precomputed `normalized_key`s.
pub fn apply_filters<'a, N: Normalizer + ?Sized>(
    messages: &'a [Message],
    filters: &FilterState,
    now: DateTime<Utc>,
    normalizer: &mut N,
) -> Vec<&'a Message> {
    let search = filters.search_term.trim().to_lowercase();
    let cutoff = filters.time_window.cutoff_ms(now);
    let author = filters.author.as_deref().filter(|a| !a.is_empty());
    let topic_key = filters
        .topic
        .as_deref()
        .map(|t| normalizer.normalize_key(t))
        .filter(|k| !k.is_empty());

    let mut filtered: Vec<&Message> = messages
        .iter()
        .filter(|m| search.is_empty() || matches_search(m, &search))
        .filter(|m| match cutoff {
            None => true,
            Some(cutoff) => m.created_timestamp.is_some_and(|ts| ts >= cutoff),
        })
        .filter(|m| author.map_or(true, |a| m.author_name == a))
        .filter(|m| match &topic_key {
            None => true,
            Some(key) => m.unified_topics.iter().any(|t| &t.normalized_key == key),
        })
        .collect();

    sort_messages(&mut filtered, filters.sort_order);
    filtered
}

fn matches_search(message: &Message, search_lower: &str) -> bool {
    message.content.to_lowercase().contains(search_lower)
        || message.author_name.to_lowercase().contains(search_lower)
        || message.topic_search_field.to_lowercase().contains(search_lower)
}

/// Stable sort by the requested order.
pub fn sort_messages(messages: &mut [&Message], order: SortOrder) {
    match order {
        SortOrder::SavesDesc => messages.sort_by(|a, b| b.save_count.cmp(&a.save_count)),
        SortOrder::SavesAsc => messages.sort_by(|a, b| a.save_count.cmp(&b.save_count)),
        SortOrder::DateDesc => messages.sort_by(|a, b| {
            cmp_invalid_last(a.created_timestamp, b.created_timestamp, |x, y| y.cmp(&x))
        }),
        SortOrder::DateAsc => messages.sort_by(|a, b| {
            cmp_invalid_last(a.created_timestamp, b.created_timestamp, |x, y| x.cmp(&y))
        }),
    }
}

fn cmp_invalid_last(a: Option<i64>, b: Option<i64>, valid: impl Fn(i64, i64) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => valid(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
