//! The `list` command: filter, sort, and page through messages.

use anyhow::Result;
use chrono::{DateTime, Utc};
use guardados_core::models::Message;
use guardados_core::normalize::Normalizer;
use guardados_core::paginate::{clamp_page, paginate, Pagination};
use guardados_core::query::{apply_filters, FilterState};
use guardados_core::stats::Statistics;
use serde::Serialize;
use tracing::warn;

use crate::archive::Archive;
use crate::config::Config;
use crate::render;

/// One rendered page of results.
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    /// 1-based page actually shown (after clamping).
    pub page: usize,
    pub per_page: usize,
    pub pagination: Pagination,
    pub stats: Statistics,
    pub messages: Vec<&'a Message>,
}

/// Filter, sort, and slice `messages` into a page.
///
/// A `page` outside the filtered range falls back to page 1.
pub fn build_page<'a, N: Normalizer + ?Sized>(
    messages: &'a [Message],
    normalizer: &mut N,
    filters: &FilterState,
    page: usize,
    per_page: usize,
    now: DateTime<Utc>,
) -> PageView<'a> {
    let filtered = apply_filters(messages, filters, now, normalizer);
    let stats = Statistics::compute(messages, filtered.len());

    let total_pages = paginate(filtered.len(), 1, per_page).total_pages;
    let current = clamp_page(page, total_pages);
    if current != page {
        warn!(requested = page, total_pages, "page out of range, showing page 1");
    }

    let pagination = paginate(filtered.len(), current, per_page);
    let page_messages = pagination.slice(&filtered).to_vec();

    PageView {
        page: current,
        per_page,
        pagination,
        stats,
        messages: page_messages,
    }
}

/// CLI entry point for `guardados list`.
pub async fn run_list(
    config: &Config,
    filters: &FilterState,
    page: usize,
    per_page: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut archive = Archive::load(config).await?;
    let per_page = per_page.unwrap_or(config.browse.per_page).max(1);

    let view = build_page(
        &archive.messages,
        &mut archive.normalizer,
        filters,
        page,
        per_page,
        Utc::now(),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.messages.is_empty() {
        println!("No se encontraron mensajes.");
        return Ok(());
    }

    println!(
        "Mostrando {} de {} mensajes ({} guardados en total)",
        view.stats.showing, view.stats.total_messages, view.stats.total_saves
    );
    println!();

    for message in &view.messages {
        render::print_message(message, config.browse.max_content_length);
        println!();
    }

    if view.pagination.total_pages > 1 {
        let mut footer = format!("Página {} de {}", view.page, view.pagination.total_pages);
        if view.pagination.has_prev {
            footer.push_str(&format!("  · anterior: --page {}", view.page - 1));
        }
        if view.pagination.has_next {
            footer.push_str(&format!("  · siguiente: --page {}", view.page + 1));
        }
        println!("{}", footer);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use guardados_core::models::RawSaveRecord;
    use guardados_core::query::SortOrder;

    use crate::config::TopicsConfig;

    fn archive(n: usize) -> Archive {
        let records: Vec<RawSaveRecord> = (0..n)
            .map(|i| RawSaveRecord {
                message_id: Some(format!("m{}", i)),
                author_name: Some("Ana".to_string()),
                content: Some(format!("Mensaje {}", i)),
                created: Some(format!("2025-06-{:02}T10:00:00Z", (i % 28) + 1)),
                user: Some("luis".to_string()),
                topic: Some(if i % 2 == 0 { "Par" } else { "Impar" }.to_string()),
                ..Default::default()
            })
            .collect();
        Archive::from_records(&records, &TopicsConfig::default())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_build_page_slices_and_counts() {
        let mut a = archive(45);
        let view = build_page(&a.messages, &mut a.normalizer, &FilterState::default(), 3, 20, now());
        assert_eq!(view.page, 3);
        assert_eq!(view.messages.len(), 5);
        assert_eq!(view.pagination.total_pages, 3);
        assert!(!view.pagination.has_next);
        assert_eq!(view.stats.total_messages, 45);
        assert_eq!(view.stats.showing, 45);
    }

    #[test]
    fn test_build_page_resets_out_of_range_page() {
        let mut a = archive(45);
        let filters = FilterState {
            topic: Some("par".to_string()),
            ..Default::default()
        };
        // 23 matches -> 2 pages of 20; page 3 falls back to 1.
        let view = build_page(&a.messages, &mut a.normalizer, &filters, 3, 20, now());
        assert_eq!(view.page, 1);
        assert_eq!(view.stats.showing, 23);
        assert_eq!(view.messages.len(), 20);
        assert!(view.pagination.has_next);
    }

    #[test]
    fn test_build_page_empty_result() {
        let mut a = archive(5);
        let filters = FilterState {
            search_term: "nada que ver".to_string(),
            sort_order: SortOrder::DateDesc,
            ..Default::default()
        };
        let view = build_page(&a.messages, &mut a.normalizer, &filters, 1, 20, now());
        assert!(view.messages.is_empty());
        assert_eq!(view.pagination.total_pages, 0);
        assert_eq!(view.page, 1);
    }
}
