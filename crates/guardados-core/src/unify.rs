//! Topic unification across the saves of one message.
//!
//! Different users tag the same message with different spellings of the
//! same topic (`"Salud"`, `"salud"`, `"SALUD"`). Unification groups tags
//! by normalized key and reports one [`UnifiedTopic`] per group.
//!
//! # Algorithm
//!
//! 1. Extract the tags of every save (see [`extract_tags`]).
//! 2. Group tags by normalized key in first-encountered order. Each group
//!    keeps every original spelling (repeats included) and one
//!    contribution per save that used the key.
//! 3. Pick the canonical spelling: the most frequent exact string, ties
//!    going to the spelling seen first.
//! 4. `count` = number of contributing saves.
//! 5. Sort by `count` descending. The sort is stable, so equal counts keep
//!    first-encountered key order.

use std::collections::HashMap;

use crate::models::{SaveEntry, TopicContribution, UnifiedTopic};
use crate::normalize::{extract_tags, Normalizer, TagPolicy};

/// Working state for one normalized key.
struct TopicGroup {
    key: String,
    spellings: Vec<String>,
    contributions: Vec<TopicContribution>,
    last_save: Option<usize>,
}

/// Unify the topic tags of a message's saves.
pub fn unify_topics<N: Normalizer + ?Sized>(
    saved_by: &[SaveEntry],
    policy: TagPolicy,
    normalizer: &mut N,
) -> Vec<UnifiedTopic> {
    // Insertion-ordered map: groups in encounter order, index by key.
    let mut groups: Vec<TopicGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (save_idx, save) in saved_by.iter().enumerate() {
        for tag in extract_tags(&save.topics, policy) {
            let key = normalizer.normalize_key(&tag);
            if key.is_empty() {
                continue;
            }

            let pos = match index.get(&key) {
                Some(&pos) => pos,
                None => {
                    groups.push(TopicGroup {
                        key: key.clone(),
                        spellings: Vec::new(),
                        contributions: Vec::new(),
                        last_save: None,
                    });
                    index.insert(key, groups.len() - 1);
                    groups.len() - 1
                }
            };

            let group = &mut groups[pos];
            if group.last_save != Some(save_idx) {
                group.contributions.push(TopicContribution {
                    user: save.user.clone(),
                    original_topic: tag.clone(),
                });
                group.last_save = Some(save_idx);
            }
            group.spellings.push(tag);
        }
    }

    let mut topics: Vec<UnifiedTopic> = groups
        .into_iter()
        .map(|group| UnifiedTopic {
            canonical_topic: choose_canonical(&group.spellings)
                .unwrap_or(group.key.as_str())
                .to_string(),
            normalized_key: group.key,
            count: group.contributions.len(),
            users: group.contributions,
        })
        .collect();

    topics.sort_by(|a, b| b.count.cmp(&a.count));
    topics
}

/// Pick the display spelling among a group's variants.
///
/// Returns the most frequent exact (case-sensitive) string. On a tie the
/// candidate that occurred first wins. `None` only for an empty slice.
pub fn choose_canonical(spellings: &[String]) -> Option<&str> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for s in spellings {
        match tally.iter_mut().find(|(seen, _)| *seen == s.as_str()) {
            Some((_, n)) => *n += 1,
            None => tally.push((s.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (spelling, n) in tally {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((spelling, n));
        }
    }
    best.map(|(spelling, _)| spelling)
}
