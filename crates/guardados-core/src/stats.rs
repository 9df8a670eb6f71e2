//! Header counters for the browser view.

use serde::Serialize;

use crate::models::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Unique messages after aggregation.
    pub total_messages: usize,
    /// Sum of `save_count` over all messages.
    pub total_saves: usize,
    /// Messages matching the current filters.
    pub showing: usize,
}

impl Statistics {
    pub fn compute(messages: &[Message], showing: usize) -> Self {
        Self {
            total_messages: messages.len(),
            total_saves: messages.iter().map(|m| m.save_count).sum(),
            showing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::RawSaveRecord;
    use crate::normalize::{PureNormalizer, TagPolicy};

    #[test]
    fn test_totals() {
        let records: Vec<RawSaveRecord> = serde_json::from_str(
            r#"[
                {"Message ID": 1, "Author name": "Ana", "Content": "a", "User": "x"},
                {"Message ID": 1, "Author name": "Ana", "Content": "a", "User": "y"},
                {"Message ID": 2, "Author name": "Bea", "Content": "b", "User": "x"},
                {"Message ID": 3, "Author name": "Bea", "Content": "", "User": "x"}
            ]"#,
        )
        .unwrap();
        let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
        let stats = Statistics::compute(&messages, 1);
        assert_eq!(
            stats,
            Statistics {
                total_messages: 2,
                total_saves: 3,
                showing: 1,
            }
        );
    }

    #[test]
    fn test_empty() {
        let stats = Statistics::compute(&[], 0);
        assert_eq!(stats.total_messages, 0);
        assert_eq!(stats.total_saves, 0);
    }
}
