//! The aggregated archive: messages plus the normalizer that built them.
//!
//! The [`NormalizationCache`] lives as long as the archive, so topic keys
//! computed during aggregation are reused when a topic filter is applied.

use anyhow::Result;
use guardados_core::aggregate::aggregate;
use guardados_core::models::{Message, RawSaveRecord};
use guardados_core::normalize::NormalizationCache;

use crate::config::{Config, TopicsConfig};
use crate::load;

pub struct Archive {
    pub messages: Vec<Message>,
    pub normalizer: NormalizationCache,
}

impl Archive {
    /// Aggregate already-loaded records.
    pub fn from_records(records: &[RawSaveRecord], topics: &TopicsConfig) -> Self {
        let mut normalizer = NormalizationCache::new(topics.cache_capacity);
        let messages = aggregate(records, topics.policy, &mut normalizer);
        Self {
            messages,
            normalizer,
        }
    }

    /// Load records from the configured source and aggregate them.
    pub async fn load(config: &Config) -> Result<Self> {
        let records = load::load_records(config).await?;
        Ok(Self::from_records(&records, &config.topics))
    }
}
