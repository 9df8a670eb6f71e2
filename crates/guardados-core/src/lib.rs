//! # Guardados Core
//!
//! Pure, I/O-free logic for the saved-messages browser: raw record models,
//! topic normalization and unification, message aggregation, filtering,
//! sorting, and pagination.
//!
//! This crate contains no tokio, reqwest, filesystem I/O, or other
//! native-only dependencies. Fetching the raw export and rendering results
//! are the caller's job.
//!
//! ## Pipeline
//!
//! ```text
//! raw records ──▶ aggregate ──▶ messages ──▶ apply_filters ──▶ paginate ──▶ page
//!                    │                            │
//!                    └── unify_topics ── normalize┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use guardados_core::aggregate::aggregate;
//! use guardados_core::models::RawSaveRecord;
//! use guardados_core::normalize::{PureNormalizer, TagPolicy};
//!
//! let records: Vec<RawSaveRecord> = serde_json::from_str(r#"[
//!     {"Message ID": 1, "Author name": "Ana", "Content": "Hola", "User": "luis", "Topic": "Salud"},
//!     {"Message ID": 1, "Author name": "Ana", "Content": "Hola", "User": "eva", "Topic": "salud"}
//! ]"#).unwrap();
//!
//! let messages = aggregate(&records, TagPolicy::All, &mut PureNormalizer);
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].save_count, 2);
//! assert_eq!(messages[0].unified_topics[0].count, 2);
//! ```

pub mod aggregate;
pub mod collate;
pub mod models;
pub mod normalize;
pub mod paginate;
pub mod query;
pub mod stats;
pub mod unify;
