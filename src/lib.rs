//! # Guardados
//!
//! Browse a community's saved messages from the command line.
//!
//! The remote export holds one row per user bookmark, so a message saved
//! by five people arrives five times, each copy with that user's own topic
//! tags. Guardados folds those rows into one message per id, unifies the
//! differently spelled tags, and lets you search, filter, sort, and page
//! through the result.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────────────┐   ┌────────────┐
//! │ JSON export │──▶│ guardados-core           │──▶│    CLI     │
//! │ file / HTTP │   │ aggregate → filter → page│   │ (guardados)│
//! └─────────────┘   └──────────────────────────┘   └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! guardados list --topic madrid --sort date-desc
//! guardados list --search bici --time week --page 2
//! guardados topics --limit 10
//! guardados export --output site/guardados.json
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`load`] | Reading or fetching the JSON export |
//! | [`archive`] | Aggregated messages plus their normalization cache |
//! | [`browse`] | `list`: filter, sort, paginate |
//! | [`catalog`] | `authors` and `topics` |
//! | [`stats`] | Archive summary |
//! | [`export`] | JSON export of the aggregated archive |
//! | [`render`] | Terminal formatting helpers |

pub mod archive;
pub mod browse;
pub mod catalog;
pub mod config;
pub mod export;
pub mod load;
pub mod render;
pub mod stats;
