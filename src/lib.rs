//! # Keystone Meta
//!
//! Statistics aggregation engine for a Mythic+ dashboard.
//!
//! ## Architecture
//!
//! - **models**: Usage records in, ranked aggregate entries out
//! - **calculate**: Grouping, combination keys, weighted averages, ranking, percentages
//! - **views**: Composite statistics views built from the primitives
//! - **error**: Core error taxonomy
//! - **config**: Configuration loading and validation
//! - **storage**: Loading saved record dumps (JSON / JSONL)
//! - **api**: REST API endpoints
//!
//! `calculate`, `views` and `models` are pure: no I/O, no logging, no shared
//! state. Identical input always produces identical output.

pub mod api;
pub mod calculate;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod views;

pub use error::{Result, StatsError};
pub use models::*;
