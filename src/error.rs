//! Error taxonomy for the aggregation core.
//!
//! Empty input is never an error: views return empty sequences for it.
//! These variants cover upstream contract violations only.

use thiserror::Error;

/// Errors raised by the statistics core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A required identity, weight or metric field is missing or non-numeric.
    #[error("Invalid {record} record: field `{field}` {reason}")]
    InvalidRecord {
        record: &'static str,
        field: &'static str,
        reason: String,
    },

    /// A weight that must be positive was zero or negative.
    #[error("Invalid weight {weight} for group `{key}`: weights must be positive")]
    InvalidWeight { key: String, weight: i64 },

    /// Summed usage counts no longer fit in a `u64`.
    #[error("Total usage overflows for `{key}`")]
    UsageOverflow { key: String },
}

impl StatsError {
    pub(crate) fn missing(record: &'static str, field: &'static str) -> Self {
        StatsError::InvalidRecord {
            record,
            field,
            reason: "is missing".to_string(),
        }
    }

    pub(crate) fn not_finite(record: &'static str, field: &'static str, value: f64) -> Self {
        StatsError::InvalidRecord {
            record,
            field,
            reason: format!("is not a finite number ({})", value),
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, StatsError>;
