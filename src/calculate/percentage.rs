//! Percentage normalization within a scope.

use crate::models::AggregateEntry;

/// `100 * value / total`, or 0 when the scope is empty.
pub fn percent_of(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * value as f64 / total as f64
    }
}

/// Sum of `total_usage` across entries, or `None` on overflow.
pub fn total_usage<I>(entries: &[AggregateEntry<I>]) -> Option<u64> {
    entries
        .iter()
        .try_fold(0u64, |sum, e| sum.checked_add(e.total_usage))
}

/// Set each entry's percentage against the scope denominator `total`.
///
/// Callers compute the denominator once for the whole scope, so entries
/// dropped later do not change it.
pub fn with_percentage<I>(mut entries: Vec<AggregateEntry<I>>, total: u64) -> Vec<AggregateEntry<I>> {
    for entry in entries.iter_mut() {
        entry.percentage = percent_of(entry.total_usage, total);
    }
    entries
}
