//! Composite statistics views.
//!
//! Each view is a deterministic pipeline over the [`crate::calculate`]
//! primitives: group, fold usage and weighted metrics, normalize against a
//! named scope, drop groups under `min_usage`, then rank and truncate.
//!
//! Empty input yields empty views. Malformed records fail the whole view.

mod compositions;
mod gems;
mod key_levels;
mod slots;
mod specs;
mod talents;

pub use compositions::*;
pub use gems::*;
pub use key_levels::*;
pub use slots::*;
pub use specs::*;
pub use talents::*;

use crate::calculate::{rank_by, total_usage, with_percentage, SortField};
use crate::config::ViewConfig;
use crate::error::{Result, StatsError};
use crate::models::{AggregateEntry, RankedView, Scope};

/// Normalize, filter and rank entries by usage.
pub(crate) fn finish<I>(
    entries: Vec<AggregateEntry<I>>,
    scope: Scope,
    config: &ViewConfig,
) -> Result<RankedView<I>> {
    finish_by(entries, scope, config, |e| SortField::Usage.value_of(e))
}

/// Normalize, filter and rank entries by an arbitrary key.
///
/// The percentage denominator is the whole scope, summed once before
/// `min_usage` drops anything.
pub(crate) fn finish_by<I, F>(
    entries: Vec<AggregateEntry<I>>,
    scope: Scope,
    config: &ViewConfig,
    key: F,
) -> Result<RankedView<I>>
where
    F: Fn(&AggregateEntry<I>) -> f64,
{
    if entries.is_empty() {
        return Ok(RankedView::empty(scope));
    }

    let total = total_usage(&entries).ok_or_else(|| StatsError::UsageOverflow {
        key: scope.to_string(),
    })?;
    let entries: Vec<_> = with_percentage(entries, total)
        .into_iter()
        .filter(|e| e.total_usage >= config.min_usage)
        .collect();

    Ok(RankedView {
        scope,
        total_usage: total,
        entries: rank_by(entries, key, config.top_n),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(usages: &[u64]) -> Vec<AggregateEntry<usize>> {
        usages
            .iter()
            .enumerate()
            .map(|(i, &u)| AggregateEntry::new(i, u))
            .collect()
    }

    #[test]
    fn test_finish_denominator_ignores_min_usage() {
        let view = finish(entries(&[6, 2, 2]), Scope::Global, &ViewConfig::new(0, 3)).unwrap();

        assert_eq!(view.total_usage, 10);
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].percentage, 60.0);
        assert_eq!(view.entries[0].rank, 1);
    }

    #[test]
    fn test_finish_truncates_after_ranking() {
        let view = finish(entries(&[1, 5, 3]), Scope::Global, &ViewConfig::new(2, 0)).unwrap();

        let ids: Vec<_> = view.entries.iter().map(|e| e.identity).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_finish_empty() {
        let view = finish(entries(&[]), Scope::Global, &ViewConfig::default()).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.total_usage, 0);
    }

    #[test]
    fn test_finish_scope_total_overflow() {
        let scope = Scope::Slot {
            slot: "head".to_string(),
        };
        let err = finish(entries(&[u64::MAX, 1]), scope, &ViewConfig::default()).unwrap_err();

        assert_eq!(
            err,
            StatsError::UsageOverflow {
                key: "slot:head".to_string()
            }
        );
    }
}
