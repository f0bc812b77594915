//! Ranking and top-N truncation.

use serde::{Deserialize, Serialize};

use crate::models::AggregateEntry;

/// Field a ranked view is sorted on, descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Usage,
    Percentage,
    Score,
    KeystoneLevel,
}

impl SortField {
    /// Sort value of an entry; a missing metric sorts last.
    pub fn value_of<I>(&self, entry: &AggregateEntry<I>) -> f64 {
        match self {
            SortField::Usage => entry.total_usage as f64,
            SortField::Percentage => entry.percentage,
            SortField::Score => entry.avg_score.unwrap_or(f64::NEG_INFINITY),
            SortField::KeystoneLevel => entry.avg_keystone_level.unwrap_or(f64::NEG_INFINITY),
        }
    }
}

/// Sort descending by `field`, assign ranks, then keep the first `top_n`.
pub fn rank<I>(entries: Vec<AggregateEntry<I>>, field: SortField, top_n: usize) -> Vec<AggregateEntry<I>> {
    rank_by(entries, |e| field.value_of(e), top_n)
}

/// Sort descending by an arbitrary key, assign ranks, then keep the first
/// `top_n` (0 keeps everything).
///
/// The sort is stable: tied entries keep their incoming order. Ranks are
/// `index + 1` over the full sorted sequence, assigned before truncation.
pub fn rank_by<I, F>(mut entries: Vec<AggregateEntry<I>>, key: F, top_n: usize) -> Vec<AggregateEntry<I>>
where
    F: Fn(&AggregateEntry<I>) -> f64,
{
    entries.sort_by(|a, b| key(b).total_cmp(&key(a)));

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }

    if top_n > 0 {
        entries.truncate(top_n);
    }
    entries
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
    fn test_stable_tie_break() {
        let ranked = rank(entries(&[10, 10, 5]), SortField::Usage, 0);

        let order: Vec<_> = ranked.iter().map(|e| (e.identity, e.rank)).collect();
        assert_eq!(order, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_descending_sort() {
        let ranked = rank(entries(&[3, 9, 1, 9, 4]), SortField::Usage, 0);

        let ids: Vec<_> = ranked.iter().map(|e| e.identity).collect();
        assert_eq!(ids, vec![1, 3, 4, 0, 2]);
        let ranks: Vec<_> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_top_n_truncation_preserves_rank() {
        let all = rank(entries(&[5, 4, 3, 2, 1]), SortField::Usage, 0);
        assert_eq!(all.len(), 5);

        let top = rank(entries(&[5, 4, 3, 2, 1]), SortField::Usage, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0], all[0]);
        assert_eq!(top[0].rank, 1);
    }

    #[test]
    fn test_top_n_larger_than_input() {
        let ranked = rank(entries(&[2, 1]), SortField::Usage, 10);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_rank_empty() {
        let ranked = rank(entries(&[]), SortField::Usage, 3);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_missing_score_sorts_last() {
        let mut input = entries(&[1, 1, 1]);
        input[0].avg_score = None;
        input[1].avg_score = Some(250.0);
        input[2].avg_score = Some(310.0);

        let ranked = rank(input, SortField::Score, 0);
        let ids: Vec<_> = ranked.iter().map(|e| e.identity).collect();
        assert_eq!(ids, vec![2, 1, 0]);
    }

    #[test]
    fn test_rank_by_custom_key() {
        let ranked = rank_by(entries(&[1, 2, 3]), |e| -(e.total_usage as f64), 0);
        let ids: Vec<_> = ranked.iter().map(|e| e.identity).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_field_serialization() {
        let json = serde_json::to_string(&SortField::KeystoneLevel).unwrap();
        assert_eq!(json, "\"keystone_level\"");
    }
}
