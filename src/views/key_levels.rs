//! Keystone level distribution.

use super::finish_by;
use crate::calculate::{accumulate_weighted, total_weights, try_group_by_key};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::models::{AggregateEntry, KeyLevelBucket, KeyLevelRecord, RankedView, Scope, UsageRecord};

/// Run counts per keystone level, highest level first.
///
/// Percentages are of the whole dataset. Each row carries the weighted
/// average score and the lowest/highest score seen at that level.
pub fn key_level_distribution(
    records: &[KeyLevelRecord],
    config: &ViewConfig,
) -> Result<RankedView<KeyLevelBucket>> {
    let by_level = try_group_by_key(records, |r| r.level())?;

    let usage = total_weights(&by_level, |r| r.weight())?;
    let scores = accumulate_weighted(&by_level, |r| r.score(), |r| r.weight())?;

    let mut entries = Vec::with_capacity(by_level.len());
    for (((level, group), (_, total)), (_, score)) in by_level.iter().zip(usage).zip(scores) {
        let mut min_score = f64::INFINITY;
        let mut max_score = f64::NEG_INFINITY;
        for record in group {
            min_score = min_score.min(record.min_score()?);
            max_score = max_score.max(record.max_score()?);
        }

        entries.push(
            AggregateEntry::new(
                KeyLevelBucket {
                    keystone_level: *level,
                    min_score,
                    max_score,
                },
                total,
            )
            .with_score(Some(score)),
        );
    }

    finish_by(entries, Scope::Global, config, |e| {
        e.identity.keystone_level as f64
    })
}
