//! Gem combination popularity.

use super::finish;
use crate::calculate::{
    accumulate_weighted, combination_key, group_by_slot, total_weights, try_group_by_key,
};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::models::{AggregateEntry, GemCombination, GemUsage, RankedView, Scope, UsageRecord};

/// Number of combinations shown on the overview card.
pub const GEM_OVERVIEW_TOP_N: usize = 8;

/// Most used gem combinations across all slots, top [`GEM_OVERVIEW_TOP_N`].
///
/// Percentages are of the global total. Only `min_usage` is taken from
/// `config`; the overview card always truncates.
pub fn gem_combination_overview(
    records: &[GemUsage],
    config: &ViewConfig,
) -> Result<RankedView<GemCombination>> {
    let entries = aggregate_gems(records)?;
    let overview = ViewConfig {
        top_n: GEM_OVERVIEW_TOP_N,
        ..*config
    };
    finish(entries, Scope::Global, &overview)
}

/// Gem combinations ranked within each slot.
///
/// Percentages are of the slot total; unbounded unless `config.top_n > 0`.
pub fn gem_combinations_by_slot(
    records: &[GemUsage],
    config: &ViewConfig,
) -> Result<Vec<RankedView<GemCombination>>> {
    let by_slot = group_by_slot(records)?;

    let mut views = Vec::with_capacity(by_slot.len());
    for (slot, bucket) in by_slot.iter() {
        let entries = aggregate_gems(bucket.iter().copied())?;
        views.push(finish(entries, Scope::Slot { slot: slot.clone() }, config)?);
    }
    Ok(views)
}

fn gem_key(record: &GemUsage) -> Result<String> {
    Ok(combination_key(record.gem_ids()?, record.gem_count))
}

fn aggregate_gems<'a, I>(records: I) -> Result<Vec<AggregateEntry<GemCombination>>>
where
    I: IntoIterator<Item = &'a GemUsage>,
{
    let by_combo = try_group_by_key(records, |r| gem_key(r))?;

    let usage = total_weights(&by_combo, |r| r.weight())?;
    let levels = accumulate_weighted(&by_combo, |r| r.keystone_level(), |r| r.weight())?;

    let mut entries = Vec::with_capacity(by_combo.len());
    for (((key, group), (_, total)), (_, level)) in by_combo.iter().zip(usage).zip(levels) {
        let first = group[0];
        let mut gem_ids = first.gem_ids()?.to_vec();
        gem_ids.sort_unstable();

        entries.push(
            AggregateEntry::new(
                GemCombination {
                    key: key.clone(),
                    gem_ids,
                    gem_count: first.gem_count,
                },
                total,
            )
            .with_keystone_level(Some(level)),
        );
    }
    Ok(entries)
}
