//! Item and enchant popularity per equipment slot.

use super::finish;
use crate::calculate::{accumulate_weighted_partial, group_by_slot, total_weights, try_group_by_key};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::models::{AggregateEntry, RankedView, Scope, SlotChoice, SlotUsage, UsageRecord};

/// Ranked usage table for every slot, in order of first slot appearance.
///
/// Percentages are of the slot total; `top_n` applies per slot.
pub fn slot_usage_table(
    records: &[SlotUsage],
    config: &ViewConfig,
) -> Result<Vec<RankedView<SlotChoice>>> {
    let by_slot = group_by_slot(records)?;

    let mut views = Vec::with_capacity(by_slot.len());
    for (slot, bucket) in by_slot.iter() {
        let entries = aggregate_slot(slot, bucket)?;
        views.push(finish(entries, Scope::Slot { slot: slot.clone() }, config)?);
    }
    Ok(views)
}

/// The most used item in each slot.
pub fn best_items_by_slot(
    records: &[SlotUsage],
    config: &ViewConfig,
) -> Result<Vec<AggregateEntry<SlotChoice>>> {
    best_by_slot(records, config)
}

/// The most used enchant in each slot.
pub fn best_enchants_by_slot(
    records: &[SlotUsage],
    config: &ViewConfig,
) -> Result<Vec<AggregateEntry<SlotChoice>>> {
    best_by_slot(records, config)
}

fn best_by_slot(records: &[SlotUsage], config: &ViewConfig) -> Result<Vec<AggregateEntry<SlotChoice>>> {
    let rank_one = ViewConfig {
        top_n: 1,
        ..*config
    };
    let best = slot_usage_table(records, &rank_one)?
        .iter()
        .filter_map(|view| view.top().cloned())
        .collect();
    Ok(best)
}

fn aggregate_slot(slot: &str, records: &[&SlotUsage]) -> Result<Vec<AggregateEntry<SlotChoice>>> {
    let by_id = try_group_by_key(records.iter().copied(), |r| r.id())?;

    let usage = total_weights(&by_id, |r| r.weight())?;
    let levels = accumulate_weighted_partial(&by_id, |r| r.keystone_level(), |r| r.weight())?;
    let item_levels = accumulate_weighted_partial(&by_id, |r| r.item_level(), |r| r.weight())?;

    let entries = by_id
        .iter()
        .zip(usage)
        .zip(levels.into_iter().zip(item_levels))
        .map(|(((id, group), (_, total)), ((_, level), (_, item_level)))| {
            let name = group.iter().find_map(|r| r.name.clone());
            AggregateEntry::new(
                SlotChoice {
                    slot: slot.to_string(),
                    id: *id,
                    name,
                },
                total,
            )
            .with_keystone_level(level)
            .with_item_level(item_level)
        })
        .collect();
    Ok(entries)
}
