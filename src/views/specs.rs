//! Specialization usage by role, optionally within one dungeon.

use super::finish;
use crate::calculate::{accumulate_weighted_partial, total_weights, try_group_by_key};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::models::{AggregateEntry, RankedView, Role, Scope, SpecChoice, SpecUsage, UsageRecord};

/// Spec popularity among all records for `role`.
///
/// Percentages are of the role total.
pub fn spec_usage_by_role(
    records: &[SpecUsage],
    role: Role,
    config: &ViewConfig,
) -> Result<RankedView<SpecChoice>> {
    let mut scoped = Vec::new();
    for record in records {
        if record.role()? == role {
            scoped.push(record);
        }
    }

    let entries = aggregate_specs(scoped, role)?;
    finish(entries, Scope::Role { role }, config)
}

/// Spec popularity among records for `role` in `dungeon`.
///
/// Percentages are of the dungeon+role total. Every record must name its
/// dungeon.
pub fn spec_usage_by_dungeon_role(
    records: &[SpecUsage],
    dungeon: &str,
    role: Role,
    config: &ViewConfig,
) -> Result<RankedView<SpecChoice>> {
    let mut scoped = Vec::new();
    for record in records {
        if record.role()? == role && record.dungeon()?.eq_ignore_ascii_case(dungeon.trim()) {
            scoped.push(record);
        }
    }

    let entries = aggregate_specs(scoped, role)?;
    let scope = Scope::DungeonRole {
        dungeon: dungeon.trim().to_string(),
        role,
    };
    finish(entries, scope, config)
}

/// Class and specialization, compared field by field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SpecKey {
    class_name: String,
    spec_name: String,
}

impl std::fmt::Display for SpecKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.class_name, self.spec_name)
    }
}

fn aggregate_specs(records: Vec<&SpecUsage>, role: Role) -> Result<Vec<AggregateEntry<SpecChoice>>> {
    let by_spec = try_group_by_key(records, |r| {
        Ok(SpecKey {
            class_name: r.class_name()?.to_string(),
            spec_name: r.spec_name()?.to_string(),
        })
    })?;

    let usage = total_weights(&by_spec, |r| r.weight())?;
    let levels = accumulate_weighted_partial(&by_spec, |r| r.keystone_level(), |r| r.weight())?;
    let scores = accumulate_weighted_partial(&by_spec, |r| r.score(), |r| r.weight())?;

    let entries = by_spec
        .keys()
        .zip(usage)
        .zip(levels)
        .zip(scores)
        .map(|(((key, (_, total)), (_, level)), (_, score))| {
            AggregateEntry::new(
                SpecChoice {
                    class_name: key.class_name.clone(),
                    spec_name: key.spec_name.clone(),
                    role,
                },
                total,
            )
            .with_keystone_level(level)
            .with_score(score)
        })
        .collect();
    Ok(entries)
}
