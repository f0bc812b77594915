//! Team composition frequency.

use serde::{Deserialize, Serialize};

use super::finish;
use crate::calculate::{
    accumulate_weighted, accumulate_weighted_partial, combination_key, total_weights,
    try_group_by_key,
};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::models::{
    AggregateEntry, CompositionRecord, RankedView, Scope, TeamComposition, UsageRecord,
};

/// Which runs a composition percentage is measured against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionScope {
    /// Every record passed in.
    Global,
    /// Only records for the named dungeon.
    Dungeon(String),
}

impl CompositionScope {
    fn scope(&self) -> Scope {
        match self {
            CompositionScope::Global => Scope::Global,
            CompositionScope::Dungeon(dungeon) => Scope::Dungeon {
                dungeon: dungeon.trim().to_string(),
            },
        }
    }
}

/// Group identity of a composition: tank, healer and the sorted DPS trio.
///
/// Grouping compares the fields themselves; the joined form from `Display`
/// is only the label shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositionKey {
    pub tank: String,
    pub healer: String,
    /// Ascending
    pub dps: Vec<String>,
}

impl std::fmt::Display for CompositionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.tank,
            self.healer,
            combination_key(self.dps.as_slice(), None::<&str>)
        )
    }
}

/// Order-independent identity of a composition record.
pub fn composition_key(record: &CompositionRecord) -> Result<CompositionKey> {
    let mut dps: Vec<String> = record.dps()?.into_iter().map(str::to_string).collect();
    dps.sort();

    Ok(CompositionKey {
        tank: record.tank()?.to_string(),
        healer: record.healer()?.to_string(),
        dps,
    })
}

/// Composition popularity with weighted average score.
///
/// With [`CompositionScope::Dungeon`], records from other dungeons are
/// excluded before grouping and every record must name its dungeon.
pub fn team_compositions(
    records: &[CompositionRecord],
    scope: &CompositionScope,
    config: &ViewConfig,
) -> Result<RankedView<TeamComposition>> {
    let scoped: Vec<&CompositionRecord> = match scope {
        CompositionScope::Global => records.iter().collect(),
        CompositionScope::Dungeon(dungeon) => {
            let mut scoped = Vec::new();
            for record in records {
                if record.dungeon()?.eq_ignore_ascii_case(dungeon.trim()) {
                    scoped.push(record);
                }
            }
            scoped
        }
    };

    let by_comp = try_group_by_key(scoped, |r| composition_key(r))?;

    let usage = total_weights(&by_comp, |r| r.weight())?;
    let scores = accumulate_weighted(&by_comp, |r| r.score(), |r| r.weight())?;
    let levels = accumulate_weighted_partial(&by_comp, |r| r.keystone_level(), |r| r.weight())?;

    let entries = by_comp
        .keys()
        .zip(usage)
        .zip(scores)
        .zip(levels)
        .map(|(((key, (_, total)), (_, score)), (_, level))| {
            AggregateEntry::new(
                TeamComposition {
                    key: key.to_string(),
                    tank: key.tank.clone(),
                    healer: key.healer.clone(),
                    dps: key.dps.clone(),
                },
                total,
            )
            .with_score(Some(score))
            .with_keystone_level(level)
        })
        .collect();

    finish(entries, scope.scope(), config)
}
