//! Raw usage records as returned by the statistics backend.
//!
//! Identity and weight fields are optional at the serde layer: a record with
//! a missing field still deserializes, and the accessor for that field
//! reports `InvalidRecord` when a view actually needs it.

use serde::{Deserialize, Serialize};

use super::Role;
use crate::error::{Result, StatsError};

/// A record that carries a usage count weight.
pub trait UsageRecord {
    /// Record kind used in error messages.
    const KIND: &'static str;

    /// Raw usage count as received.
    fn usage_count(&self) -> Option<i64>;

    /// Usage count, or `InvalidRecord` when absent.
    ///
    /// Sign is not checked here; the weighted fold rejects non-positive weights.
    fn weight(&self) -> Result<i64> {
        self.usage_count()
            .ok_or_else(|| StatsError::missing(Self::KIND, "usage_count"))
    }
}

/// A record bound to an equipment slot.
pub trait Slotted {
    fn slot(&self) -> Result<&str>;
}

pub(crate) fn required<'a>(
    value: &'a Option<String>,
    record: &'static str,
    field: &'static str,
) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(StatsError::missing(record, field)),
    }
}

pub(crate) fn finite(value: Option<f64>, record: &'static str, field: &'static str) -> Result<f64> {
    let value = value.ok_or_else(|| StatsError::missing(record, field))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatsError::not_finite(record, field, value))
    }
}

pub(crate) fn finite_opt(
    value: Option<f64>,
    record: &'static str,
    field: &'static str,
) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(StatsError::not_finite(record, field, v)),
        other => Ok(other),
    }
}

/// Usage of an item or enchant in one equipment slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotUsage {
    /// Equipment slot (e.g., "head", "main_hand")
    #[serde(default)]
    pub slot: Option<String>,

    /// Item or enchant ID
    #[serde(default)]
    pub id: Option<u64>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Number of runs observed with this choice
    #[serde(default)]
    pub usage_count: Option<i64>,

    /// Average keystone level of those runs
    #[serde(default)]
    pub avg_keystone_level: Option<f64>,

    /// Average equipped item level of those runs
    #[serde(default)]
    pub avg_item_level: Option<f64>,
}

impl SlotUsage {
    /// Create a new slot usage record.
    pub fn new(slot: &str, id: u64, usage_count: i64) -> Self {
        Self {
            slot: Some(slot.to_string()),
            id: Some(id),
            usage_count: Some(usage_count),
            ..Self::default()
        }
    }

    /// Builder method to set the display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Builder method to set the average keystone level.
    pub fn with_keystone_level(mut self, level: f64) -> Self {
        self.avg_keystone_level = Some(level);
        self
    }

    /// Builder method to set the average item level.
    pub fn with_item_level(mut self, item_level: f64) -> Self {
        self.avg_item_level = Some(item_level);
        self
    }

    pub fn id(&self) -> Result<u64> {
        self.id.ok_or_else(|| StatsError::missing(Self::KIND, "id"))
    }

    pub fn keystone_level(&self) -> Result<Option<f64>> {
        finite_opt(self.avg_keystone_level, Self::KIND, "avg_keystone_level")
    }

    pub fn item_level(&self) -> Result<Option<f64>> {
        finite_opt(self.avg_item_level, Self::KIND, "avg_item_level")
    }
}

impl UsageRecord for SlotUsage {
    const KIND: &'static str = "slot usage";

    fn usage_count(&self) -> Option<i64> {
        self.usage_count
    }
}

impl Slotted for SlotUsage {
    fn slot(&self) -> Result<&str> {
        required(&self.slot, Self::KIND, "slot")
    }
}

/// Usage of a set of socketed gems in one slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GemUsage {
    /// Equipment slot the gems are socketed in
    #[serde(default)]
    pub slot: Option<String>,

    /// Socketed gem IDs, in whatever order the backend returned them
    #[serde(default)]
    pub gem_ids: Option<Vec<u64>>,

    /// Number of sockets; separates "same gems, different socket count"
    #[serde(default)]
    pub gem_count: Option<u32>,

    /// Number of runs observed with this combination
    #[serde(default)]
    pub usage_count: Option<i64>,

    /// Average keystone level of those runs
    #[serde(default)]
    pub avg_keystone_level: Option<f64>,
}

impl GemUsage {
    /// Create a new gem usage record.
    pub fn new(slot: &str, gem_ids: Vec<u64>, usage_count: i64, avg_keystone_level: f64) -> Self {
        Self {
            slot: Some(slot.to_string()),
            gem_count: Some(gem_ids.len() as u32),
            gem_ids: Some(gem_ids),
            usage_count: Some(usage_count),
            avg_keystone_level: Some(avg_keystone_level),
        }
    }

    /// Builder method to override the socket count.
    pub fn with_gem_count(mut self, gem_count: u32) -> Self {
        self.gem_count = Some(gem_count);
        self
    }

    pub fn gem_ids(&self) -> Result<&[u64]> {
        self.gem_ids
            .as_deref()
            .ok_or_else(|| StatsError::missing(Self::KIND, "gem_ids"))
    }

    pub fn keystone_level(&self) -> Result<f64> {
        finite(self.avg_keystone_level, Self::KIND, "avg_keystone_level")
    }
}

impl UsageRecord for GemUsage {
    const KIND: &'static str = "gem";

    fn usage_count(&self) -> Option<i64> {
        self.usage_count
    }
}

impl Slotted for GemUsage {
    fn slot(&self) -> Result<&str> {
        required(&self.slot, Self::KIND, "slot")
    }
}

/// One observed team composition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionRecord {
    /// Dungeon the runs were in (absent on global aggregates)
    #[serde(default)]
    pub dungeon: Option<String>,

    /// Tank specialization
    #[serde(default)]
    pub tank: Option<String>,

    /// Healer specialization
    #[serde(default)]
    pub healer: Option<String>,

    /// The three damage specializations, in any order
    #[serde(default)]
    pub dps: Option<Vec<String>>,

    /// Number of runs with this composition
    #[serde(default)]
    pub usage_count: Option<i64>,

    /// Average run score
    #[serde(default)]
    pub avg_score: Option<f64>,

    /// Average keystone level
    #[serde(default)]
    pub avg_keystone_level: Option<f64>,
}

impl CompositionRecord {
    /// Create a new composition record.
    pub fn new(tank: &str, healer: &str, dps: [&str; 3], usage_count: i64, avg_score: f64) -> Self {
        Self {
            tank: Some(tank.to_string()),
            healer: Some(healer.to_string()),
            dps: Some(dps.iter().map(|s| s.to_string()).collect()),
            usage_count: Some(usage_count),
            avg_score: Some(avg_score),
            ..Self::default()
        }
    }

    /// Builder method to set the dungeon.
    pub fn with_dungeon(mut self, dungeon: &str) -> Self {
        self.dungeon = Some(dungeon.to_string());
        self
    }

    /// Builder method to set the average keystone level.
    pub fn with_keystone_level(mut self, level: f64) -> Self {
        self.avg_keystone_level = Some(level);
        self
    }

    pub fn dungeon(&self) -> Result<&str> {
        required(&self.dungeon, Self::KIND, "dungeon")
    }

    pub fn tank(&self) -> Result<&str> {
        required(&self.tank, Self::KIND, "tank")
    }

    pub fn healer(&self) -> Result<&str> {
        required(&self.healer, Self::KIND, "healer")
    }

    /// The DPS trio; exactly three non-empty specializations.
    pub fn dps(&self) -> Result<Vec<&str>> {
        let dps = self
            .dps
            .as_ref()
            .ok_or_else(|| StatsError::missing(Self::KIND, "dps"))?;
        if dps.len() != 3 {
            return Err(StatsError::InvalidRecord {
                record: Self::KIND,
                field: "dps",
                reason: format!("must contain exactly 3 specs, got {}", dps.len()),
            });
        }
        let trio: Vec<&str> = dps.iter().map(|s| s.trim()).collect();
        if trio.iter().any(|s| s.is_empty()) {
            return Err(StatsError::missing(Self::KIND, "dps"));
        }
        Ok(trio)
    }

    pub fn score(&self) -> Result<f64> {
        finite(self.avg_score, Self::KIND, "avg_score")
    }

    pub fn keystone_level(&self) -> Result<Option<f64>> {
        finite_opt(self.avg_keystone_level, Self::KIND, "avg_keystone_level")
    }
}

impl UsageRecord for CompositionRecord {
    const KIND: &'static str = "composition";

    fn usage_count(&self) -> Option<i64> {
        self.usage_count
    }
}

/// Runs completed at one keystone level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyLevelRecord {
    #[serde(default)]
    pub keystone_level: Option<u32>,

    #[serde(default)]
    pub usage_count: Option<i64>,

    #[serde(default)]
    pub avg_score: Option<f64>,

    /// Lowest score in the sample; falls back to `avg_score`
    #[serde(default)]
    pub min_score: Option<f64>,

    /// Highest score in the sample; falls back to `avg_score`
    #[serde(default)]
    pub max_score: Option<f64>,
}

impl KeyLevelRecord {
    /// Create a new key level record.
    pub fn new(keystone_level: u32, usage_count: i64, avg_score: f64) -> Self {
        Self {
            keystone_level: Some(keystone_level),
            usage_count: Some(usage_count),
            avg_score: Some(avg_score),
            ..Self::default()
        }
    }

    /// Builder method to set the score range.
    pub fn with_score_range(mut self, min: f64, max: f64) -> Self {
        self.min_score = Some(min);
        self.max_score = Some(max);
        self
    }

    pub fn level(&self) -> Result<u32> {
        self.keystone_level
            .ok_or_else(|| StatsError::missing(Self::KIND, "keystone_level"))
    }

    pub fn score(&self) -> Result<f64> {
        finite(self.avg_score, Self::KIND, "avg_score")
    }

    pub fn min_score(&self) -> Result<f64> {
        match finite_opt(self.min_score, Self::KIND, "min_score")? {
            Some(min) => Ok(min),
            None => self.score(),
        }
    }

    pub fn max_score(&self) -> Result<f64> {
        match finite_opt(self.max_score, Self::KIND, "max_score")? {
            Some(max) => Ok(max),
            None => self.score(),
        }
    }
}

impl UsageRecord for KeyLevelRecord {
    const KIND: &'static str = "key level";

    fn usage_count(&self) -> Option<i64> {
        self.usage_count
    }
}

/// Usage of a class specialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecUsage {
    #[serde(default)]
    pub class_name: Option<String>,

    #[serde(default)]
    pub spec_name: Option<String>,

    #[serde(default)]
    pub role: Option<Role>,

    /// Dungeon the runs were in (absent on cross-dungeon aggregates)
    #[serde(default)]
    pub dungeon: Option<String>,

    #[serde(default)]
    pub usage_count: Option<i64>,

    #[serde(default)]
    pub avg_keystone_level: Option<f64>,

    #[serde(default)]
    pub avg_score: Option<f64>,
}

impl SpecUsage {
    /// Create a new spec usage record.
    pub fn new(class_name: &str, spec_name: &str, role: Role, usage_count: i64) -> Self {
        Self {
            class_name: Some(class_name.to_string()),
            spec_name: Some(spec_name.to_string()),
            role: Some(role),
            usage_count: Some(usage_count),
            ..Self::default()
        }
    }

    /// Builder method to set the dungeon.
    pub fn with_dungeon(mut self, dungeon: &str) -> Self {
        self.dungeon = Some(dungeon.to_string());
        self
    }

    /// Builder method to set the average score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.avg_score = Some(score);
        self
    }

    /// Builder method to set the average keystone level.
    pub fn with_keystone_level(mut self, level: f64) -> Self {
        self.avg_keystone_level = Some(level);
        self
    }

    pub fn class_name(&self) -> Result<&str> {
        required(&self.class_name, Self::KIND, "class_name")
    }

    pub fn spec_name(&self) -> Result<&str> {
        required(&self.spec_name, Self::KIND, "spec_name")
    }

    pub fn role(&self) -> Result<Role> {
        self.role.ok_or_else(|| StatsError::missing(Self::KIND, "role"))
    }

    pub fn dungeon(&self) -> Result<&str> {
        required(&self.dungeon, Self::KIND, "dungeon")
    }

    pub fn keystone_level(&self) -> Result<Option<f64>> {
        finite_opt(self.avg_keystone_level, Self::KIND, "avg_keystone_level")
    }

    pub fn score(&self) -> Result<Option<f64>> {
        finite_opt(self.avg_score, Self::KIND, "avg_score")
    }
}

impl UsageRecord for SpecUsage {
    const KIND: &'static str = "spec";

    fn usage_count(&self) -> Option<i64> {
        self.usage_count
    }
}

/// Usage of a talent build, identified by its in-game import string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalentBuildUsage {
    #[serde(default)]
    pub class_name: Option<String>,

    #[serde(default)]
    pub spec_name: Option<String>,

    /// Talent loadout export string
    #[serde(default)]
    pub import_string: Option<String>,

    /// Optional build label (e.g., "Hero: Deathbringer")
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub usage_count: Option<i64>,

    #[serde(default)]
    pub avg_keystone_level: Option<f64>,
}

impl TalentBuildUsage {
    /// Create a new talent build record.
    pub fn new(class_name: &str, spec_name: &str, import_string: &str, usage_count: i64) -> Self {
        Self {
            class_name: Some(class_name.to_string()),
            spec_name: Some(spec_name.to_string()),
            import_string: Some(import_string.to_string()),
            usage_count: Some(usage_count),
            ..Self::default()
        }
    }

    /// Builder method to set the average keystone level.
    pub fn with_keystone_level(mut self, level: f64) -> Self {
        self.avg_keystone_level = Some(level);
        self
    }

    /// Builder method to set the build label.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn class_name(&self) -> Result<&str> {
        required(&self.class_name, Self::KIND, "class_name")
    }

    pub fn spec_name(&self) -> Result<&str> {
        required(&self.spec_name, Self::KIND, "spec_name")
    }

    pub fn import_string(&self) -> Result<&str> {
        required(&self.import_string, Self::KIND, "import_string")
    }

    pub fn keystone_level(&self) -> Result<Option<f64>> {
        finite_opt(self.avg_keystone_level, Self::KIND, "avg_keystone_level")
    }
}

impl UsageRecord for TalentBuildUsage {
    const KIND: &'static str = "talent build";

    fn usage_count(&self) -> Option<i64> {
        self.usage_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_usage_deserialize_partial() {
        let record: SlotUsage =
            serde_json::from_str(r#"{"slot": "head", "id": 212000, "usage_count": 4}"#).unwrap();

        assert_eq!(record.slot().unwrap(), "head");
        assert_eq!(record.id().unwrap(), 212000);
        assert_eq!(record.weight().unwrap(), 4);
        assert_eq!(record.keystone_level().unwrap(), None);
    }

    #[test]
    fn test_missing_usage_count_is_invalid_record() {
        let record: SlotUsage = serde_json::from_str(r#"{"slot": "head", "id": 1}"#).unwrap();

        match record.weight() {
            Err(StatsError::InvalidRecord { field, .. }) => assert_eq!(field, "usage_count"),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_identity_is_missing() {
        let record = SlotUsage::new("   ", 1, 1);
        assert!(matches!(
            record.slot(),
            Err(StatsError::InvalidRecord { field: "slot", .. })
        ));
    }

    #[test]
    fn test_composition_dps_validation() {
        let ok = CompositionRecord::new("Blood", "Discipline", ["Fire", "Frost", "Arcane"], 1, 300.0);
        assert_eq!(ok.dps().unwrap(), vec!["Fire", "Frost", "Arcane"]);

        let mut short = ok.clone();
        short.dps = Some(vec!["Fire".to_string(), "Frost".to_string()]);
        assert!(matches!(
            short.dps(),
            Err(StatsError::InvalidRecord { field: "dps", .. })
        ));

        let mut blank = ok;
        blank.dps = Some(vec!["Fire".to_string(), "".to_string(), "Arcane".to_string()]);
        assert!(blank.dps().is_err());
    }

    #[test]
    fn test_key_level_score_range_fallback() {
        let plain = KeyLevelRecord::new(12, 3, 310.0);
        assert_eq!(plain.min_score().unwrap(), 310.0);
        assert_eq!(plain.max_score().unwrap(), 310.0);

        let ranged = plain.with_score_range(290.0, 330.0);
        assert_eq!(ranged.min_score().unwrap(), 290.0);
        assert_eq!(ranged.max_score().unwrap(), 330.0);
    }

    #[test]
    fn test_non_finite_metric_rejected() {
        let record = GemUsage::new("neck", vec![1, 2], 1, f64::INFINITY);
        assert!(matches!(
            record.keystone_level(),
            Err(StatsError::InvalidRecord {
                field: "avg_keystone_level",
                ..
            })
        ));
    }

    #[test]
    fn test_spec_usage_role_deserialize() {
        let record: SpecUsage = serde_json::from_str(
            r#"{"class_name": "Priest", "spec_name": "Discipline", "role": "healer", "usage_count": 9}"#,
        )
        .unwrap();
        assert_eq!(record.role().unwrap(), Role::Healer);
        assert!(record.dungeon().is_err());
    }
}
