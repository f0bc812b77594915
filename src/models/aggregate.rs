//! Aggregated view-model types handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::{Role, Scope};

/// All records sharing one group key, folded into a single entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry<I> {
    /// 1-based position in the ranked sequence (0 until ranked)
    pub rank: u32,

    /// Identity fields shared by every folded record
    #[serde(flatten)]
    pub identity: I,

    /// Sum of `usage_count` over the folded records
    pub total_usage: u64,

    /// Share of the scope total, 0.0 to 100.0
    pub percentage: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_keystone_level: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_item_level: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,
}

impl<I> AggregateEntry<I> {
    /// Create an unranked entry with no metrics.
    pub fn new(identity: I, total_usage: u64) -> Self {
        Self {
            rank: 0,
            identity,
            total_usage,
            percentage: 0.0,
            avg_keystone_level: None,
            avg_item_level: None,
            avg_score: None,
        }
    }

    /// Builder method to set the weighted keystone level.
    pub fn with_keystone_level(mut self, level: Option<f64>) -> Self {
        self.avg_keystone_level = level;
        self
    }

    /// Builder method to set the weighted item level.
    pub fn with_item_level(mut self, item_level: Option<f64>) -> Self {
        self.avg_item_level = item_level;
        self
    }

    /// Builder method to set the weighted score.
    pub fn with_score(mut self, score: Option<f64>) -> Self {
        self.avg_score = score;
        self
    }
}

/// A ranked, scoped sequence of entries in final display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedView<I> {
    /// What the percentage denominator was summed over
    pub scope: Scope,

    /// The denominator itself
    pub total_usage: u64,

    pub entries: Vec<AggregateEntry<I>>,
}

impl<I> RankedView<I> {
    /// An empty view for a scope with no data.
    pub fn empty(scope: Scope) -> Self {
        Self {
            scope,
            total_usage: 0,
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The rank-1 entry, if any.
    pub fn top(&self) -> Option<&AggregateEntry<I>> {
        self.entries.first()
    }
}

/// Identity of an item or enchant within a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChoice {
    pub slot: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Identity of a gem combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemCombination {
    /// Order-independent combination key
    pub key: String,
    /// Gem IDs in ascending order
    pub gem_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gem_count: Option<u32>,
}

/// Identity of a team composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamComposition {
    /// Order-independent composition key
    pub key: String,
    pub tank: String,
    pub healer: String,
    /// DPS specializations in ascending order
    pub dps: Vec<String>,
}

/// One row of the keystone level distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLevelBucket {
    pub keystone_level: u32,
    pub min_score: f64,
    pub max_score: f64,
}

/// Identity of a class specialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecChoice {
    pub class_name: String,
    pub spec_name: String,
    pub role: Role,
}

/// Identity of a talent build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentBuild {
    pub import_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serialization_flattens_identity() {
        let entry = AggregateEntry::new(
            SlotChoice {
                slot: "head".to_string(),
                id: 212000,
                name: Some("Crown".to_string()),
            },
            12,
        )
        .with_keystone_level(Some(11.5));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["slot"], "head");
        assert_eq!(json["id"], 212000);
        assert_eq!(json["total_usage"], 12);
        assert_eq!(json["avg_keystone_level"], 11.5);
        assert!(json.get("avg_score").is_none());
        assert!(json.get("identity").is_none());
    }

    #[test]
    fn test_entry_deserialization() {
        let json = r#"{"rank":2,"slot":"wrist","id":7,"total_usage":3,"percentage":30.0}"#;
        let entry: AggregateEntry<SlotChoice> = serde_json::from_str(json).unwrap();

        assert_eq!(entry.rank, 2);
        assert_eq!(entry.identity.slot, "wrist");
        assert_eq!(entry.identity.name, None);
        assert_eq!(entry.avg_item_level, None);
    }

    #[test]
    fn test_empty_view() {
        let view: RankedView<SpecChoice> = RankedView::empty(Scope::Global);
        assert!(view.is_empty());
        assert!(view.top().is_none());
        assert_eq!(view.total_usage, 0);
    }
}
