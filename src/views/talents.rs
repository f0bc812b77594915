//! Talent build popularity for one specialization.

use super::finish;
use crate::calculate::{accumulate_weighted_partial, total_weights, try_group_by_key};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::models::{AggregateEntry, RankedView, Scope, TalentBuild, TalentBuildUsage, UsageRecord};

/// Talent builds of `class_name`/`spec_name`, ranked by usage.
///
/// Percentages are of the spec total.
pub fn talent_builds(
    records: &[TalentBuildUsage],
    class_name: &str,
    spec_name: &str,
    config: &ViewConfig,
) -> Result<RankedView<TalentBuild>> {
    let (class_name, spec_name) = (class_name.trim(), spec_name.trim());

    let mut scoped = Vec::new();
    for record in records {
        if record.class_name()?.eq_ignore_ascii_case(class_name)
            && record.spec_name()?.eq_ignore_ascii_case(spec_name)
        {
            scoped.push(record);
        }
    }

    let by_build = try_group_by_key(scoped, |r| r.import_string().map(str::to_string))?;

    let usage = total_weights(&by_build, |r| r.weight())?;
    let levels = accumulate_weighted_partial(&by_build, |r| r.keystone_level(), |r| r.weight())?;

    let entries: Vec<_> = by_build
        .iter()
        .zip(usage)
        .zip(levels)
        .map(|(((import_string, group), (_, total)), (_, level))| {
            AggregateEntry::new(
                TalentBuild {
                    import_string: import_string.clone(),
                    name: group.iter().find_map(|r| r.name.clone()),
                },
                total,
            )
            .with_keystone_level(level)
        })
        .collect();

    let scope = Scope::Spec {
        class_name: class_name.to_string(),
        spec_name: spec_name.to_string(),
    };
    finish(entries, scope, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_talent_builds() {
        let records = vec![
            TalentBuildUsage::new("Mage", "Frost", "CAQAAAAAAA", 2).with_keystone_level(11.0),
            TalentBuildUsage::new("Mage", "Fire", "CGQAAAAAAA", 50),
            TalentBuildUsage::new("Mage", "Frost", "CAQBBBBBBB", 3).with_name("Spellslinger"),
            TalentBuildUsage::new("Mage", "Frost", "CAQAAAAAAA", 2).with_keystone_level(13.0),
        ];
        let view = talent_builds(&records, "mage", "frost", &ViewConfig::default()).unwrap();

        assert_eq!(view.total_usage, 7);
        assert_eq!(view.entries.len(), 2);

        assert_eq!(view.entries[0].identity.import_string, "CAQAAAAAAA");
        assert_eq!(view.entries[0].total_usage, 4);
        assert_eq!(view.entries[0].avg_keystone_level, Some(12.0));

        assert_eq!(view.entries[1].identity.name.as_deref(), Some("Spellslinger"));
        assert_eq!(view.entries[1].avg_keystone_level, None);
    }

    #[test]
    fn test_min_usage_drops_rare_builds() {
        let records = vec![
            TalentBuildUsage::new("Mage", "Frost", "A", 10),
            TalentBuildUsage::new("Mage", "Frost", "B", 1),
        ];
        let view = talent_builds(&records, "Mage", "Frost", &ViewConfig::new(0, 2)).unwrap();

        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.total_usage, 11);
    }

    #[test]
    fn test_empty_input_with_min_usage() {
        let view = talent_builds(&[], "Mage", "Frost", &ViewConfig::new(3, 10)).unwrap();

        assert!(view.is_empty());
        assert_eq!(view.total_usage, 0);
        assert_eq!(
            view.scope,
            Scope::Spec {
                class_name: "Mage".to_string(),
                spec_name: "Frost".to_string()
            }
        );
    }

    #[test]
    fn test_huge_usage_counts_overflow_in_one_build() {
        let records: Vec<_> = (0..3)
            .map(|_| TalentBuildUsage::new("Mage", "Frost", "A", i64::MAX))
            .collect();

        let err = talent_builds(&records, "Mage", "Frost", &ViewConfig::default()).unwrap_err();
        assert_eq!(
            err,
            StatsError::UsageOverflow {
                key: "A".to_string()
            }
        );
    }

    #[test]
    fn test_huge_usage_counts_overflow_across_builds() {
        let records = vec![
            TalentBuildUsage::new("Mage", "Frost", "A", i64::MAX),
            TalentBuildUsage::new("Mage", "Frost", "B", i64::MAX),
            TalentBuildUsage::new("Mage", "Frost", "C", i64::MAX),
        ];

        let err = talent_builds(&records, "Mage", "Frost", &ViewConfig::default()).unwrap_err();
        assert_eq!(
            err,
            StatsError::UsageOverflow {
                key: "spec:Mage/Frost".to_string()
            }
        );
    }

    #[test]
    fn test_missing_import_string_fails() {
        let mut record = TalentBuildUsage::new("Mage", "Frost", "A", 1);
        record.import_string = Some("  ".to_string());

        let err = talent_builds(&[record], "Mage", "Frost", &ViewConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            StatsError::InvalidRecord {
                field: "import_string",
                ..
            }
        ));
    }
}
