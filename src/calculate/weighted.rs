//! Weighted-average accumulation.
//!
//! Sums are accumulated left to right in group/input order and divided only
//! once the whole group has been folded, so results are reproducible
//! bit-for-bit.

use std::fmt::Display;
use std::hash::Hash;

use super::Grouped;
use crate::error::{Result, StatsError};

/// Two-pass weighted mean: accumulate, then divide.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedMean {
    weighted_sum: f64,
    total_weight: u64,
}

impl WeightedMean {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one weighted value in, or `None` if the total weight overflows.
    pub fn checked_add(self, value: f64, weight: u64) -> Option<Self> {
        Some(Self {
            weighted_sum: self.weighted_sum + value * weight as f64,
            total_weight: self.total_weight.checked_add(weight)?,
        })
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// The mean, or `None` when nothing has been added.
    pub fn mean(&self) -> Option<f64> {
        if self.total_weight == 0 {
            None
        } else {
            Some(self.weighted_sum / self.total_weight as f64)
        }
    }
}

/// Validate a raw weight for the group identified by `key`.
pub fn checked_weight(key: &impl Display, weight: i64) -> Result<u64> {
    if weight <= 0 {
        return Err(StatsError::InvalidWeight {
            key: key.to_string(),
            weight,
        });
    }
    Ok(weight as u64)
}

fn overflow(key: &impl Display) -> StatsError {
    StatsError::UsageOverflow {
        key: key.to_string(),
    }
}

/// Sum of validated weights per group, in group order.
pub fn total_weights<K, T, W>(groups: &Grouped<K, T>, weight_fn: W) -> Result<Vec<(K, u64)>>
where
    K: Eq + Hash + Clone + Display,
    W: Fn(&T) -> Result<i64>,
{
    let mut totals = Vec::with_capacity(groups.len());
    for (key, records) in groups.iter() {
        let mut total = 0u64;
        for record in records {
            total = total
                .checked_add(checked_weight(key, weight_fn(record)?)?)
                .ok_or_else(|| overflow(key))?;
        }
        totals.push((key.clone(), total));
    }
    Ok(totals)
}

/// Weighted mean of `metric_fn` per group: `sum(m * w) / sum(w)`.
///
/// Every record must carry the metric and a positive weight.
pub fn accumulate_weighted<K, T, M, W>(
    groups: &Grouped<K, T>,
    metric_fn: M,
    weight_fn: W,
) -> Result<Vec<(K, f64)>>
where
    K: Eq + Hash + Clone + Display,
    M: Fn(&T) -> Result<f64>,
    W: Fn(&T) -> Result<i64>,
{
    let mut means = Vec::with_capacity(groups.len());
    for (key, records) in groups.iter() {
        let mut acc = WeightedMean::new();
        for record in records {
            let weight = checked_weight(key, weight_fn(record)?)?;
            acc = acc
                .checked_add(metric_fn(record)?, weight)
                .ok_or_else(|| overflow(key))?;
        }
        if let Some(mean) = acc.mean() {
            means.push((key.clone(), mean));
        }
    }
    Ok(means)
}

/// Weighted mean over partial records: records without the metric are
/// skipped, and a group where no record carries it yields `None`.
///
/// Weights are still validated for every record.
pub fn accumulate_weighted_partial<K, T, M, W>(
    groups: &Grouped<K, T>,
    metric_fn: M,
    weight_fn: W,
) -> Result<Vec<(K, Option<f64>)>>
where
    K: Eq + Hash + Clone + Display,
    M: Fn(&T) -> Result<Option<f64>>,
    W: Fn(&T) -> Result<i64>,
{
    let mut means = Vec::with_capacity(groups.len());
    for (key, records) in groups.iter() {
        let mut acc = WeightedMean::new();
        for record in records {
            let weight = checked_weight(key, weight_fn(record)?)?;
            if let Some(value) = metric_fn(record)? {
                acc = acc
                    .checked_add(value, weight)
                    .ok_or_else(|| overflow(key))?;
            }
        }
        means.push((key.clone(), acc.mean()));
    }
    Ok(means)
}
