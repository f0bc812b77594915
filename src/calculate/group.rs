//! Insertion-ordered grouping.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Result;
use crate::models::Slotted;

/// Buckets of items keyed by a derived key.
///
/// Buckets iterate in order of each key's first appearance in the input;
/// downstream tie-breaking relies on that order.
#[derive(Debug, Clone)]
pub struct Grouped<K, T> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Vec<T>)>,
}

impl<K: Eq + Hash + Clone, T> Grouped<K, T> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// Append an item to the bucket for `key`, creating it at the end if new.
    pub fn insert(&mut self, key: K, item: T) {
        match self.index.get(&key) {
            Some(&i) => self.groups[i].1.push(item),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![item]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> {
        self.groups.iter().map(|(k, items)| (k, items.as_slice()))
    }
}

impl<K: Eq + Hash + Clone, T> Default for Grouped<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> IntoIterator for Grouped<K, T> {
    type Item = (K, Vec<T>);
    type IntoIter = std::vec::IntoIter<(K, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition items by `key_fn`, preserving first-appearance order of keys.
pub fn group_by_key<I, K, F>(records: I, mut key_fn: F) -> Grouped<K, I::Item>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    F: FnMut(&I::Item) -> K,
{
    let mut grouped = Grouped::new();
    for record in records {
        let key = key_fn(&record);
        grouped.insert(key, record);
    }
    grouped
}

/// Like [`group_by_key`], for keys derived from fields that may be missing.
///
/// Stops at the first record whose key cannot be built.
pub fn try_group_by_key<I, K, F>(records: I, mut key_fn: F) -> Result<Grouped<K, I::Item>>
where
    I: IntoIterator,
    K: Eq + Hash + Clone,
    F: FnMut(&I::Item) -> Result<K>,
{
    let mut grouped = Grouped::new();
    for record in records {
        let key = key_fn(&record)?;
        grouped.insert(key, record);
    }
    Ok(grouped)
}

/// Group slot-bound records by their equipment slot.
pub fn group_by_slot<R: Slotted>(records: &[R]) -> Result<Grouped<String, &R>> {
    try_group_by_key(records, |r| r.slot().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotUsage;

    #[test]
    fn test_group_preserves_first_appearance_order() {
        let values = vec![3, 1, 4, 1, 5, 9, 2, 6];
        let grouped = group_by_key(values, |v| v % 3);

        let buckets: Vec<_> = grouped.into_iter().collect();
        assert_eq!(
            buckets,
            vec![(0, vec![3, 9, 6]), (1, vec![1, 4, 1]), (2, vec![5, 2])]
        );
    }

    #[test]
    fn test_every_record_in_exactly_one_bucket() {
        let values: Vec<u32> = (0..50).collect();
        let grouped = group_by_key(values.iter(), |v| **v % 7);

        let total: usize = grouped.iter().map(|(_, items)| items.len()).sum();
        assert_eq!(total, 50);
        assert_eq!(grouped.len(), 7);
    }

    #[test]
    fn test_group_empty_input() {
        let grouped = group_by_key(Vec::<u32>::new(), |v| *v);
        assert!(grouped.is_empty());
        assert_eq!(grouped.len(), 0);
    }

    #[test]
    fn test_group_by_slot() {
        let records = vec![
            SlotUsage::new("wrist", 1, 1),
            SlotUsage::new("head", 2, 1),
            SlotUsage::new("wrist", 3, 1),
        ];
        let grouped = group_by_slot(&records).unwrap();

        let sizes: Vec<_> = grouped
            .iter()
            .map(|(slot, items)| (slot.as_str(), items.len()))
            .collect();
        assert_eq!(sizes, vec![("wrist", 2), ("head", 1)]);
    }

    #[test]
    fn test_group_by_slot_missing_slot() {
        let mut bad = SlotUsage::new("head", 2, 1);
        bad.slot = None;
        let records = vec![SlotUsage::new("wrist", 1, 1), bad];

        assert!(group_by_slot(&records).is_err());
    }

    #[test]
    fn test_into_iter_order() {
        let grouped = group_by_key(vec!["b", "a", "b"], |s| s.to_string());
        let collected: Vec<_> = grouped.into_iter().collect();
        assert_eq!(
            collected,
            vec![("b".to_string(), vec!["b", "b"]), ("a".to_string(), vec!["a"])]
        );
    }
}
