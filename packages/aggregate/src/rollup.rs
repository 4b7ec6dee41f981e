//! The [`Rollup`] container and the grouping functions that build it.

use std::collections::HashMap;
use std::hash::Hash;

use crime_dash_incident_models::Incident;

use crate::reduce::Reduce;

/// Mapping from a group key to an aggregated value.
///
/// Entries iterate in the order their key was first seen. That order is
/// stable across runs over the same input, but it carries no meaning:
/// callers that need chronological or ranked output sort explicitly.
#[derive(Debug, Clone)]
pub struct Rollup<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for Rollup<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Rollup<K, V> {
    /// Creates an empty rollup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value for `key`, if that group exists.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Whether a group exists for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or replaces the value for `key`. A replaced key keeps its
    /// original position.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    /// Mutable access to the value for `key`, inserting `default()` first if
    /// the group does not exist yet.
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Iterates over `(key, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates over keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterates over values in first-seen order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Consumes the rollup, returning its entries in first-seen order.
    #[must_use]
    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }

    /// Transforms every value, keeping keys and order.
    #[must_use]
    pub fn map_values<W>(self, mut f: impl FnMut(&K, V) -> W) -> Rollup<K, W> {
        let entries = self
            .entries
            .into_iter()
            .map(|(k, v)| {
                let w = f(&k, v);
                (k, w)
            })
            .collect();
        Rollup {
            entries,
            index: self.index,
        }
    }

    /// Entries sorted with `compare`. The sort is stable, so equal entries
    /// keep their first-seen order.
    #[must_use]
    pub fn sorted_by(
        self,
        compare: impl FnMut(&(K, V), &(K, V)) -> std::cmp::Ordering,
    ) -> Vec<(K, V)> {
        let mut entries = self.entries;
        entries.sort_by(compare);
        entries
    }

    /// Entries sorted ascending by key.
    #[must_use]
    pub fn sorted_by_key(self) -> Vec<(K, V)>
    where
        K: Ord,
    {
        self.sorted_by(|a, b| a.0.cmp(&b.0))
    }

    /// One entry per key of `domain`, in domain order. Keys missing from the
    /// rollup get `V::default()`; keys outside the domain are dropped.
    #[must_use]
    pub fn fill(&self, domain: &[K]) -> Vec<(K, V)>
    where
        V: Clone + Default,
    {
        domain
            .iter()
            .map(|k| (k.clone(), self.get(k).cloned().unwrap_or_default()))
            .collect()
    }
}

impl<K: Eq + Hash + Clone, I: Eq + Hash + Clone, V> Rollup<K, Rollup<I, V>> {
    /// Two-level gap filling: one outer entry per key of `outer`, each with
    /// exactly one inner entry per key of `inner`.
    #[must_use]
    pub fn fill_nested(&self, outer: &[K], inner: &[I]) -> Vec<(K, Vec<(I, V)>)>
    where
        V: Clone + Default,
    {
        let empty = Rollup::new();
        outer
            .iter()
            .map(|k| {
                let group = self.get(k).unwrap_or(&empty);
                (k.clone(), group.fill(inner))
            })
            .collect()
    }
}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for Rollup<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut rollup = Self::new();
        for (k, v) in iter {
            rollup.insert(k, v);
        }
        rollup
    }
}

impl<K: Eq + Hash + Clone, V: PartialEq> PartialEq for Rollup<K, V> {
    /// Two rollups are equal when they hold the same groups with the same
    /// values, regardless of order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

/// Partitions `records` into groups by `key`. Records whose key is `None`
/// are left out.
pub fn group_by<'a, K, F>(
    records: impl IntoIterator<Item = &'a Incident>,
    key: F,
) -> Rollup<K, Vec<&'a Incident>>
where
    K: Eq + Hash + Clone,
    F: Fn(&Incident) -> Option<K>,
{
    let mut groups = Rollup::new();
    for incident in records {
        if let Some(k) = key(incident) {
            groups.get_or_insert_with(k, Vec::new).push(incident);
        }
    }
    groups
}

/// Groups `records` by one key and reduces each group.
pub fn rollup<'a, K, F, R>(
    records: impl IntoIterator<Item = &'a Incident>,
    key: F,
    reducer: &R,
) -> Rollup<K, R::Output>
where
    K: Eq + Hash + Clone,
    F: Fn(&Incident) -> Option<K>,
    R: Reduce,
{
    group_by(records, key).map_values(|_, group| reducer.reduce(&group))
}

/// Groups `records` by two keys (outer, then inner) and reduces each leaf.
pub fn rollup2<'a, K1, K2, F1, F2, R>(
    records: impl IntoIterator<Item = &'a Incident>,
    outer: F1,
    inner: F2,
    reducer: &R,
) -> Rollup<K1, Rollup<K2, R::Output>>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
    F1: Fn(&Incident) -> Option<K1>,
    F2: Fn(&Incident) -> Option<K2>,
    R: Reduce,
{
    group_by(records, |i| Some((outer(i)?, inner(i)?)))
        .into_entries()
        .into_iter()
        .fold(Rollup::new(), |mut acc, ((k1, k2), group)| {
            acc.get_or_insert_with(k1, Rollup::new)
                .insert(k2, reducer.reduce(&group));
            acc
        })
}

/// Groups `records` by three keys and reduces each leaf.
pub fn rollup3<'a, K1, K2, K3, F1, F2, F3, R>(
    records: impl IntoIterator<Item = &'a Incident>,
    first: F1,
    second: F2,
    third: F3,
    reducer: &R,
) -> Rollup<K1, Rollup<K2, Rollup<K3, R::Output>>>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
    K3: Eq + Hash + Clone,
    F1: Fn(&Incident) -> Option<K1>,
    F2: Fn(&Incident) -> Option<K2>,
    F3: Fn(&Incident) -> Option<K3>,
    R: Reduce,
{
    group_by(records, |i| Some((first(i)?, second(i)?, third(i)?)))
        .into_entries()
        .into_iter()
        .fold(Rollup::new(), |mut acc, ((k1, k2, k3), group)| {
            acc.get_or_insert_with(k1, Rollup::new)
                .get_or_insert_with(k2, Rollup::new)
                .insert(k3, reducer.reduce(&group));
            acc
        })
}

/// Distinct values of `key` across `records`, sorted ascending.
pub fn domain_of<'a, K, F>(records: impl IntoIterator<Item = &'a Incident>, key: F) -> Vec<K>
where
    K: Ord,
    F: Fn(&Incident) -> Option<K>,
{
    let mut values: Vec<K> = records.into_iter().filter_map(key).collect();
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::Count;

    fn incident(district: Option<i32>, kind: &str) -> Incident {
        Incident {
            district,
            primary_type: Some(kind.to_string()),
            ..Incident::default()
        }
    }

    fn sample() -> Vec<Incident> {
        vec![
            incident(Some(7), "THEFT"),
            incident(Some(5), "BATTERY"),
            incident(Some(7), "THEFT"),
            incident(None, "THEFT"),
            incident(Some(5), "THEFT"),
        ]
    }

    #[test]
    fn keeps_first_seen_order() {
        let data = sample();
        let counts = rollup(&data, |i| i.district, &Count);
        let keys: Vec<i32> = counts.keys().copied().collect();
        assert_eq!(keys, [7, 5]);
        assert_eq!(counts.get(&7), Some(&2));
        assert_eq!(counts.get(&5), Some(&2));
    }

    #[test]
    fn skips_records_without_key() {
        let data = sample();
        let counts = rollup(&data, |i| i.district, &Count);
        assert_eq!(counts.values().sum::<u64>(), 4);
    }

    #[test]
    fn partition_sums_to_input_size() {
        let data = sample();
        let counts = rollup(&data, |i| i.primary_type.clone(), &Count);
        assert_eq!(counts.values().sum::<u64>(), data.len() as u64);
    }

    #[test]
    fn empty_input_gives_empty_rollup() {
        let data: Vec<Incident> = Vec::new();
        assert!(rollup(&data, |i| i.district, &Count).is_empty());
        assert!(rollup2(&data, |i| i.district, |i| i.hour(), &Count).is_empty());
    }

    #[test]
    fn nests_two_levels() {
        let data = sample();
        let nested = rollup2(&data, |i| i.district, |i| i.primary_type.clone(), &Count);
        assert_eq!(nested.len(), 2);
        let seven = nested.get(&7).unwrap();
        assert_eq!(seven.get(&"THEFT".to_string()), Some(&2));
        assert_eq!(seven.get(&"BATTERY".to_string()), None);
        let five = nested.get(&5).unwrap();
        assert_eq!(five.len(), 2);
    }

    #[test]
    fn nests_three_levels() {
        let mut data = sample();
        data[0].arrest = true;
        let nested = rollup3(
            &data,
            |i| i.district,
            |i| i.primary_type.clone(),
            |i| Some(i.arrest),
            &Count,
        );
        let theft = nested.get(&7).unwrap().get(&"THEFT".to_string()).unwrap();
        assert_eq!(theft.get(&true), Some(&1));
        assert_eq!(theft.get(&false), Some(&1));
    }

    #[test]
    fn fill_synthesizes_missing_keys() {
        let counts: Rollup<u32, u64> = [(3, 4), (1, 2), (9, 1)].into_iter().collect();
        let filled = counts.fill(&[0, 1, 2, 3]);
        assert_eq!(filled, vec![(0, 0), (1, 2), (2, 0), (3, 4)]);
    }

    #[test]
    fn fill_nested_gives_full_grid() {
        let mut nested: Rollup<i32, Rollup<u32, u64>> = Rollup::new();
        nested.get_or_insert_with(2020, Rollup::new).insert(5, 3);
        let months: Vec<u32> = (0..12).collect();
        let grid = nested.fill_nested(&[2019, 2020], &months);

        assert_eq!(grid.len(), 2);
        for (_, series) in &grid {
            assert_eq!(series.len(), 12);
        }
        assert!(grid[0].1.iter().all(|(_, c)| *c == 0));
        assert_eq!(grid[1].1[5], (5, 3));
    }

    #[test]
    fn sorted_by_is_stable() {
        let counts: Rollup<&str, u64> = [("a", 1), ("b", 3), ("c", 1), ("d", 3)]
            .into_iter()
            .collect();
        let ranked = counts.sorted_by(|a, b| b.1.cmp(&a.1));
        let keys: Vec<&str> = ranked.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["b", "d", "a", "c"]);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut r: Rollup<&str, u64> = [("a", 1), ("b", 2)].into_iter().collect();
        r.insert("a", 10);
        assert_eq!(r.into_entries(), vec![("a", 10), ("b", 2)]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: Rollup<i32, u64> = [(1, 1), (2, 2)].into_iter().collect();
        let b: Rollup<i32, u64> = [(2, 2), (1, 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn domain_is_sorted_and_distinct() {
        let data = sample();
        assert_eq!(domain_of(&data, |i| i.district), vec![5, 7]);
    }
}
