use std::hash::Hash;

use crime_dash_aggregate::Rollup;

/// The `n` largest entries of `counts`, largest first. Ties keep the order
/// in which their keys were first seen.
#[must_use]
pub fn top_n<K: Eq + Hash + Clone, V: Ord>(counts: Rollup<K, V>, n: usize) -> Vec<(K, V)> {
    let mut ranked = counts.sorted_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_largest_in_descending_order() {
        let counts: Rollup<&str, u64> = [("a", 1), ("b", 5), ("c", 3)].into_iter().collect();
        assert_eq!(top_n(counts, 2), vec![("b", 5), ("c", 3)]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let counts: Rollup<&str, u64> = [("x", 2), ("y", 2), ("z", 2)].into_iter().collect();
        let keys: Vec<&str> = top_n(counts, 2).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["x", "y"]);
    }

    #[test]
    fn n_larger_than_input_returns_everything() {
        let counts: Rollup<&str, u64> = [("a", 1)].into_iter().collect();
        assert_eq!(top_n(counts, 10).len(), 1);
        assert!(top_n(Rollup::<&str, u64>::new(), 3).is_empty());
    }
}
