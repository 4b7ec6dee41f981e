//! Long-to-wide reshaping for stacked charts.

use std::hash::Hash;

use crime_dash_aggregate::Rollup;
use crime_dash_analytics_models::{StackedRow, StackedTable};

/// Reshapes a two-level count rollup into one row per `outer` key, each
/// holding one value per `categories` entry in that order. Missing
/// combinations are zero.
#[must_use]
pub fn pivot<K, C>(
    nested: &Rollup<K, Rollup<C, u64>>,
    outer: &[K],
    categories: &[C],
) -> Vec<(K, Vec<u64>)>
where
    K: Eq + Hash + Clone,
    C: Eq + Hash + Clone,
{
    nested
        .fill_nested(outer, categories)
        .into_iter()
        .map(|(key, series)| (key, series.into_iter().map(|(_, count)| count).collect()))
        .collect()
}

/// [`pivot`] packaged as a [`StackedTable`] keyed by an integer axis.
#[must_use]
pub fn stacked_table(
    nested: &Rollup<i32, Rollup<String, u64>>,
    outer: &[i32],
    categories: &[String],
) -> StackedTable {
    StackedTable {
        categories: categories.to_vec(),
        rows: pivot(nested, outer, categories)
            .into_iter()
            .map(|(key, values)| StackedRow { key, values })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Rollup<i32, Rollup<String, u64>> {
        let mut nested = Rollup::new();
        nested
            .get_or_insert_with(7, Rollup::new)
            .insert("THEFT".to_string(), 3);
        let five = nested.get_or_insert_with(5, Rollup::new);
        five.insert("BATTERY".to_string(), 1);
        five.insert("THEFT".to_string(), 2);
        nested
    }

    #[test]
    fn rows_follow_outer_and_category_order() {
        let categories = vec!["THEFT".to_string(), "BATTERY".to_string()];
        let rows = pivot(&nested(), &[5, 7, 9], &categories);
        assert_eq!(rows, vec![(5, vec![2, 1]), (7, vec![3, 0]), (9, vec![0, 0])]);
    }

    #[test]
    fn every_row_has_the_same_shape() {
        let categories = vec!["BATTERY".to_string(), "THEFT".to_string(), "ARSON".to_string()];
        let first = stacked_table(&nested(), &[5, 7], &categories);
        let second = stacked_table(&nested(), &[5, 7], &categories);
        assert_eq!(first, second);
        assert!(first.rows.iter().all(|r| r.values.len() == categories.len()));
        assert_eq!(first.categories, categories);
        assert_eq!(first.rows[0].total(), 3);
    }
}
