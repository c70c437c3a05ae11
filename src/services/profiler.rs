//! Group-by profiles for cycle charts and heatmaps.

use std::collections::{BTreeMap, BTreeSet};

/// How grouped values are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reducer {
    #[default]
    Mean,
    Sum,
    Max,
    Min,
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
    max: f64,
    min: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            sum: 0.0,
            count: 0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
        }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.max = self.max.max(value);
        self.min = self.min.min(value);
    }

    fn finish(&self, reducer: Reducer) -> f64 {
        match reducer {
            Reducer::Mean => self.sum / self.count as f64,
            Reducer::Sum => self.sum,
            Reducer::Max => self.max,
            Reducer::Min => self.min,
        }
    }
}

/// Sparse 2-D mapping `(row, col) -> statistic`.
///
/// Only combinations that had at least one value are present.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityMatrix<R: Ord, C: Ord> {
    cells: BTreeMap<(R, C), f64>,
}

impl<R: Ord + Copy, C: Ord + Copy> ActivityMatrix<R, C> {
    pub fn get(&self, row: R, col: C) -> Option<f64> {
        self.cells.get(&(row, col)).copied()
    }

    /// Row keys that have at least one cell, ascending.
    pub fn row_keys(&self) -> Vec<R> {
        self.cells
            .keys()
            .map(|(r, _)| *r)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Column keys that have at least one cell, ascending.
    pub fn col_keys(&self) -> Vec<C> {
        self.cells
            .keys()
            .map(|(_, c)| *c)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Dense grid over the given key domains; absent cells are `None`.
    pub fn grid(&self, rows: &[R], cols: &[C]) -> Vec<Vec<Option<f64>>> {
        rows.iter()
            .map(|r| cols.iter().map(|c| self.get(*r, *c)).collect())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Group items by `(row_key, col_key)` and reduce `value` within each group.
///
/// Items whose value is `None` are skipped.
pub fn profile<T, R, C>(
    items: &[T],
    row_key: impl Fn(&T) -> R,
    col_key: impl Fn(&T) -> C,
    value: impl Fn(&T) -> Option<f64>,
    reducer: Reducer,
) -> ActivityMatrix<R, C>
where
    R: Ord + Copy,
    C: Ord + Copy,
{
    let mut groups: BTreeMap<(R, C), Accumulator> = BTreeMap::new();
    for item in items {
        if let Some(v) = value(item) {
            groups
                .entry((row_key(item), col_key(item)))
                .or_insert_with(Accumulator::new)
                .push(v);
        }
    }

    ActivityMatrix {
        cells: groups
            .into_iter()
            .map(|(key, acc)| (key, acc.finish(reducer)))
            .collect(),
    }
}

/// One-dimensional variant of [`profile`].
pub fn profile_by<T, K>(
    items: &[T],
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> Option<f64>,
    reducer: Reducer,
) -> BTreeMap<K, f64>
where
    K: Ord + Copy,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for item in items {
        if let Some(v) = value(item) {
            groups.entry(key(item)).or_insert_with(Accumulator::new).push(v);
        }
    }
    groups
        .into_iter()
        .map(|(k, acc)| (k, acc.finish(reducer)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Obs {
        weekday: u32,
        hour: u32,
        volume: f64,
    }

    fn obs(weekday: u32, hour: u32, volume: f64) -> Obs {
        Obs {
            weekday,
            hour,
            volume,
        }
    }

    #[test]
    fn test_profile_mean() {
        let items = vec![obs(0, 1, 2.0), obs(0, 1, 4.0), obs(6, 23, 10.0)];
        let matrix = profile(&items, |o| o.weekday, |o| o.hour, |o| Some(o.volume), Reducer::Mean);

        assert_eq!(matrix.get(0, 1), Some(3.0));
        assert_eq!(matrix.get(6, 23), Some(10.0));
        assert_eq!(matrix.get(3, 12), None);
        assert_eq!(matrix.row_keys(), vec![0, 6]);
        assert_eq!(matrix.col_keys(), vec![1, 23]);
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_profile_grid_leaves_missing_cells_empty() {
        let items = vec![obs(1, 0, 5.0)];
        let matrix = profile(&items, |o| o.weekday, |o| o.hour, |o| Some(o.volume), Reducer::Mean);
        let grid = matrix.grid(&[0, 1], &[0, 1]);
        assert_eq!(grid, vec![vec![None, None], vec![Some(5.0), None]]);
    }

    #[test]
    fn test_profile_reducers() {
        let items = vec![obs(0, 0, 2.0), obs(0, 0, 6.0)];
        let get = |reducer| {
            profile(&items, |o| o.weekday, |o| o.hour, |o| Some(o.volume), reducer).get(0, 0)
        };
        assert_eq!(get(Reducer::Sum), Some(8.0));
        assert_eq!(get(Reducer::Max), Some(6.0));
        assert_eq!(get(Reducer::Min), Some(2.0));
    }

    #[test]
    fn test_profile_skips_missing_values() {
        let items = vec![obs(0, 0, 2.0), obs(0, 0, -1.0)];
        let matrix = profile(
            &items,
            |o| o.weekday,
            |o| o.hour,
            |o| (o.volume >= 0.0).then_some(o.volume),
            Reducer::Mean,
        );
        assert_eq!(matrix.get(0, 0), Some(2.0));
    }

    #[test]
    fn test_profile_by() {
        let items = vec![obs(0, 5, 1.0), obs(0, 5, 3.0), obs(0, 7, 4.0)];
        let by_hour = profile_by(&items, |o| o.hour, |o| Some(o.volume), Reducer::Mean);
        assert_eq!(by_hour.get(&5), Some(&2.0));
        assert_eq!(by_hour.get(&7), Some(&4.0));
        assert_eq!(by_hour.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<Obs> = Vec::new();
        let matrix = profile(&items, |o| o.weekday, |o| o.hour, |o| Some(o.volume), Reducer::Mean);
        assert!(matrix.is_empty());
        assert!(matrix.row_keys().is_empty());
    }
}
