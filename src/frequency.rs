//! Value-frequency bookkeeping for categorical attributes.
//!
//! Two flavours of the same tally:
//!
//! - [`column_frequencies`]: one global pass over a matrix, per column, sorted by
//!   descending count. Seeds Huang initialization.
//! - [`FrequencyTable`]: `[cluster][column] -> value -> count`, updated
//!   incrementally as rows move between clusters. Modes are read from it.
//!
//! [`Assignments`] ties a frequency table to the label vector and per-cluster
//! member counts so the three can never drift apart:
//!
//! ```text
//! Σ_v table[c][j][v] == counter[c]   for every cluster c, column j
//! Σ_c counter[c]     == labels.len()
//! ```
//!
//! Ties are broken by the smallest value everywhere, so results do not depend on
//! map iteration order.

use core::cmp::Ordering;
use ndarray::{ArrayView1, ArrayView2};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A categorical value usable as an ordered map key.
///
/// Ordered with `f64::total_cmp`. `-0.0` is folded into `0.0` so keys agree
/// with the `==` used by the distance functions.
#[derive(Debug, Clone, Copy)]
pub struct CategoryKey(f64);

impl CategoryKey {
    /// Wrap a value.
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            Self(0.0)
        } else {
            Self(value)
        }
    }

    /// The wrapped value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for CategoryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CategoryKey {}

impl PartialOrd for CategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CategoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A value and how many times it was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueCount {
    /// Categorical value.
    pub value: f64,
    /// Number of occurrences.
    pub count: usize,
}

/// Per-column value counts over the whole matrix.
///
/// Each column's list is sorted by descending count; equal counts keep
/// ascending value order.
pub fn column_frequencies(data: ArrayView2<'_, f64>) -> Vec<Vec<ValueCount>> {
    data.columns()
        .into_iter()
        .map(|column| {
            let mut tally: BTreeMap<CategoryKey, usize> = BTreeMap::new();
            for &v in column.iter() {
                *tally.entry(CategoryKey::new(v)).or_insert(0) += 1;
            }
            let mut counts: Vec<ValueCount> = tally
                .into_iter()
                .map(|(k, count)| ValueCount {
                    value: k.value(),
                    count,
                })
                .collect();
            // Stable sort keeps ascending value order within equal counts.
            counts.sort_by(|a, b| b.count.cmp(&a.count));
            counts
        })
        .collect()
}

/// Per-cluster, per-column value counts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyTable {
    counts: Vec<Vec<BTreeMap<CategoryKey, usize>>>,
    n_columns: usize,
}

impl FrequencyTable {
    /// Empty table for `n_clusters` clusters over `n_columns` attributes.
    pub fn new(n_clusters: usize, n_columns: usize) -> Self {
        Self {
            counts: vec![vec![BTreeMap::new(); n_columns]; n_clusters],
            n_columns,
        }
    }

    /// Rebuild a table from the nested form produced by [`FrequencyTable::to_counts`].
    pub fn from_counts(counts: Vec<Vec<Vec<ValueCount>>>) -> Self {
        let n_columns = counts.first().map_or(0, Vec::len);
        let counts = counts
            .into_iter()
            .map(|columns| {
                columns
                    .into_iter()
                    .map(|values| {
                        values
                            .into_iter()
                            .filter(|vc| vc.count > 0)
                            .map(|vc| (CategoryKey::new(vc.value), vc.count))
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self { counts, n_columns }
    }

    /// Nested `[cluster][column] -> [(value, count)]` form, values ascending.
    pub fn to_counts(&self) -> Vec<Vec<Vec<ValueCount>>> {
        (0..self.n_clusters())
            .map(|c| (0..self.n_columns).map(|j| self.counts(c, j)).collect())
            .collect()
    }

    /// Number of clusters tracked.
    pub fn n_clusters(&self) -> usize {
        self.counts.len()
    }

    /// Number of attributes tracked.
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Add one row's values to `cluster`.
    pub fn increment(&mut self, cluster: usize, row: ArrayView1<'_, f64>) {
        for (column, &v) in self.counts[cluster].iter_mut().zip(row.iter()) {
            *column.entry(CategoryKey::new(v)).or_insert(0) += 1;
        }
    }

    /// Remove one row's values from `cluster`. Values that drop to zero are forgotten.
    pub fn decrement(&mut self, cluster: usize, row: ArrayView1<'_, f64>) {
        for (column, &v) in self.counts[cluster].iter_mut().zip(row.iter()) {
            let key = CategoryKey::new(v);
            if let Some(count) = column.get_mut(&key) {
                *count -= 1;
                if *count == 0 {
                    column.remove(&key);
                }
            } else {
                debug_assert!(false, "decrement of a value the cluster never counted");
            }
        }
    }

    /// Most frequent value of `column` within `cluster`, smallest value on ties.
    ///
    /// `None` when the cluster has no members.
    pub fn mode(&self, cluster: usize, column: usize) -> Option<f64> {
        let mut best: Option<(CategoryKey, usize)> = None;
        for (&key, &count) in &self.counts[cluster][column] {
            match best {
                Some((_, c)) if count <= c => {}
                _ => best = Some((key, count)),
            }
        }
        best.map(|(key, _)| key.value())
    }

    /// Count of `value` in `column` of `cluster`.
    pub fn count(&self, cluster: usize, column: usize, value: f64) -> usize {
        self.counts[cluster][column]
            .get(&CategoryKey::new(value))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all counts in `column` of `cluster`; equals the cluster's size.
    pub fn column_total(&self, cluster: usize, column: usize) -> usize {
        self.counts[cluster][column].values().sum()
    }

    /// Value counts of `column` in `cluster`, values ascending.
    pub fn counts(&self, cluster: usize, column: usize) -> Vec<ValueCount> {
        self.counts[cluster][column]
            .iter()
            .map(|(k, &count)| ValueCount {
                value: k.value(),
                count,
            })
            .collect()
    }
}

/// Labels, per-cluster sizes and the categorical frequency table, kept in step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignments {
    labels: Vec<usize>,
    counter: Vec<usize>,
    table: FrequencyTable,
}

impl Assignments {
    pub(crate) fn new(n_rows: usize, n_clusters: usize, n_columns: usize) -> Self {
        Self {
            labels: Vec::with_capacity(n_rows),
            counter: vec![0; n_clusters],
            table: FrequencyTable::new(n_clusters, n_columns),
        }
    }

    pub(crate) fn from_parts(labels: Vec<usize>, counter: Vec<usize>, table: FrequencyTable) -> Self {
        Self {
            labels,
            counter,
            table,
        }
    }

    /// Append the next row with its first label.
    pub(crate) fn push(&mut self, label: usize, row: ArrayView1<'_, f64>) {
        self.labels.push(label);
        self.counter[label] += 1;
        self.table.increment(label, row);
    }

    /// Move row `index` to `label`. Returns the previous label if it changed.
    pub(crate) fn reassign(
        &mut self,
        index: usize,
        label: usize,
        row: ArrayView1<'_, f64>,
    ) -> Option<usize> {
        let old = self.labels[index];
        if old == label {
            return None;
        }
        self.counter[old] -= 1;
        self.counter[label] += 1;
        self.table.decrement(old, row);
        self.table.increment(label, row);
        self.labels[index] = label;
        Some(old)
    }

    /// Clusters that currently have no members.
    pub(crate) fn empty_clusters(&self) -> Vec<usize> {
        self.counter
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n == 0)
            .map(|(c, _)| c)
            .collect()
    }

    /// Cluster index per row.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of rows per cluster.
    pub fn counter(&self) -> &[usize] {
        &self.counter
    }

    /// Categorical value counts per cluster.
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }
}
