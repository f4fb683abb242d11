//! Dissimilarity measures for categorical and numerical attribute vectors.
//!
//! Categorical values are encoded as discrete `f64` codes, so every measure here
//! works on `ArrayView1<f64>`. Matching is exact equality; the code itself has
//! no magnitude.
//!
//! | Measure | Per-attribute contribution |
//! |---------|----------------------------|
//! | [`hamming`] | 1 per mismatch |
//! | [`weighted_hamming`] | `w[i]` per mismatch |
//! | [`euclidean`] | `(a[i] - b[i])²`, then square root of the sum |
//!
//! All three refuse vectors of different length instead of truncating.

use crate::error::{Error, Result};
use crate::frequency::CategoryKey;
use ndarray::{ArrayView1, ArrayView2};
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which dissimilarity an engine uses between a row and a centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metric {
    /// Count of mismatching attributes.
    Hamming,
    /// Mismatches weighted by a per-attribute weight vector.
    WeightedHamming,
    /// L2 norm of the difference.
    Euclidean,
}

/// A metric bound to the weight vector it should use.
///
/// Engines build one of these at fit time from their configuration, so two
/// engines with different weights never observe each other's weights.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dissimilarity {
    metric: Metric,
    weights: Vec<f64>,
}

impl Dissimilarity {
    /// Bind a metric with no weights.
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            weights: Vec::new(),
        }
    }

    /// Bind a metric to a weight vector. Only [`Metric::WeightedHamming`] reads it.
    pub fn with_weights(metric: Metric, weights: Vec<f64>) -> Self {
        Self { metric, weights }
    }

    /// The bound metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// The bound weight vector (empty if none was given).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Distance between two vectors under the bound metric.
    pub fn distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Result<f64> {
        match self.metric {
            Metric::Hamming => hamming(a, b),
            Metric::WeightedHamming => weighted_hamming(a, b, &self.weights),
            Metric::Euclidean => euclidean(a, b),
        }
    }
}

fn check_len(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

/// Number of positions where `a` and `b` differ.
pub fn hamming(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Result<f64> {
    check_len(&a, &b)?;
    Ok(a.iter().zip(b.iter()).filter(|(x, y)| x != y).count() as f64)
}

/// Hamming distance where a mismatch at position `i` costs `weights[i]`.
///
/// Fails with [`Error::DimensionMismatch`] if the vectors differ in length, and
/// with [`Error::WeightLengthMismatch`] if the weights do not match them.
pub fn weighted_hamming(
    a: ArrayView1<'_, f64>,
    b: ArrayView1<'_, f64>,
    weights: &[f64],
) -> Result<f64> {
    check_len(&a, &b)?;
    if a.len() != weights.len() {
        return Err(Error::WeightLengthMismatch {
            expected: a.len(),
            found: weights.len(),
        });
    }
    Ok(a.iter()
        .zip(b.iter())
        .zip(weights)
        .filter(|((x, y), _)| x != y)
        .map(|(_, w)| w)
        .sum())
}

/// Euclidean distance.
pub fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Result<f64> {
    check_len(&a, &b)?;
    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt())
}

/// Derive attribute weights from value cardinality.
///
/// Each column gets `1 / distinct_values`; a column with a single distinct
/// value gets 0 since it cannot separate anything. The result is rescaled so
/// the largest weight equals `importance`. If every column is constant, all
/// weights stay 0.
pub fn compute_weights(data: ArrayView2<'_, f64>, importance: f64) -> Vec<f64> {
    let mut weights: Vec<f64> = data
        .columns()
        .into_iter()
        .map(|column| {
            let distinct: BTreeSet<CategoryKey> =
                column.iter().copied().map(CategoryKey::new).collect();
            match distinct.len() {
                0 | 1 => 0.0,
                n => 1.0 / n as f64,
            }
        })
        .collect();

    let max = weights.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        let scale = importance / max;
        for w in &mut weights {
            *w *= scale;
        }
    }
    weights
}
