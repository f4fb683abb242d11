//! Pieces of the assign/update loop shared by both engines.

use crate::error::Result;
use crate::frequency::FrequencyTable;
use ndarray::{Array2, ArrayView2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Statistics from the last fit.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitStats {
    /// Reassignment rounds performed after the initial assignment.
    pub iterations: usize,
    /// Whether a round finished with no row changing cluster.
    pub converged: bool,
    /// Sum over rows of the distance to the assigned centroid, from the last round.
    pub cost: f64,
    /// Total number of rows that changed cluster across all rounds.
    pub reassignments: usize,
    /// Number of empty clusters reseeded with a random row.
    pub reseeds: usize,
}

/// Outcome of one reassignment round.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Round {
    pub moved: usize,
    pub cost: f64,
    pub reseeded: usize,
}

impl Round {
    /// A round counts as changed if any row moved or any cluster was reseeded.
    pub fn changed(&self) -> bool {
        self.moved > 0 || self.reseeded > 0
    }
}

/// Index and distance of the closest of `k` centroids.
///
/// Strict `<` comparison: ties resolve to the lowest index.
pub(crate) fn nearest<F>(k: usize, mut distance: F) -> Result<(usize, f64)>
where
    F: FnMut(usize) -> Result<f64>,
{
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for c in 0..k {
        let d = distance(c)?;
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }
    Ok((best, best_dist))
}

/// Set each attribute of centroid `cluster` to that cluster's mode.
///
/// Attributes with no observations (empty cluster) keep their current value.
pub(crate) fn update_modes(centroids: &mut Array2<f64>, table: &FrequencyTable, cluster: usize) {
    for j in 0..centroids.ncols() {
        if let Some(mode) = table.mode(cluster, j) {
            centroids[[cluster, j]] = mode;
        }
    }
}

/// Set centroid `cluster` to the mean of `members`' rows. No members: unchanged.
pub(crate) fn update_means(
    centroids: &mut Array2<f64>,
    data: ArrayView2<'_, f64>,
    members: &[usize],
    cluster: usize,
) {
    if members.is_empty() {
        return;
    }
    let mut row = centroids.row_mut(cluster);
    row.fill(0.0);
    for &i in members {
        row += &data.row(i);
    }
    row /= members.len() as f64;
}
