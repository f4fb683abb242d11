//! Centroid seeding strategies.
//!
//! Every strategy maps `(data, k, dissimilarity)` to a `k × ncols` centroid
//! matrix whose rows are made of values that occur in `data`.
//!
//! # Huang (1998)
//!
//! Centroid `j` takes, in each column, the `j`-th most frequent value of that
//! column. Columns with fewer than `k` distinct values fall back to their most
//! frequent value, so `k` above the attribute cardinality yields duplicate
//! centroids. That is expected, not an error; the engines reseed clusters that
//! end up empty.
//!
//! # Cao (2009)
//!
//! Density-weighted farthest-point seeding:
//!
//! ```text
//! dens(x) = (1 / n) Σ_j  freq_j(x_j) / m
//! c_0     = argmax_x dens(x)
//! c_i     = argmax_{x ∉ C} min_{c ∈ C} dens(x) · d(x, c)
//! ```
//!
//! Deterministic. Ties go to the lowest row index.
//!
//! # Random
//!
//! Each centroid is a uniformly drawn row. The same row may be drawn twice.
//!
//! # References
//!
//! - Huang (1998). "Extensions to the k-Means Algorithm for Clustering Large
//!   Data Sets with Categorical Values"
//! - Cao, Liang, Bai (2009). "A new initialization method for categorical data
//!   clustering"

use crate::distance::Dissimilarity;
use crate::error::{Error, Result};
use crate::frequency::{column_frequencies, CategoryKey};
use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::Rng;
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seeding strategy for categorical centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InitMethod {
    /// Frequency-ranked attribute values.
    Huang,
    /// Density-weighted farthest point.
    Cao,
    /// Uniformly drawn rows.
    Random,
}

impl InitMethod {
    /// Produce `k` initial centroids for `data`.
    pub fn centroids<R: Rng>(
        self,
        data: ArrayView2<'_, f64>,
        k: usize,
        dist: &Dissimilarity,
        rng: &mut R,
    ) -> Result<Array2<f64>> {
        match self {
            InitMethod::Huang => init_huang(data, k),
            InitMethod::Cao => init_cao(data, k, dist),
            InitMethod::Random => init_random(data, k, rng),
        }
    }
}

fn check_input(data: &ArrayView2<'_, f64>, k: usize) -> Result<()> {
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "n_clusters",
            message: "must be at least 1",
        });
    }
    Ok(())
}

/// Huang initialization.
pub fn init_huang(data: ArrayView2<'_, f64>, k: usize) -> Result<Array2<f64>> {
    check_input(&data, k)?;
    let freq = column_frequencies(data);
    let mut centroids = Array2::zeros((k, data.ncols()));

    for (j, column) in freq.iter().enumerate() {
        for c in 0..k {
            let ranked = column.get(c).unwrap_or(&column[0]);
            centroids[[c, j]] = ranked.value;
        }
    }
    Ok(centroids)
}

/// Per-row density: how common each of the row's values is in its column.
fn densities(data: &ArrayView2<'_, f64>) -> Vec<f64> {
    let (n, m) = data.dim();
    let mut density = vec![0.0; n];
    if m == 0 {
        return density;
    }

    for column in data.columns() {
        let mut tally: BTreeMap<CategoryKey, usize> = BTreeMap::new();
        for &v in column.iter() {
            *tally.entry(CategoryKey::new(v)).or_insert(0) += 1;
        }
        for (d, &v) in density.iter_mut().zip(column.iter()) {
            *d += tally[&CategoryKey::new(v)] as f64 / m as f64;
        }
    }
    for d in &mut density {
        *d /= n as f64;
    }
    density
}

/// `density[r] * d(row r, centroid)` for every row.
fn weighted_distances(
    data: &ArrayView2<'_, f64>,
    centroid: ArrayView1<'_, f64>,
    density: &[f64],
    dist: &Dissimilarity,
) -> Result<Vec<f64>> {
    #[cfg(feature = "parallel")]
    {
        (0..data.nrows())
            .into_par_iter()
            .map(|r| dist.distance(data.row(r), centroid).map(|d| density[r] * d))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..data.nrows())
            .map(|r| dist.distance(data.row(r), centroid).map(|d| density[r] * d))
            .collect()
    }
}

/// Cao initialization.
pub fn init_cao(data: ArrayView2<'_, f64>, k: usize, dist: &Dissimilarity) -> Result<Array2<f64>> {
    check_input(&data, k)?;
    let n = data.nrows();
    let density = densities(&data);
    let mut centroids = Array2::zeros((k, data.ncols()));
    let mut chosen = vec![false; n];

    let mut first = 0;
    for (r, &d) in density.iter().enumerate() {
        if d > density[first] {
            first = r;
        }
    }
    centroids.row_mut(0).assign(&data.row(first));
    chosen[first] = true;
    debug!("cao init: centroid 0 <- row {first}");

    // min over chosen centroids of density-weighted distance, per row
    let mut score = vec![f64::MAX; n];

    for c in 1..k {
        let latest = weighted_distances(&data, centroids.row(c - 1), &density, dist)?;
        for (s, w) in score.iter_mut().zip(latest) {
            if w < *s {
                *s = w;
            }
        }

        let mut pick: Option<usize> = None;
        for r in (0..n).filter(|&r| !chosen[r]) {
            match pick {
                Some(p) if score[r] <= score[p] => {}
                _ => pick = Some(r),
            }
        }
        // More clusters than rows: every row is taken, reuse the first.
        let pick = pick.unwrap_or(0);

        centroids.row_mut(c).assign(&data.row(pick));
        chosen[pick] = true;
        debug!("cao init: centroid {c} <- row {pick}");
    }

    Ok(centroids)
}

/// Random initialization: each centroid is a uniformly drawn row.
pub fn init_random<R: Rng>(data: ArrayView2<'_, f64>, k: usize, rng: &mut R) -> Result<Array2<f64>> {
    check_input(&data, k)?;
    let n = data.nrows();
    let mut centroids = Array2::zeros((k, data.ncols()));
    for mut row in centroids.rows_mut() {
        row.assign(&data.row(rng.random_range(0..n)));
    }
    Ok(centroids)
}

/// Seeding for the numerical half of k-prototypes.
///
/// Draws from every row, the last one included.
pub fn init_numeric<R: Rng>(data: ArrayView2<'_, f64>, k: usize, rng: &mut R) -> Result<Array2<f64>> {
    init_random(data, k, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Metric;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn matrix(rows: usize, cols: usize, values: &[f64]) -> Array2<f64> {
        Array2::from_shape_vec((rows, cols), values.to_vec()).unwrap()
    }

    /// 3 × [1,1] then 4 × [1,2]
    fn seven_rows() -> Array2<f64> {
        matrix(7, 2, &[1., 1., 1., 1., 1., 1., 1., 2., 1., 2., 1., 2., 1., 2.])
    }

    #[test]
    fn test_huang_ranks_values_by_frequency() {
        let c = init_huang(seven_rows().view(), 2).unwrap();
        assert_eq!(c, matrix(2, 2, &[1., 2., 1., 1.]));
    }

    #[test]
    fn test_huang_even_split_ties_by_value() {
        let x = matrix(6, 2, &[1., 1., 1., 1., 1., 1., 1., 2., 1., 2., 1., 2.]);
        let c = init_huang(x.view(), 2).unwrap();
        assert_eq!(c, matrix(2, 2, &[1., 1., 1., 2.]));
    }

    #[test]
    fn test_huang_reuses_top_value_when_k_exceeds_cardinality() {
        let c = init_huang(seven_rows().view(), 3).unwrap();
        assert_eq!(c.row(2), c.row(0));
    }

    #[test]
    fn test_cao_picks_densest_row_then_farthest() {
        let dist = Dissimilarity::new(Metric::Hamming);
        let c = init_cao(seven_rows().view(), 2, &dist).unwrap();
        assert_eq!(c, matrix(2, 2, &[1., 2., 1., 1.]));
    }

    #[test]
    fn test_cao_distinct_rows_when_available() {
        let x = matrix(5, 1, &[1., 2., 3., 3., 3.]);
        let dist = Dissimilarity::new(Metric::Hamming);
        let c = init_cao(x.view(), 3, &dist).unwrap();
        // 3 is densest; 1 and 2 tie on score, lower index wins.
        assert_eq!(c.column(0).to_vec(), vec![3., 1., 2.]);
    }

    #[test]
    fn test_cao_propagates_distance_errors() {
        let dist = Dissimilarity::with_weights(Metric::WeightedHamming, vec![1.0]);
        let err = init_cao(seven_rows().view(), 2, &dist).unwrap_err();
        assert!(matches!(err, Error::WeightLengthMismatch { .. }));
    }

    #[test]
    fn test_random_rows_come_from_data() {
        let x = seven_rows();
        let mut rng = StdRng::seed_from_u64(7);
        let c = init_random(x.view(), 4, &mut rng).unwrap();
        assert_eq!(c.dim(), (4, 2));
        for row in c.rows() {
            assert!(x.rows().into_iter().any(|r| r == row));
        }
    }

    #[test]
    fn test_numeric_init_can_draw_last_row() {
        let x = matrix(2, 1, &[0.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(0);
        let c = init_numeric(x.view(), 64, &mut rng).unwrap();
        assert!(c.iter().any(|&v| v == 1.0));
    }

    #[test]
    fn test_empty_input_and_zero_k_rejected() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert_eq!(init_huang(empty.view(), 2), Err(Error::EmptyInput));
        assert!(init_huang(seven_rows().view(), 0).unwrap_err().is_configuration());
    }
}
