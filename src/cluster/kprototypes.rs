//! K-prototypes clustering for mixed categorical and numerical data.
//!
//! Huang (1997) combines k-modes and k-means: a prototype has a categorical
//! half (modes) and a numerical half (means), and the dissimilarity is
//!
//! ```text
//! d(x, p) = d_cat(x_cat, p_cat) + γ · ||x_num - p_num||₂
//! ```
//!
//! # Preprocessing
//!
//! Columns listed in [`Config::categorical`] form the categorical sub-matrix;
//! the rest, in their original order, form the numerical one. Every numerical
//! column is divided by its maximum so values land in `[0, 1]` for
//! non-negative data. `predict` repeats both steps on its own input, so the
//! scaling follows the data being labelled rather than the training data.
//!
//! # Update Rules
//!
//! - Categorical half: modes from the incrementally maintained frequency table,
//!   exactly as in [`KModes`](super::KModes).
//! - Numerical half: mean of the scaled numerical rows of the current members.
//!   Membership lists are rebuilt every round.
//!
//! Empty clusters are reseeded with a random row (both halves from the same row).
//!
//! # Choosing γ
//!
//! With scaled numerics the Euclidean term is at most `√num_cols` for
//! non-negative data, while a Hamming mismatch costs 1 per attribute. `γ = 1`
//! lets a single categorical mismatch outweigh most numerical gaps; raise it to
//! let measurements drive the partition.

use super::assign::{nearest, update_means, update_modes, FitStats, Round};
use super::config::Config;
use super::traits::Clustering;
use crate::distance::{euclidean, Dissimilarity};
use crate::error::{Error, Result};
use crate::frequency::{Assignments, FrequencyTable, ValueCount};
use crate::init::init_numeric;
use log::{debug, info, trace, warn};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// K-prototypes clustering model.
#[derive(Debug, Clone)]
pub struct KPrototypes {
    config: Config,
    dissimilarity: Option<Dissimilarity>,
    n_features: usize,
    centroids_cat: Array2<f64>,
    centroids_num: Array2<f64>,
    assignments: Assignments,
    membership: Vec<Vec<usize>>,
    stats: FitStats,
    fitted: bool,
}

/// Fitted state of a [`KPrototypes`] model, for handing to a persistence layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KPrototypesSnapshot {
    /// Configuration the model was built with.
    pub config: Config,
    /// Column count of the training data.
    pub n_features: usize,
    /// K × Ccat categorical centroids.
    pub centroids_cat: Array2<f64>,
    /// K × Cnum numerical centroids (scaled).
    pub centroids_num: Array2<f64>,
    /// `[cluster][column]` categorical value counts.
    pub frequency: Vec<Vec<Vec<ValueCount>>>,
    /// Training row indices per cluster.
    pub membership: Vec<Vec<usize>>,
    /// Cluster per training row.
    pub labels: Vec<usize>,
    /// Rows per cluster.
    pub labels_counter: Vec<usize>,
    /// Statistics of the fit.
    pub stats: FitStats,
    /// Whether the model can predict.
    pub fitted: bool,
}

/// Categorical and numerical column indices for a table of `n_cols` columns.
fn split_columns(categorical: &[usize], n_cols: usize) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut cat = categorical.to_vec();
    cat.sort_unstable();
    cat.dedup();
    if cat.is_empty() {
        return Err(Error::InvalidParameter {
            name: "categorical",
            message: "at least one categorical column is required",
        });
    }
    if cat.last().is_some_and(|&last| last >= n_cols) {
        return Err(Error::InvalidParameter {
            name: "categorical",
            message: "column index out of range",
        });
    }
    let num = (0..n_cols).filter(|j| cat.binary_search(j).is_err()).collect();
    Ok((cat, num))
}

/// Divide every column by its maximum. Columns whose maximum is not positive are left as-is.
fn normalize(num: &mut Array2<f64>) {
    for mut column in num.columns_mut() {
        let max = column.fold(0.0_f64, |m, &v| m.max(v));
        if max > 0.0 {
            column.mapv_inplace(|v| v / max);
        }
    }
}

/// Split `data` into (categorical, scaled numerical) sub-matrices, rows in order.
fn partition(
    data: ArrayView2<'_, f64>,
    categorical: &[usize],
) -> Result<(Array2<f64>, Array2<f64>)> {
    let (cat_cols, num_cols) = split_columns(categorical, data.ncols())?;
    let take = |cols: &[usize]| {
        Array2::from_shape_fn((data.nrows(), cols.len()), |(i, j)| data[[i, cols[j]]])
    };
    let cat = take(&cat_cols);
    let mut num = take(&num_cols);
    normalize(&mut num);
    Ok((cat, num))
}

/// Centroids and the blended metric, borrowed together for distance lookups.
struct Prototypes<'a> {
    dist: &'a Dissimilarity,
    gamma: f64,
    cat: &'a Array2<f64>,
    num: &'a Array2<f64>,
}

impl Prototypes<'_> {
    fn nearest(
        &self,
        row_cat: ArrayView1<'_, f64>,
        row_num: ArrayView1<'_, f64>,
    ) -> Result<(usize, f64)> {
        nearest(self.cat.nrows(), |c| {
            let d_cat = self.dist.distance(row_cat, self.cat.row(c))?;
            let d_num = euclidean(row_num, self.num.row(c))?;
            Ok(d_cat + self.gamma * d_num)
        })
    }
}

impl KPrototypes {
    /// Create an unfitted model.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dissimilarity: None,
            n_features: 0,
            centroids_cat: Array2::zeros((0, 0)),
            centroids_num: Array2::zeros((0, 0)),
            assignments: Assignments::default(),
            membership: Vec::new(),
            stats: FitStats::default(),
            fitted: false,
        }
    }

    /// The model configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a fit has completed.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Categorical centroid half (K × Ccat).
    pub fn centroids_cat(&self) -> &Array2<f64> {
        &self.centroids_cat
    }

    /// Numerical centroid half (K × Cnum), in scaled units.
    pub fn centroids_num(&self) -> &Array2<f64> {
        &self.centroids_num
    }

    /// Full K × C prototypes with columns in the training data's order.
    ///
    /// Numerical entries are in scaled units.
    pub fn centroids(&self) -> Array2<f64> {
        let k = self.centroids_cat.nrows();
        let mut out = Array2::zeros((k, self.n_features));
        if let Ok((cat_cols, num_cols)) = split_columns(&self.config.categorical, self.n_features) {
            for (src, &dst) in cat_cols.iter().enumerate() {
                out.column_mut(dst).assign(&self.centroids_cat.column(src));
            }
            for (src, &dst) in num_cols.iter().enumerate() {
                out.column_mut(dst).assign(&self.centroids_num.column(src));
            }
        }
        out
    }

    /// Number of training rows per cluster.
    pub fn labels_counter(&self) -> &[usize] {
        self.assignments.counter()
    }

    /// Per-cluster value counts of the categorical training columns.
    pub fn frequency_table(&self) -> &FrequencyTable {
        self.assignments.table()
    }

    /// Training row indices per cluster, as of the last round.
    pub fn membership(&self) -> &[Vec<usize>] {
        &self.membership
    }

    /// Statistics of the last fit.
    pub fn stats(&self) -> &FitStats {
        &self.stats
    }

    /// Capture the fitted state.
    pub fn snapshot(&self) -> KPrototypesSnapshot {
        KPrototypesSnapshot {
            config: self.config.clone(),
            n_features: self.n_features,
            centroids_cat: self.centroids_cat.clone(),
            centroids_num: self.centroids_num.clone(),
            frequency: self.assignments.table().to_counts(),
            membership: self.membership.clone(),
            labels: self.assignments.labels().to_vec(),
            labels_counter: self.assignments.counter().to_vec(),
            stats: self.stats.clone(),
            fitted: self.fitted,
        }
    }

    /// Rebuild a model from a snapshot.
    pub fn from_snapshot(snapshot: KPrototypesSnapshot) -> Result<Self> {
        let KPrototypesSnapshot {
            config,
            n_features,
            centroids_cat,
            centroids_num,
            frequency,
            membership,
            labels,
            labels_counter,
            stats,
            fitted,
        } = snapshot;

        let dissimilarity = if fitted {
            let (metric, _) = config.validate()?;
            let (cat_cols, num_cols) = split_columns(&config.categorical, n_features)?;
            let k = config.n_clusters;
            if centroids_cat.dim() != (k, cat_cols.len()) {
                return Err(Error::DimensionMismatch {
                    expected: cat_cols.len(),
                    found: centroids_cat.ncols(),
                });
            }
            if centroids_num.dim() != (k, num_cols.len()) {
                return Err(Error::DimensionMismatch {
                    expected: num_cols.len(),
                    found: centroids_num.ncols(),
                });
            }
            Some(config.dissimilarity(metric))
        } else {
            None
        };

        let table = FrequencyTable::from_counts(frequency);
        Ok(Self {
            config,
            dissimilarity,
            n_features,
            centroids_cat,
            centroids_num,
            assignments: Assignments::from_parts(labels, labels_counter, table),
            membership,
            stats,
            fitted,
        })
    }

    /// One reassignment round over the partitioned training data.
    #[allow(clippy::too_many_arguments)]
    fn round<R: Rng>(
        x_cat: ArrayView2<'_, f64>,
        x_num: ArrayView2<'_, f64>,
        dist: &Dissimilarity,
        gamma: f64,
        centroids_cat: &mut Array2<f64>,
        centroids_num: &mut Array2<f64>,
        assignments: &mut Assignments,
        membership: &mut [Vec<usize>],
        dirty: &mut [bool],
        rng: &mut R,
    ) -> Result<Round> {
        let mut round = Round::default();
        for members in membership.iter_mut() {
            members.clear();
        }

        {
            let protos = Prototypes {
                dist,
                gamma,
                cat: centroids_cat,
                num: centroids_num,
            };
            for (i, (row_cat, row_num)) in x_cat.rows().into_iter().zip(x_num.rows()).enumerate() {
                let (label, d) = protos.nearest(row_cat, row_num)?;
                round.cost += d;
                membership[label].push(i);
                if let Some(old) = assignments.reassign(i, label, row_cat) {
                    round.moved += 1;
                    dirty[old] = true;
                    dirty[label] = true;
                }
            }
        }

        let empty = assignments.empty_clusters();
        if !empty.is_empty() {
            for &c in &empty {
                let r = rng.random_range(0..x_cat.nrows());
                centroids_cat.row_mut(c).assign(&x_cat.row(r));
                centroids_num.row_mut(c).assign(&x_num.row(r));
                debug!("kprototypes: cluster {c} empty, reseeded from row {r}");
            }
            round.reseeded = empty.len();
            return Ok(round);
        }

        for (c, flag) in dirty.iter_mut().enumerate() {
            if *flag {
                update_modes(centroids_cat, assignments.table(), c);
                update_means(centroids_num, x_num, &membership[c], c);
                *flag = false;
            }
        }
        Ok(round)
    }
}

impl Clustering for KPrototypes {
    fn fit(&mut self, data: ArrayView2<'_, f64>) -> Result<()> {
        let (metric, init) = self.config.validate()?;
        if !self.config.gamma.is_finite() || self.config.gamma < 0.0 {
            return Err(Error::InvalidParameter {
                name: "gamma",
                message: "must be finite and non-negative",
            });
        }
        let (n, m) = data.dim();
        let (x_cat, x_num) = partition(data, &self.config.categorical)?;
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let k = self.config.n_clusters;
        let gamma = self.config.gamma;
        if self.config.n_runs > 1 {
            warn!(
                "kprototypes: n_runs = {} requested, performing a single run",
                self.config.n_runs
            );
        }

        let dist = self.config.dissimilarity(metric);
        let mut rng = self.config.rng();
        debug!(
            "kprototypes: fitting {n}x{m} data ({} categorical, {} numerical), k={k}, gamma={gamma}, metric={metric:?}, init={init:?}",
            x_cat.ncols(),
            x_num.ncols()
        );

        let mut centroids_cat = init.centroids(x_cat.view(), k, &dist, &mut rng)?;
        let mut centroids_num = init_numeric(x_num.view(), k, &mut rng)?;

        let mut assignments = Assignments::new(n, k, x_cat.ncols());
        let mut membership: Vec<Vec<usize>> = vec![Vec::new(); k];
        {
            let protos = Prototypes {
                dist: &dist,
                gamma,
                cat: &centroids_cat,
                num: &centroids_num,
            };
            for (i, (row_cat, row_num)) in x_cat.rows().into_iter().zip(x_num.rows()).enumerate() {
                let (label, _) = protos.nearest(row_cat, row_num)?;
                assignments.push(label, row_cat);
                membership[label].push(i);
            }
        }
        for c in 0..k {
            update_modes(&mut centroids_cat, assignments.table(), c);
            update_means(&mut centroids_num, x_num.view(), &membership[c], c);
        }

        let mut stats = FitStats::default();
        let mut dirty = vec![false; k];
        for iter in 0..self.config.max_iter {
            let round = Self::round(
                x_cat.view(),
                x_num.view(),
                &dist,
                gamma,
                &mut centroids_cat,
                &mut centroids_num,
                &mut assignments,
                &mut membership,
                &mut dirty,
                &mut rng,
            )?;
            stats.iterations = iter + 1;
            stats.cost = round.cost;
            stats.reassignments += round.moved;
            stats.reseeds += round.reseeded;
            trace!(
                "kprototypes: iteration {} moved={} cost={:.4}",
                iter,
                round.moved,
                round.cost
            );
            if !round.changed() {
                stats.converged = true;
                break;
            }
        }

        if stats.converged {
            info!(
                "kprototypes: converged after {} iterations, cost={:.4}",
                stats.iterations, stats.cost
            );
        } else {
            info!(
                "kprototypes: stopped at max_iter={} without converging, cost={:.4}",
                self.config.max_iter, stats.cost
            );
        }

        self.dissimilarity = Some(dist);
        self.n_features = m;
        self.centroids_cat = centroids_cat;
        self.centroids_num = centroids_num;
        self.assignments = assignments;
        self.membership = membership;
        self.stats = stats;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        let dist = match (&self.dissimilarity, self.fitted) {
            (Some(dist), true) => dist,
            _ => return Err(Error::NotFitted),
        };
        if data.ncols() != self.n_features {
            return Err(Error::DimensionMismatch {
                expected: self.n_features,
                found: data.ncols(),
            });
        }
        let (x_cat, x_num) = partition(data, &self.config.categorical)?;
        let protos = Prototypes {
            dist,
            gamma: self.config.gamma,
            cat: &self.centroids_cat,
            num: &self.centroids_num,
        };

        #[cfg(feature = "parallel")]
        {
            (0..x_cat.nrows())
                .into_par_iter()
                .map(|i| protos.nearest(x_cat.row(i), x_num.row(i)).map(|(label, _)| label))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            x_cat
                .rows()
                .into_iter()
                .zip(x_num.rows())
                .map(|(row_cat, row_num)| protos.nearest(row_cat, row_num).map(|(label, _)| label))
                .collect()
        }
    }

    fn labels(&self) -> &[usize] {
        self.assignments.labels()
    }

    fn n_clusters(&self) -> usize {
        self.config.n_clusters
    }
}
