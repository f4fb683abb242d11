//! K-modes clustering for purely categorical data.
//!
//! K-means with two substitutions (Huang, 1998):
//!
//! - **Dissimilarity**: simple matching (Hamming) instead of squared Euclidean.
//! - **Centroid**: per-attribute mode instead of mean.
//!
//! # Algorithm
//!
//! 1. Seed K centroids ([`InitMethod`](crate::InitMethod)).
//! 2. Assign every row to its nearest centroid, filling the per-cluster
//!    frequency table as a side effect. Set every centroid to its modes.
//! 3. Repeat up to `max_iter` rounds:
//!    - reassign every row; a row that moves is subtracted from the old
//!      cluster's counts and added to the new one, both clusters marked dirty;
//!    - if a cluster became empty, reseed it with a random row and start the
//!      next round without recomputing modes;
//!    - otherwise recompute modes of dirty clusters only;
//!    - stop when no row moved.
//!
//! The frequency table makes the mode update O(changed rows) rather than a
//! full rescan of each cluster.
//!
//! # Failure Modes
//!
//! - **Duplicate seeds**: Huang on low-cardinality attributes can produce equal
//!   centroids. The duplicates start empty and are reseeded.
//! - **Non-convergence**: reaching `max_iter` still leaves a usable model;
//!   check [`FitStats::converged`].

use super::assign::{nearest, update_modes, FitStats, Round};
use super::config::Config;
use super::traits::Clustering;
use crate::distance::Dissimilarity;
use crate::error::{Error, Result};
use crate::frequency::{Assignments, FrequencyTable, ValueCount};
use log::{debug, info, trace, warn};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// K-modes clustering model.
///
/// ```rust
/// use modus::{Clustering, Config, InitMethod, KModes};
/// use ndarray::array;
///
/// let data = array![[1., 1.], [1., 1.], [1., 2.], [1., 2.]];
/// let mut km = KModes::new(Config::new(2).with_init(InitMethod::Cao));
/// let labels = km.fit_predict(data.view()).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct KModes {
    config: Config,
    dissimilarity: Option<Dissimilarity>,
    centroids: Array2<f64>,
    assignments: Assignments,
    stats: FitStats,
    fitted: bool,
}

/// Fitted state of a [`KModes`] model, for handing to a persistence layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KModesSnapshot {
    /// Configuration the model was built with.
    pub config: Config,
    /// K × C centroid matrix.
    pub centroids: Array2<f64>,
    /// `[cluster][column]` value counts.
    pub frequency: Vec<Vec<Vec<ValueCount>>>,
    /// Cluster per training row.
    pub labels: Vec<usize>,
    /// Rows per cluster.
    pub labels_counter: Vec<usize>,
    /// Statistics of the fit.
    pub stats: FitStats,
    /// Whether the model can predict.
    pub fitted: bool,
}

impl KModes {
    /// Create an unfitted model.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dissimilarity: None,
            centroids: Array2::zeros((0, 0)),
            assignments: Assignments::default(),
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

    /// K × C centroid matrix (modes).
    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    /// Number of training rows per cluster.
    pub fn labels_counter(&self) -> &[usize] {
        self.assignments.counter()
    }

    /// Per-cluster value counts of the training data.
    pub fn frequency_table(&self) -> &FrequencyTable {
        self.assignments.table()
    }

    /// Statistics of the last fit.
    pub fn stats(&self) -> &FitStats {
        &self.stats
    }

    /// Capture the fitted state.
    pub fn snapshot(&self) -> KModesSnapshot {
        KModesSnapshot {
            config: self.config.clone(),
            centroids: self.centroids.clone(),
            frequency: self.assignments.table().to_counts(),
            labels: self.assignments.labels().to_vec(),
            labels_counter: self.assignments.counter().to_vec(),
            stats: self.stats.clone(),
            fitted: self.fitted,
        }
    }

    /// Rebuild a model from a snapshot.
    pub fn from_snapshot(snapshot: KModesSnapshot) -> Result<Self> {
        let KModesSnapshot {
            config,
            centroids,
            frequency,
            labels,
            labels_counter,
            stats,
            fitted,
        } = snapshot;

        let dissimilarity = if fitted {
            let (metric, _) = config.validate()?;
            if centroids.nrows() != config.n_clusters {
                return Err(Error::DimensionMismatch {
                    expected: config.n_clusters,
                    found: centroids.nrows(),
                });
            }
            if labels_counter.len() != config.n_clusters {
                return Err(Error::DimensionMismatch {
                    expected: config.n_clusters,
                    found: labels_counter.len(),
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
            centroids,
            assignments: Assignments::from_parts(labels, labels_counter, table),
            stats,
            fitted,
        })
    }

    /// One reassignment round over the training data.
    fn round<R: Rng>(
        data: ArrayView2<'_, f64>,
        dist: &Dissimilarity,
        centroids: &mut Array2<f64>,
        assignments: &mut Assignments,
        dirty: &mut [bool],
        rng: &mut R,
    ) -> Result<Round> {
        let k = centroids.nrows();
        let mut round = Round::default();

        for (i, row) in data.rows().into_iter().enumerate() {
            let (label, d) = nearest(k, |c| dist.distance(row, centroids.row(c)))?;
            round.cost += d;
            if let Some(old) = assignments.reassign(i, label, row) {
                round.moved += 1;
                dirty[old] = true;
                dirty[label] = true;
            }
        }

        let empty = assignments.empty_clusters();
        if !empty.is_empty() {
            for &c in &empty {
                let r = rng.random_range(0..data.nrows());
                centroids.row_mut(c).assign(&data.row(r));
                debug!("kmodes: cluster {c} empty, reseeded from row {r}");
            }
            round.reseeded = empty.len();
            return Ok(round);
        }

        for (c, flag) in dirty.iter_mut().enumerate() {
            if *flag {
                update_modes(centroids, assignments.table(), c);
                *flag = false;
            }
        }
        Ok(round)
    }

    fn label_of(&self, dist: &Dissimilarity, row: ArrayView1<'_, f64>) -> Result<usize> {
        let k = self.centroids.nrows();
        nearest(k, |c| dist.distance(row, self.centroids.row(c))).map(|(label, _)| label)
    }
}

impl Clustering for KModes {
    fn fit(&mut self, data: ArrayView2<'_, f64>) -> Result<()> {
        let (metric, init) = self.config.validate()?;
        let (n, m) = data.dim();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let k = self.config.n_clusters;
        if self.config.n_runs > 1 {
            warn!(
                "kmodes: n_runs = {} requested, performing a single run",
                self.config.n_runs
            );
        }

        let dist = self.config.dissimilarity(metric);
        let mut rng = self.config.rng();
        debug!("kmodes: fitting {n}x{m} data, k={k}, metric={metric:?}, init={init:?}");

        let mut centroids = init.centroids(data, k, &dist, &mut rng)?;

        let mut assignments = Assignments::new(n, k, m);
        for row in data.rows() {
            let (label, _) = nearest(k, |c| dist.distance(row, centroids.row(c)))?;
            assignments.push(label, row);
        }
        for c in 0..k {
            update_modes(&mut centroids, assignments.table(), c);
        }

        let mut stats = FitStats::default();
        let mut dirty = vec![false; k];
        for iter in 0..self.config.max_iter {
            let round = Self::round(
                data,
                &dist,
                &mut centroids,
                &mut assignments,
                &mut dirty,
                &mut rng,
            )?;
            stats.iterations = iter + 1;
            stats.cost = round.cost;
            stats.reassignments += round.moved;
            stats.reseeds += round.reseeded;
            trace!(
                "kmodes: iteration {} moved={} cost={:.4}",
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
                "kmodes: converged after {} iterations, cost={:.4}",
                stats.iterations, stats.cost
            );
        } else {
            info!(
                "kmodes: stopped at max_iter={} without converging, cost={:.4}",
                self.config.max_iter, stats.cost
            );
        }

        self.dissimilarity = Some(dist);
        self.centroids = centroids;
        self.assignments = assignments;
        self.stats = stats;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        let dist = match (&self.dissimilarity, self.fitted) {
            (Some(dist), true) => dist,
            _ => return Err(Error::NotFitted),
        };
        if data.ncols() != self.centroids.ncols() {
            return Err(Error::DimensionMismatch {
                expected: self.centroids.ncols(),
                found: data.ncols(),
            });
        }

        #[cfg(feature = "parallel")]
        {
            (0..data.nrows())
                .into_par_iter()
                .map(|i| self.label_of(dist, data.row(i)))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            data.rows()
                .into_iter()
                .map(|row| self.label_of(dist, row))
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
