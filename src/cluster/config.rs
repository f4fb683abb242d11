//! Engine configuration.

use crate::distance::{Dissimilarity, Metric};
use crate::error::{Error, Result};
use crate::init::InitMethod;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by [`KModes`](super::KModes) and [`KPrototypes`](super::KPrototypes).
///
/// `metric` and `init` are optional so that a missing choice is reported as a
/// configuration error at fit time rather than silently defaulted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Dissimilarity between categorical rows and centroids.
    pub metric: Option<Metric>,
    /// Seeding strategy for categorical centroids.
    pub init: Option<InitMethod>,
    /// Number of clusters (K).
    pub n_clusters: usize,
    /// Number of runs. Validated, but a fit always performs a single run.
    pub n_runs: usize,
    /// Maximum reassignment rounds after the initial assignment.
    pub max_iter: usize,
    /// Per-attribute weight vectors. Slot 0 is bound to the weighted Hamming distance.
    pub weights: Vec<Vec<f64>>,
    /// Categorical column indices (k-prototypes only).
    pub categorical: Vec<usize>,
    /// Weight of the numerical distance relative to the categorical one (k-prototypes only).
    pub gamma: f64,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metric: Some(Metric::Hamming),
            init: Some(InitMethod::Huang),
            n_clusters: 8,
            n_runs: 1,
            max_iter: 100,
            weights: Vec::new(),
            categorical: Vec::new(),
            gamma: 1.0,
            seed: None,
        }
    }
}

impl Config {
    /// Default configuration with `n_clusters` clusters.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    /// Set the dissimilarity metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Set the initialization method.
    pub fn with_init(mut self, init: InitMethod) -> Self {
        self.init = Some(init);
        self
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the run count.
    pub fn with_n_runs(mut self, n_runs: usize) -> Self {
        self.n_runs = n_runs;
        self
    }

    /// Set the weight vector used by [`Metric::WeightedHamming`].
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = vec![weights];
        self
    }

    /// Set the categorical column indices.
    pub fn with_categorical(mut self, categorical: Vec<usize>) -> Self {
        self.categorical = categorical;
        self
    }

    /// Set the numerical blend factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the options every engine needs; returns the chosen metric and init method.
    pub fn validate(&self) -> Result<(Metric, InitMethod)> {
        let metric = self.metric.ok_or(Error::InvalidParameter {
            name: "metric",
            message: "no distance function configured",
        })?;
        let init = self.init.ok_or(Error::InvalidParameter {
            name: "init",
            message: "no initialization function configured",
        })?;
        if self.n_clusters < 1 {
            return Err(Error::InvalidParameter {
                name: "n_clusters",
                message: "must be at least 1",
            });
        }
        if self.max_iter < 1 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.n_runs < 1 {
            return Err(Error::InvalidParameter {
                name: "n_runs",
                message: "must be at least 1",
            });
        }
        Ok((metric, init))
    }

    /// Bind `metric` to weight slot 0 (empty if no weights were given).
    pub(crate) fn dissimilarity(&self, metric: Metric) -> Dissimilarity {
        Dissimilarity::with_weights(metric, self.weights.first().cloned().unwrap_or_default())
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        }
    }
}
