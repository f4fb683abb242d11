//! # modus
//!
//! Partitional clustering for categorical and mixed categorical/numerical tables:
//! k-modes and k-prototypes.
//!
//! Data is an `ndarray` matrix of `f64` (rows are samples). Categorical
//! attributes are discrete codes; numerical attributes are real values.
//!
//! - [`distance`]: Hamming, weighted Hamming, Euclidean, and weight derivation.
//! - [`init`]: Huang, Cao and random centroid seeding.
//! - [`frequency`]: per-column and per-cluster value counts.
//! - [`cluster`]: the [`KModes`] and [`KPrototypes`] engines.
//!
//! Optional features: `parallel` (rayon-backed prediction and Cao seeding),
//! `serde` (derives on configuration and model snapshots).

pub mod cluster;
pub mod distance;
/// Error types used across `modus`.
pub mod error;
pub mod frequency;
pub mod init;

pub use cluster::{
    Clustering, Config, FitStats, KModes, KModesSnapshot, KPrototypes, KPrototypesSnapshot,
};
pub use distance::{compute_weights, euclidean, hamming, weighted_hamming, Dissimilarity, Metric};
pub use error::{Error, Result};
pub use frequency::{column_frequencies, FrequencyTable, ValueCount};
pub use init::InitMethod;
