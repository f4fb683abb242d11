//! Partitional clustering for categorical and mixed tabular data.
//!
//! Rows are samples, columns are attributes. Categorical attributes are
//! discrete codes stored as `f64`; numerical attributes are real values.
//!
//! ## Algorithms
//!
//! ### K-modes
//!
//! K-means for categorical data: matching dissimilarity, mode centroids.
//!
//! **Objective**: Minimize total dissimilarity to the cluster modes:
//!
//! ```text
//! P = Σ_k Σ_{x ∈ C_k} d(x, m_k)
//! ```
//!
//! **When to use**: All attributes are categorical.
//!
//! ### K-prototypes
//!
//! Mixed data. Categorical columns use modes and the configured metric;
//! numerical columns are scaled by their column maximum and use means with
//! Euclidean distance. The two halves are blended:
//!
//! ```text
//! d(x, p) = d_cat(x_cat, p_cat) + γ · ||x_num - p_num||
//! ```
//!
//! **When to use**: Tables mixing codes with measurements. Tune `γ` to balance
//! the groups.
//!
//! ## Usage
//!
//! ```rust
//! use modus::cluster::{Clustering, Config, KModes, KPrototypes};
//! use ndarray::array;
//!
//! let cat = array![[1., 1.], [1., 1.], [2., 2.], [2., 2.]];
//! let mut km = KModes::new(Config::new(2));
//! let labels = km.fit_predict(cat.view()).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! // Column 0 categorical, column 1 numerical.
//! let mixed = array![[1., 2.0], [1., 2.5], [2., 9.0], [2., 9.5]];
//! let mut kp = KPrototypes::new(Config::new(2).with_categorical(vec![0]).with_seed(1));
//! let labels = kp.fit_predict(mixed.view()).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_eq!(labels[2], labels[3]);
//! ```

mod assign;
mod config;
mod kmodes;
mod kprototypes;
mod traits;

pub use assign::FitStats;
pub use config::Config;
pub use kmodes::{KModes, KModesSnapshot};
pub use kprototypes::{KPrototypes, KPrototypesSnapshot};
pub use traits::Clustering;
