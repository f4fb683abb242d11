//! Clustering traits.

use crate::error::Result;
use ndarray::ArrayView2;

/// Trait for centroid-based clustering models that keep their fitted state.
pub trait Clustering {
    /// Fit the model to `data` (rows are samples).
    ///
    /// Configuration errors are reported before any state changes. Any other
    /// error leaves the previous fitted state in place.
    fn fit(&mut self, data: ArrayView2<'_, f64>) -> Result<()>;

    /// Label each row of `data` with its nearest fitted centroid.
    ///
    /// Read-only: the fitted state is not touched.
    fn predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>>;

    /// Fit the model and return the training labels.
    fn fit_predict(&mut self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        self.fit(data)?;
        Ok(self.labels().to_vec())
    }

    /// Labels of the training rows from the last fit (empty before any fit).
    fn labels(&self) -> &[usize];

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}
