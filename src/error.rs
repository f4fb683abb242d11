use core::fmt;

/// Result alias for `modus`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by distance functions, initializers and clustering engines.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input matrix has no rows.
    EmptyInput,

    /// Two vectors (or a matrix and a fitted model) disagree on length.
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// Weight vector length differs from the compared vectors.
    WeightLengthMismatch {
        /// Length of the compared vectors.
        expected: usize,
        /// Length of the bound weight vector.
        found: usize,
    },

    /// Invalid or missing configuration value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// `predict` was called before a successful `fit`.
    NotFitted,
}

impl Error {
    /// True for errors detected while validating configuration, before any work is done.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::InvalidParameter { .. })
    }

    /// True for vector or weight length mismatches.
    pub fn is_dimension(&self) -> bool {
        matches!(
            self,
            Error::DimensionMismatch { .. } | Error::WeightLengthMismatch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::WeightLengthMismatch { expected, found } => {
                write!(
                    f,
                    "weight vector length mismatch: vectors have {expected} attributes, weights have {found}"
                )
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::NotFitted => write!(f, "model is not fitted yet"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
