//! Error types for least-squares curve fitting
//!
//! This module defines the common errors encountered when constructing or
//! evaluating polynomial fits, along with a convenient `Result` alias.
//!
//! All errors are raised at construction time; a [`crate::PolynomialFit`] is
//! never returned partially initialized, and no failure is papered over with
//! a NaN or zero placeholder.

/// Errors that can occur during least-squares curve fitting.
///
/// This enum represents the common failure modes when constructing or
/// evaluating polynomial fits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot perform curve fitting because there is no data.
    #[error("No data available for fitting")]
    NoData,

    /// The x and y columns have different lengths.
    ///
    /// The fit requires one y value per x value.
    #[error("Column length mismatch: {x} x-values vs {y} y-values")]
    ShapeMismatch {
        /// Number of x-values supplied
        x: usize,
        /// Number of y-values supplied
        y: usize,
    },

    /// The requested dimension is outside the supported range.
    ///
    /// A polynomial needs at least one coefficient; `dimension` must be >= 1.
    #[error("Dimension `{0}` is invalid; at least 1 coefficient is required")]
    InvalidDimension(usize),

    /// Cannot compute the fit because the normal-equations matrix is singular.
    ///
    /// Usually the dimension exceeds the sample count, or there are too few
    /// distinct x-values for the requested dimension.
    #[error(
        "Normal-equations matrix (A^T A) is not invertible; the data may be insufficient or collinear. [n: {n}, k: {k}]"
    )]
    SingularMatrix {
        /// Number of data points
        n: usize,
        /// Number of coefficients requested
        k: usize,
    },

    /// A y-column index is out of range for the data table.
    #[error("Column index {index} is out of range; the table has {columns} y-columns")]
    ColumnOutOfRange {
        /// Requested column index
        index: usize,
        /// Number of y-columns in the table
        columns: usize,
    },

    /// An external target vector does not match the fitted sample count.
    ///
    /// Out-of-sample evaluation reuses the fitted design matrix, so the
    /// target must have one entry per original sample.
    #[error("Target vector has {actual} entries, expected {expected}")]
    TargetLength {
        /// Sample count of the fit
        expected: usize,
        /// Length of the supplied target vector
        actual: usize,
    },

    /// A numeric value could not be cast to the target type. This is usually a custom type much smaller than f64/f32
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// Failed to solve the algebraic system during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),
}

/// Result type for least-squares curve fitting
pub type Result<T> = std::result::Result<T, Error>;
