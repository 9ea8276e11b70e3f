//! Verification of the orthogonal-projection identities behind a fit
//!
//! A least-squares fit is an orthogonal projection of the observation vector
//! onto the column space of the design matrix. That gives four checkable
//! identities, which hold exactly in real arithmetic and only approximately
//! in floating point:
//!
//! - `P = Pᵀ` and `P = P²` (the projection is symmetric and idempotent)
//! - `(I−P) = (I−P)ᵀ` and `(I−P) = (I−P)²` (so is the complement)
//! - `b − A·x̂ = (I−P)·b` (the two residual paths agree)
//! - `eᵀA ≈ 0` (the residual is orthogonal to the column space)
//!
//! [`ProjectionDiagnostics`] reports the worst-case defect of each identity
//! as a single magnitude, so a reporting layer can print them or a test can
//! assert they stay below a tolerance. The identities are measured, not
//! assumed; a badly conditioned design matrix will show up here long before
//! the coefficients look obviously wrong.
use nalgebra::DMatrix;

use crate::{fit::PolynomialFit, value::Value};

/// Default tolerance for projection-identity checks.
///
/// Loose enough to absorb rounding across the matrix products involved,
/// tight enough to catch a genuinely broken projection.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Returns the largest absolute entry of a matrix expression.
fn max_abs<T: Value>(values: impl Iterator<Item = T>) -> T {
    values.fold(T::zero(), |acc, v| {
        nalgebra::RealField::max(acc, Value::abs(v))
    })
}

/// Measures how far a square matrix is from being symmetric.
///
/// Returns the largest absolute entry of `M − Mᵀ`; zero for an exactly
/// symmetric matrix.
#[must_use]
pub fn symmetry_defect<T: Value>(matrix: &DMatrix<T>) -> T {
    let diff = matrix - matrix.transpose();
    max_abs(diff.iter().copied())
}

/// Measures how far a square matrix is from being idempotent.
///
/// Returns the largest absolute entry of `M − M²`; zero when `M·M == M`
/// exactly.
#[must_use]
pub fn idempotence_defect<T: Value>(matrix: &DMatrix<T>) -> T {
    let diff = matrix - matrix * matrix;
    max_abs(diff.iter().copied())
}

/// Worst-case defects of the orthogonal-projection identities for one fit.
///
/// Each field is the largest absolute entry of the corresponding difference;
/// all of them are ~0 for a healthy fit. Produced by
/// [`PolynomialFit::diagnostics`].
///
/// # Example
/// ```
/// # use projfit::{PolynomialFit, diagnostics::DEFAULT_TOLERANCE};
/// let fit = PolynomialFit::fit(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 4.9, 7.2], 2).unwrap();
/// let report = fit.diagnostics();
/// assert!(report.passes(DEFAULT_TOLERANCE));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionDiagnostics<T: Value = f64> {
    /// Largest entry of `P − Pᵀ`
    pub symmetry: T,

    /// Largest entry of `P − P²`
    pub idempotence: T,

    /// Largest entry of `(I−P) − (I−P)ᵀ`
    pub complement_symmetry: T,

    /// Largest entry of `(I−P) − (I−P)²`
    pub complement_idempotence: T,

    /// Largest disagreement between the residual paths `b − A·x̂` and `(I−P)·b`
    pub residual_agreement: T,

    /// Largest entry of `eᵀA`, the residual's projection back onto the column space
    pub orthogonality: T,
}

impl<T: Value> ProjectionDiagnostics<T> {
    /// Measures all projection identities for a fit.
    ///
    /// This recomputes `Pᵀ`, `P²`, and `eᵀA` from the fit's stored matrices;
    /// the fit itself is not modified.
    #[must_use]
    pub fn measure(fit: &PolynomialFit<T>) -> Self {
        let residual_diff = fit.residual() - fit.projected_residual();
        let eta = fit.design_matrix().transpose() * fit.residual();

        Self {
            symmetry: symmetry_defect(fit.projection()),
            idempotence: idempotence_defect(fit.projection()),
            complement_symmetry: symmetry_defect(fit.complement()),
            complement_idempotence: idempotence_defect(fit.complement()),
            residual_agreement: max_abs(residual_diff.iter().copied()),
            orthogonality: max_abs(eta.iter().copied()),
        }
    }

    /// Returns true if every measured defect is below `tolerance`.
    ///
    /// # Panics
    /// Panics if `tolerance` cannot be represented in `T`. This cannot
    /// happen for `f32`/`f64`.
    #[must_use]
    pub fn passes(&self, tolerance: f64) -> bool {
        let tolerance = T::try_cast(tolerance).expect("tolerance representable in T");
        self.max_defect() < tolerance
    }

    /// Returns the largest of the measured defects.
    #[must_use]
    pub fn max_defect(&self) -> T {
        max_abs(
            [
                self.symmetry,
                self.idempotence,
                self.complement_symmetry,
                self.complement_idempotence,
                self.residual_agreement,
                self.orthogonality,
            ]
            .into_iter(),
        )
    }
}
