use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    diagnostics::ProjectionDiagnostics,
    display,
    error::{Error, Result},
    value::Value,
};

/// Default number of coefficients for a fit (a quadratic, order 2).
///
/// This matches the common spreadsheet default of fitting a quadratic when no
/// dimension is given.
pub const DEFAULT_DIMENSION: usize = 3;

/// Algorithm used to solve the least-squares system.
///
/// Both solvers produce the same coefficients on well-conditioned data; they
/// differ in how they behave as the design matrix approaches singularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Solver {
    /// Singular value decomposition of the design matrix itself.
    ///
    /// This is the default. It avoids forming `(AᵀA)⁻¹` for the coefficient
    /// solve, which roughly squares the condition number of the problem, and
    /// detects rank deficiency explicitly instead of returning garbage.
    #[default]
    Svd,

    /// The textbook normal-equations solution `x̂ = (AᵀA)⁻¹Aᵀb`.
    ///
    /// Kept for parity with reference implementations that invert `AᵀA`
    /// directly. Acceptable for small, well-conditioned dimensions; prefer
    /// [`Solver::Svd`] otherwise.
    NormalEquations,
}

/// Builds the Vandermonde design matrix for a set of x-values.
///
/// The result is an `m × k` matrix with `A[(i, j)] = x[i]^j`, so each column
/// is a successive integer power of the independent variable. Fitting a
/// polynomial is then the linear least-squares problem `A·x̂ ≈ b`.
///
/// This is a pure function of `(x, k)`; it performs no validation beyond
/// what the shape implies.
///
/// # Example
/// ```
/// # use projfit::vandermonde;
/// let a = vandermonde(&[1.0, 2.0], 3);
/// assert_eq!(a[(1, 0)], 1.0);
/// assert_eq!(a[(1, 1)], 2.0);
/// assert_eq!(a[(1, 2)], 4.0);
/// ```
#[must_use]
pub fn vandermonde<T: Value>(x: &[T], k: usize) -> DMatrix<T> {
    DMatrix::from_fn(x.len(), k, |i, j| match j {
        0 => T::one(),
        1 => x[i],
        _ => Value::powi(x[i], i32::try_from(j).unwrap_or(i32::MAX)),
    })
}

/// An immutable polynomial least-squares fit with projection diagnostics.
///
/// `PolynomialFit` fits a degree-(k-1) polynomial to one `(x, y)` sample set
/// by ordinary least squares, and exposes the quantities needed to prove the
/// fit is a valid orthogonal projection:
///
/// - The design matrix `A` (Vandermonde, see [`vandermonde`])
/// - The coefficient vector `x̂` minimizing `‖b − A·x̂‖²`
/// - The projection matrix `P = A(AᵀA)⁻¹Aᵀ` and its complement `I − P`
/// - The residual `e`, computed both as `b − A·x̂` and as `(I−P)·b`
/// - The total least-squares error `TLSE = eᵀ·e`
///
/// Everything is computed eagerly by [`PolynomialFit::fit`] and never mutated
/// afterward; a new instance is needed for each (data, dimension)
/// combination. Instances share no state and can be built and used from
/// multiple threads independently.
///
/// # Example
/// ```
/// # use projfit::PolynomialFit;
/// let x: [f64; 4] = [0.0, 1.0, 2.0, 3.0];
/// let y = [1.0, 3.0, 5.0, 7.0];
/// let fit = PolynomialFit::fit(&x, &y, 2).unwrap();
/// assert!((fit.coefficients()[1] - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit<T: Value = f64> {
    x: Vec<T>,
    y: DVector<T>,
    design: DMatrix<T>,
    coefficients: DVector<T>,
    projection: DMatrix<T>,
    complement: DMatrix<T>,
    residual: DVector<T>,
    projected_residual: DVector<T>,
    tlse: T,
    solver: Solver,
}

impl<T: Value> PolynomialFit<T> {
    /// Fits a polynomial with `dimension` coefficients using the default
    /// (SVD) solver.
    ///
    /// `dimension - 1` is the polynomial order, so `dimension = 2` fits a
    /// straight line and [`DEFAULT_DIMENSION`] (3) fits a quadratic.
    ///
    /// # Parameters
    /// - `x`: Independent-variable column, length `m >= 1`.
    /// - `y`: Dependent-variable column, same length as `x`.
    /// - `dimension`: Number of coefficients `k`, `1 <= k <= m`.
    ///
    /// # Errors
    /// Fails fast at construction, never returning a partial fit:
    /// - [`Error::NoData`]: `x` is empty.
    /// - [`Error::ShapeMismatch`]: `x` and `y` differ in length.
    /// - [`Error::InvalidDimension`]: `dimension` is zero.
    /// - [`Error::SingularMatrix`]: `AᵀA` is not invertible; this covers
    ///   `dimension > m` and fewer than `dimension` distinct x-values.
    /// - [`Error::Algebra`]: the backend solver failed.
    pub fn fit(x: &[T], y: &[T], dimension: usize) -> Result<Self> {
        Self::fit_with(x, y, dimension, Solver::default())
    }

    /// Fits a polynomial using an explicit [`Solver`] choice.
    ///
    /// See [`PolynomialFit::fit`] for the construction contract; the only
    /// difference here is the algorithm used for the coefficient solve.
    ///
    /// # Errors
    /// Same as [`PolynomialFit::fit`].
    pub fn fit_with(x: &[T], y: &[T], dimension: usize, solver: Solver) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::NoData);
        } else if x.len() != y.len() {
            return Err(Error::ShapeMismatch {
                x: x.len(),
                y: y.len(),
            });
        } else if dimension == 0 {
            return Err(Error::InvalidDimension(dimension));
        }

        let n = x.len();
        let k = dimension;
        if k > n {
            // A has more columns than rows, so AᵀA is rank-deficient
            return Err(Error::SingularMatrix { n, k });
        }

        let design = vandermonde(x, k);
        let b = DVector::from_column_slice(y);
        let xtx = design.transpose() * &design;

        let (coefficients, xtx_inv) = match solver {
            Solver::Svd => Self::solve_svd(&design, &xtx, &b)?,
            Solver::NormalEquations => Self::solve_normal(&design, &xtx, &b)?,
        };

        if coefficients.iter().any(|c| c.is_nan()) {
            return Err(Error::Algebra("NaN in coefficients"));
        }

        let projection = &design * &xtx_inv * design.transpose();
        let complement = DMatrix::identity(n, n) - &projection;
        let residual = &b - &design * &coefficients;
        let projected_residual = &complement * &b;
        let tlse = residual.dot(&residual);

        Ok(Self {
            x: x.to_vec(),
            y: b,
            design,
            coefficients,
            projection,
            complement,
            residual,
            projected_residual,
            tlse,
            solver,
        })
    }

    /// Solves the system through the SVD of the design matrix.
    ///
    /// Rank deficiency is reported as an error rather than silently
    /// returning the minimum-norm solution, since a rank-deficient design
    /// means the requested dimension is not supported by the data.
    fn solve_svd(
        design: &DMatrix<T>,
        xtx: &DMatrix<T>,
        b: &DVector<T>,
    ) -> Result<(DVector<T>, DMatrix<T>)> {
        let (n, k) = design.shape();
        let decomp = SVD::new_unordered(design.clone(), true, true);

        // ~= machine_epsilon * max(size) * max_singular
        let sigma_max = decomp.singular_values.max();
        let epsilon = T::epsilon() * T::from_positive_int(n.max(k)) * sigma_max;

        if decomp.rank(epsilon) < k {
            return Err(Error::SingularMatrix { n, k });
        }

        let coefficients = decomp.solve(b, epsilon).map_err(Error::Algebra)?;

        // Full column rank was just established, so this is a true inverse
        let xtx_inv = xtx.clone().pseudo_inverse(epsilon).map_err(Error::Algebra)?;

        Ok((coefficients, xtx_inv))
    }

    /// Solves the system by explicitly inverting `AᵀA`.
    fn solve_normal(
        design: &DMatrix<T>,
        xtx: &DMatrix<T>,
        b: &DVector<T>,
    ) -> Result<(DVector<T>, DMatrix<T>)> {
        let (n, k) = design.shape();
        let xtx_inv = xtx
            .clone()
            .try_inverse()
            .ok_or(Error::SingularMatrix { n, k })?;

        let coefficients = &xtx_inv * design.transpose() * b;
        Ok((coefficients, xtx_inv))
    }

    /// Returns the fitted coefficients, constant term first.
    ///
    /// For a fit of `y = 2x + 1` this is `[1.0, 2.0]`.
    pub fn coefficients(&self) -> &[T] {
        self.coefficients.as_slice()
    }

    /// Returns the Vandermonde design matrix `A` used for the fit.
    pub fn design_matrix(&self) -> &DMatrix<T> {
        &self.design
    }

    /// Returns the projection matrix `P = A(AᵀA)⁻¹Aᵀ`.
    ///
    /// `P` maps any length-`m` vector to its closest point in the column
    /// space of `A`. It is symmetric and idempotent up to floating-point
    /// rounding; use [`PolynomialFit::diagnostics`] to measure how closely
    /// those identities hold for this fit.
    pub fn projection(&self) -> &DMatrix<T> {
        &self.projection
    }

    /// Returns `Pᵀ`, for verifying the symmetry identity `P = Pᵀ`.
    #[must_use]
    pub fn projection_transpose(&self) -> DMatrix<T> {
        self.projection.transpose()
    }

    /// Returns `P²`, for verifying the idempotence identity `P = P²`.
    #[must_use]
    pub fn projection_squared(&self) -> DMatrix<T> {
        &self.projection * &self.projection
    }

    /// Returns the complement matrix `I − P`.
    ///
    /// This projects onto the orthogonal complement of the column space, and
    /// applying it to `b` gives the residual directly.
    pub fn complement(&self) -> &DMatrix<T> {
        &self.complement
    }

    /// Returns the residual `e = b − A·x̂`.
    pub fn residual(&self) -> &DVector<T> {
        &self.residual
    }

    /// Returns the residual computed through the other path, `e = (I−P)·b`.
    ///
    /// Both paths must agree within floating-point tolerance; the difference
    /// between them is one of the quantities reported by
    /// [`PolynomialFit::diagnostics`].
    pub fn projected_residual(&self) -> &DVector<T> {
        &self.projected_residual
    }

    /// Returns the total least-squares error `TLSE = eᵀ·e`.
    ///
    /// Always non-negative; zero (up to rounding) exactly when the data lies
    /// on a polynomial of the fitted order.
    pub fn tlse(&self) -> T {
        self.tlse
    }

    /// Returns the fitted y-values `A·x̂`.
    ///
    /// These are the projections of the observed y-values onto the column
    /// space, and equal `b − e` element for element.
    #[must_use]
    pub fn fitted_values(&self) -> DVector<T> {
        &self.design * &self.coefficients
    }

    /// Computes the residual and TLSE against an externally supplied target
    /// vector.
    ///
    /// This reuses the already-fitted design matrix and coefficients without
    /// refitting, which is the mechanism for train/test comparison: fit on
    /// one y-column, then evaluate the same model against another y-column
    /// sharing the same x-column.
    ///
    /// The fit itself is not mutated; the training residual and TLSE remain
    /// available through [`PolynomialFit::residual`] and
    /// [`PolynomialFit::tlse`].
    ///
    /// # Errors
    /// Returns [`Error::TargetLength`] if `target` does not have one entry
    /// per original sample.
    pub fn residual_against(&self, target: &[T]) -> Result<(DVector<T>, T)> {
        if target.len() != self.x.len() {
            return Err(Error::TargetLength {
                expected: self.x.len(),
                actual: target.len(),
            });
        }

        let b = DVector::from_column_slice(target);
        let residual = b - self.fitted_values();
        let tlse = residual.dot(&residual);
        Ok((residual, tlse))
    }

    /// Renders the fitted polynomial as an equation string.
    ///
    /// Coefficients appear in scientific notation with two decimal digits,
    /// constant term first, exactly-zero higher terms omitted:
    ///
    /// ```text
    /// 1.00e+00 + 2.00e+00x^1
    /// ```
    ///
    /// See [`crate::display::equation_string`].
    #[must_use]
    pub fn equation(&self) -> String {
        display::equation_string(self.coefficients())
    }

    /// Evaluates the fitted polynomial at a single x-value using Horner's
    /// method.
    #[must_use]
    pub fn y(&self, x: T) -> T {
        self.coefficients
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }

    /// Evaluates the fitted polynomial at each supplied x-value.
    ///
    /// The returned iterator is lazy and [`Clone`], so it can be restarted or
    /// consumed multiple times without re-solving anything.
    ///
    /// # Example
    /// ```
    /// # use projfit::PolynomialFit;
    /// # let fit = PolynomialFit::fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0], 2).unwrap();
    /// let xs = [0.5, 1.5];
    /// let predicted: Vec<f64> = fit.evaluate(&xs).collect();
    /// assert_eq!(predicted.len(), 2);
    /// ```
    pub fn evaluate<'a>(&'a self, xs: &'a [T]) -> impl Iterator<Item = T> + Clone + 'a {
        xs.iter().map(move |&x| self.y(x))
    }

    /// Measures how closely the computed projection satisfies the orthogonal
    /// projection identities.
    ///
    /// See [`ProjectionDiagnostics`] for the individual quantities.
    #[must_use]
    pub fn diagnostics(&self) -> ProjectionDiagnostics<T> {
        ProjectionDiagnostics::measure(self)
    }

    /// Returns the number of samples the fit was built from.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the fit has no samples.
    ///
    /// Always false in practice, since construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Returns the dimension `k` (number of coefficients).
    pub fn dimension(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns the polynomial order, `k - 1`.
    pub fn order(&self) -> usize {
        self.dimension().saturating_sub(1)
    }

    /// Returns the solver used to compute the coefficients.
    pub fn solver(&self) -> Solver {
        self.solver
    }

    /// Returns the original x-values.
    pub fn x(&self) -> &[T] {
        &self.x
    }

    /// Returns the original y-values as a column vector.
    pub fn y_values(&self) -> &DVector<T> {
        &self.y
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{assert_all_close, assert_close, diagnostics::DEFAULT_TOLERANCE};

    const X: [f64; 4] = [0.0, 1.0, 2.0, 3.0];
    const Y_LINE: [f64; 4] = [1.0, 3.0, 5.0, 7.0]; // y = 2x + 1 exactly

    fn noisy_quadratic() -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..12).map(f64::from).collect();
        // y = 0.5x^2 - x + 2 plus a deterministic wobble
        let y: Vec<f64> = x
            .iter()
            .map(|&x| 0.5 * x * x - x + 2.0 + 0.1 * (x * 1.7).sin())
            .collect();
        (x, y)
    }

    #[test]
    fn test_vandermonde_entries() {
        let x = [2.0, 3.0, -1.0];
        let a = vandermonde(&x, 4);
        assert_eq!(a.shape(), (3, 4));
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(a[(i, j)], x[i].powi(i32::try_from(j).unwrap()));
            }
        }
    }

    #[test]
    fn test_perfect_line() {
        let fit = PolynomialFit::fit(&X, &Y_LINE, 2).unwrap();
        assert_all_close!(fit.coefficients(), &[1.0, 2.0], 1e-9);
        assert_close!(fit.tlse(), 0.0, 1e-18);
        assert_eq!(fit.equation(), "1.00e+00 + 2.00e+00x^1");
    }

    #[test]
    fn test_projection_identities() {
        let (x, y) = noisy_quadratic();
        let fit = PolynomialFit::fit(&x, &y, 3).unwrap();
        let d = fit.diagnostics();

        assert!(d.passes(DEFAULT_TOLERANCE), "diagnostics: {d:?}");
        assert!(d.symmetry < DEFAULT_TOLERANCE);
        assert!(d.idempotence < DEFAULT_TOLERANCE);
        assert!(d.complement_symmetry < DEFAULT_TOLERANCE);
        assert!(d.complement_idempotence < DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_residual_paths_agree() {
        let (x, y) = noisy_quadratic();
        let fit = PolynomialFit::fit(&x, &y, 3).unwrap();

        let direct = fit.residual();
        let projected = fit.projected_residual();
        assert_all_close!(direct.as_slice(), projected.as_slice(), 1e-9);
    }

    #[test]
    fn test_residual_orthogonal_to_column_space() {
        let (x, y) = noisy_quadratic();
        let fit = PolynomialFit::fit(&x, &y, 3).unwrap();

        let eta = fit.design_matrix().transpose() * fit.residual();
        for v in &eta {
            assert!(v.abs() < 1e-8, "eᵀA entry too large: {v}");
        }
    }

    #[test]
    fn test_tlse_nonnegative_and_positive_on_noise() {
        let (x, y) = noisy_quadratic();
        let fit = PolynomialFit::fit(&x, &y, 3).unwrap();
        assert!(fit.tlse() > 0.0);

        // Residual dotted with itself can never go negative
        let fit = PolynomialFit::fit(&X, &Y_LINE, 2).unwrap();
        assert!(fit.tlse() >= 0.0);
    }

    #[test]
    fn test_evaluate_reproduces_fitted_values() {
        let (x, y) = noisy_quadratic();
        let fit = PolynomialFit::fit(&x, &y, 3).unwrap();

        let predicted: Vec<f64> = fit.evaluate(&x).collect();
        let fitted = fit.fitted_values();
        assert_all_close!(&predicted, fitted.as_slice(), 1e-9);
    }

    #[test]
    fn test_evaluate_is_restartable() {
        let fit = PolynomialFit::fit(&X, &Y_LINE, 2).unwrap();
        let xs = [0.5, 1.5, 2.5];
        let iter = fit.evaluate(&xs);
        let first: Vec<f64> = iter.clone().collect();
        let second: Vec<f64> = iter.collect();
        assert_eq!(first, second);
        assert_close!(first[0], 2.0, 1e-9);
    }

    #[test]
    fn test_dimension_exceeds_samples() {
        let err = PolynomialFit::fit(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], 5).unwrap_err();
        assert!(matches!(err, Error::SingularMatrix { n: 3, k: 5 }));
    }

    #[test]
    fn test_duplicate_x_is_rank_deficient() {
        // Only 2 distinct x-values cannot support 3 coefficients
        let x = [1.0, 1.0, 2.0, 2.0];
        let y = [1.0, 1.0, 4.0, 4.0];
        let err = PolynomialFit::fit(&x, &y, 3).unwrap_err();
        assert!(matches!(err, Error::SingularMatrix { .. }));
    }

    #[test]
    fn test_invalid_dimension() {
        let err = PolynomialFit::fit(&X, &Y_LINE, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension(0)));
    }

    #[test]
    fn test_shape_mismatch() {
        let err = PolynomialFit::fit(&X, &[1.0, 2.0], 2).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { x: 4, y: 2 }));
    }

    #[test]
    fn test_empty_input() {
        let err = PolynomialFit::<f64>::fit(&[], &[], 1).unwrap_err();
        assert!(matches!(err, Error::NoData));
    }

    #[test]
    fn test_residual_against_reuses_fit() {
        let y_other = [1.5, 2.5, 5.5, 6.5];
        let fit = PolynomialFit::fit(&X, &Y_LINE, 2).unwrap();

        let (residual, tlse) = fit.residual_against(&y_other).unwrap();

        // The model was not refit: residual is target minus the *original* fitted values
        let fitted = fit.fitted_values();
        for i in 0..4 {
            assert_close!(residual[i], y_other[i] - fitted[i], 1e-9);
        }
        assert!(tlse > fit.tlse());

        // Training state is untouched
        assert_close!(fit.tlse(), 0.0, 1e-18);
    }

    #[test]
    fn test_residual_against_wrong_length() {
        let fit = PolynomialFit::fit(&X, &Y_LINE, 2).unwrap();
        let err = fit.residual_against(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::TargetLength {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_solvers_agree_on_well_conditioned_data() {
        let (x, y) = noisy_quadratic();
        let svd = PolynomialFit::fit_with(&x, &y, 3, Solver::Svd).unwrap();
        let normal = PolynomialFit::fit_with(&x, &y, 3, Solver::NormalEquations).unwrap();

        assert_all_close!(svd.coefficients(), normal.coefficients(), 1e-6);
        assert_close!(svd.tlse(), normal.tlse(), 1e-6);
    }

    #[test]
    fn test_normal_equations_singular() {
        let err =
            PolynomialFit::fit_with(&[1.0, 1.0], &[2.0, 2.0], 2, Solver::NormalEquations)
                .unwrap_err();
        assert!(matches!(err, Error::SingularMatrix { .. }));
    }

    #[test]
    fn test_interpolation_has_identity_projection() {
        // k == m: the column space is all of R^m, so P == I and e == 0
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 0.0, 3.0];
        let fit = PolynomialFit::fit(&x, &y, 3).unwrap();

        let identity = DMatrix::<f64>::identity(3, 3);
        let defect = (fit.projection() - identity).amax();
        assert!(defect < 1e-8, "P should be the identity, defect = {defect}");
        assert_close!(fit.tlse(), 0.0, 1e-16);
    }

    #[test]
    fn test_metadata_accessors() {
        let fit = PolynomialFit::fit(&X, &Y_LINE, 2).unwrap();
        assert_eq!(fit.len(), 4);
        assert!(!fit.is_empty());
        assert_eq!(fit.dimension(), 2);
        assert_eq!(fit.order(), 1);
        assert_eq!(fit.solver(), Solver::Svd);
        assert_eq!(fit.x(), &X);
        assert_eq!(fit.y_values().as_slice(), &Y_LINE);
        assert_eq!(fit.design_matrix().shape(), (4, 2));
        assert_eq!(fit.projection().shape(), (4, 4));
    }
}
