//! # Projfit
//! ## Least-squares curve fitting that shows its work
//!
//! Most fitting libraries hand you a coefficient vector and wish you luck.
//! This one also hands you the proof: the projection matrix `P`, its
//! complement `I - P`, and the residual vector computed two independent ways,
//! so you can verify that the fit really is the orthogonal projection of your
//! data onto the column space of the design matrix.
//!
//! The crate provides tools to:
//! - Fit a degree-(k-1) polynomial to an `(x, y)` sample set by ordinary least squares
//! - Inspect the Vandermonde design matrix, coefficients, and fitted values
//! - Verify the projection identities `P = Pᵀ = P²` and `(I-P) = (I-P)ᵀ = (I-P)²`
//! - Compare training error against out-of-sample error on a second y-column
//! - Render the fitted polynomial as an equation string for legends and reports
//!
//! The simplest use-case is fitting a single column of data:
//! ```rust
//! use projfit::PolynomialFit;
//!
//! let x = [0.0, 1.0, 2.0, 3.0];
//! let y = [1.0, 3.0, 5.0, 7.0];
//!
//! // dimension 2 => a straight line (the polynomial order is dimension - 1)
//! let fit = PolynomialFit::fit(&x, &y, 2).expect("Failed to fit");
//!
//! assert_eq!(fit.equation(), "1.00e+00 + 2.00e+00x^1");
//! assert!(fit.tlse() < 1e-9);
//! ```
//!
//! # Core Concepts
//! - A [`PolynomialFit`] is an immutable snapshot of one least-squares solve:
//!   it is built once by [`PolynomialFit::fit`] and never mutated afterward.
//!   Fit a new instance for each (data, dimension) combination.
//! - The **dimension** `k` is the number of coefficients; `k - 1` is the
//!   polynomial order. `k` must not exceed the number of samples, or the
//!   normal-equations matrix is singular and the fit fails.
//! - The [`diagnostics`] module quantifies how far the computed projection is
//!   from a true orthogonal projection, which is never exactly zero in
//!   floating point.
//! - A [`table::DataTable`] bundles one shared x-column with any number of
//!   y-columns, the shape produced by a spreadsheet or CSV loader.
//!
//! # Implementation Details
//!
//! Coefficients are solved through the SVD of the design matrix rather than
//! the textbook `(AᵀA)⁻¹Aᵀb` inverse, which is fragile for ill-conditioned
//! columns. The explicit-inverse path is still available through
//! [`Solver::NormalEquations`] for reference-parity testing; see [`Solver`].
//!
//! This crate makes use of the `nalgebra` library for linear algebra
//! operations, and re-exports it for downstream matrix handling.
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // I don't care about this one
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar


pub mod diagnostics;
pub mod display;
pub mod error;
pub mod table;
pub mod value;

mod fit;

pub use fit::{vandermonde, PolynomialFit, Solver, DEFAULT_DIMENSION};

pub use nalgebra;
