//! Utilities for rendering fitted polynomials as equation strings
//!
//! This module turns a coefficient vector into the human-readable form used
//! for plot legends and console reports:
//!
//! ```text
//! 1.00e+00 + 2.00e+00x^1 + 5.00e-01x^2
//! ```
//!
//! Coefficients are printed in scientific notation with a signed two-digit
//! exponent, constant term first. Higher-order terms whose coefficient is
//! exactly zero are omitted; the constant term is always present so that the
//! string is never empty.
use crate::value::Value;

/// Default number of digits after the decimal point in equation strings
pub const DEFAULT_PRECISION: usize = 2;

/// Formats a value in scientific notation with a signed, zero-padded exponent.
///
/// Rust's `{:e}` renders `1.0` as `1e0`; reports and legends conventionally
/// use the `1.00e+00` form instead, which is what this function produces.
///
/// # Parameters
/// - `value`: The number to format.
/// - `precision`: Digits after the decimal point in the mantissa.
///
/// # Example
/// ```
/// # use projfit::display::scientific;
/// assert_eq!(scientific(1.0, 2), "1.00e+00");
/// assert_eq!(scientific(-0.05, 2), "-5.00e-02");
/// assert_eq!(scientific(1234.5, 2), "1.23e+03");
/// ```
#[must_use]
pub fn scientific<T: Value>(value: T, precision: usize) -> String {
    let raw = format!("{value:.precision$e}");

    // `{:e}` always emits a mantissa, 'e', and a bare exponent
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return raw;
    };

    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// Renders a coefficient vector as a polynomial equation string.
///
/// Terms run from the constant up to the highest power, joined with `" + "`.
/// The constant term is always included; any later term whose coefficient is
/// exactly zero is skipped.
///
/// Negative coefficients keep their sign inside the term, so a fit of
/// `y = 1 - 2x` renders as `"1.00e+00 + -2.00e+00x^1"`. This matches the
/// plain `" + "`-joined layout used by common spreadsheet reports.
///
/// # Parameters
/// - `coefficients`: Slice of coefficients, constant term first.
///
/// # Example
/// ```
/// # use projfit::display::equation_string;
/// assert_eq!(equation_string(&[1.0, 2.0]), "1.00e+00 + 2.00e+00x^1");
/// assert_eq!(equation_string(&[3.0, 0.0, 0.25]), "3.00e+00 + 2.50e-01x^2");
/// ```
#[must_use]
pub fn equation_string<T: Value>(coefficients: &[T]) -> String {
    let Some(&constant) = coefficients.first() else {
        return String::new();
    };

    let mut equation = scientific(constant, DEFAULT_PRECISION);
    for (power, &coef) in coefficients.iter().enumerate().skip(1) {
        if coef == T::zero() {
            continue;
        }

        equation.push_str(" + ");
        equation.push_str(&scientific(coef, DEFAULT_PRECISION));
        equation.push_str(&format!("x^{power}"));
    }

    equation
}
