//! Numeric type abstraction for curve fitting.
//!
//! This module defines the [`Value`] trait, which abstracts the numeric
//! types that can be used in polynomial fitting and evaluation, ensuring
//! compatibility with nalgebra, floating-point operations, and formatting.
//!
//! Most users will never name this trait; everything in the public API
//! defaults to `f64`.
use crate::error::Error;

/// Numeric type for curve fits
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_cast() {
        let v = f64::try_cast(3usize).unwrap();
        assert_eq!(v, 3.0);

        // f32 cannot hold this integer exactly, but the cast still succeeds
        let v = f32::try_cast(1usize << 40).unwrap();
        assert!(num_traits::float::FloatCore::is_finite(v));
    }

    #[test]
    fn test_from_positive_int() {
        assert_eq!(f64::from_positive_int(7), 7.0);
    }

    #[test]
    fn test_powi() {
        assert_eq!(Value::powi(2.0f64, 10), 1024.0);
        assert_eq!(Value::powi(2.0f64, 0), 1.0);
    }
}
