//! Column-oriented sample data shared across several fits
//!
//! Spreadsheet-style regression data usually arrives as one x-column followed
//! by several y-columns measured at the same x positions. [`DataTable`]
//! captures that shape: it validates the columns once, then hands out fits
//! for any (column, dimension) combination without copying the x-values
//! around.
//!
//! How the columns were sourced (spreadsheet, CSV, array literal) is the
//! loader's business; this type only cares that they are same-length numeric
//! sequences.
//!
//! ```rust
//! use projfit::table::DataTable;
//!
//! let table = DataTable::new(
//!     vec![0.0, 1.0, 2.0, 3.0],
//!     vec![
//!         vec![1.0, 3.0, 5.0, 7.0],  // y0: exactly linear
//!         vec![1.1, 2.8, 5.2, 6.9],  // y1: noisy
//!     ],
//! ).unwrap();
//!
//! let fit = table.fit(0, 2).unwrap();
//! assert!(fit.tlse() < 1e-9);
//!
//! // TLSE for every column at dimensions 2 and 3
//! let grid = table.tlse_grid(&[2, 3]).unwrap();
//! assert_eq!(grid.len(), 2);
//! assert_eq!(grid[0].len(), 2);
//! ```
use crate::{
    error::{Error, Result},
    fit::PolynomialFit,
    value::Value,
    Solver,
};

/// One x-column and any number of same-length y-columns.
///
/// All columns are validated at construction and immutable afterward. Each
/// call to [`DataTable::fit`] builds an independent [`PolynomialFit`], so
/// fits for different columns or dimensions share no state.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable<T: Value = f64> {
    x: Vec<T>,
    columns: Vec<Vec<T>>,
}

impl<T: Value> DataTable<T> {
    /// Creates a table from an x-column and a set of y-columns.
    ///
    /// # Errors
    /// - [`Error::NoData`]: the x-column is empty.
    /// - [`Error::ShapeMismatch`]: any y-column differs in length from `x`.
    pub fn new(x: Vec<T>, columns: Vec<Vec<T>>) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::NoData);
        }

        for column in &columns {
            if column.len() != x.len() {
                return Err(Error::ShapeMismatch {
                    x: x.len(),
                    y: column.len(),
                });
            }
        }

        Ok(Self { x, columns })
    }

    /// Returns the number of samples (rows).
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the table has no rows.
    ///
    /// Always false in practice, since construction rejects an empty
    /// x-column.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Returns the number of y-columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the shared x-column.
    pub fn x(&self) -> &[T] {
        &self.x
    }

    /// Returns the y-column at `index`.
    ///
    /// # Errors
    /// Returns [`Error::ColumnOutOfRange`] if `index` is not a valid column.
    pub fn column(&self, index: usize) -> Result<&[T]> {
        self.columns
            .get(index)
            .map(Vec::as_slice)
            .ok_or(Error::ColumnOutOfRange {
                index,
                columns: self.columns.len(),
            })
    }

    /// Fits a polynomial with `dimension` coefficients to one y-column.
    ///
    /// # Errors
    /// Returns [`Error::ColumnOutOfRange`] for a bad column index, plus any
    /// of the construction errors of [`PolynomialFit::fit`].
    pub fn fit(&self, column: usize, dimension: usize) -> Result<PolynomialFit<T>> {
        PolynomialFit::fit(&self.x, self.column(column)?, dimension)
    }

    /// Fits one y-column at the default dimension (a quadratic).
    ///
    /// See [`crate::DEFAULT_DIMENSION`].
    ///
    /// # Errors
    /// Same as [`DataTable::fit`].
    pub fn fit_default(&self, column: usize) -> Result<PolynomialFit<T>> {
        self.fit(column, crate::DEFAULT_DIMENSION)
    }

    /// Fits a polynomial to one y-column with an explicit solver choice.
    ///
    /// # Errors
    /// Same as [`DataTable::fit`].
    pub fn fit_with(
        &self,
        column: usize,
        dimension: usize,
        solver: Solver,
    ) -> Result<PolynomialFit<T>> {
        PolynomialFit::fit_with(&self.x, self.column(column)?, dimension, solver)
    }

    /// Fits every y-column at the same dimension.
    ///
    /// Columns are fit in order, so `result[i]` corresponds to column `i`.
    ///
    /// # Errors
    /// Fails on the first column that cannot be fit; see
    /// [`PolynomialFit::fit`].
    pub fn fit_all(&self, dimension: usize) -> Result<Vec<PolynomialFit<T>>> {
        (0..self.n_columns())
            .map(|column| self.fit(column, dimension))
            .collect()
    }

    /// Computes the TLSE of every column × dimension combination.
    ///
    /// Returns one row per entry of `dimensions`, each containing the TLSE
    /// for every y-column at that dimension: `grid[d][c]` is the error of
    /// column `c` fit with `dimensions[d]` coefficients. This works for any
    /// number of columns; a reporting layer decides how to lay the grid out.
    ///
    /// # Errors
    /// Fails on the first (column, dimension) pair that cannot be fit, e.g.
    /// a dimension larger than the sample count.
    pub fn tlse_grid(&self, dimensions: &[usize]) -> Result<Vec<Vec<T>>> {
        dimensions
            .iter()
            .map(|&dimension| {
                (0..self.n_columns())
                    .map(|column| Ok(self.fit(column, dimension)?.tlse()))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::assert_close;

    fn sample_table() -> DataTable {
        DataTable::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![
                vec![1.0, 3.0, 5.0, 7.0, 9.0],   // exactly 2x + 1
                vec![0.9, 3.2, 4.8, 7.1, 9.3],   // noisy line
                vec![0.0, 1.0, 4.0, 9.0, 16.0],  // exactly x^2
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_construction_validates_shape() {
        let err = DataTable::new(vec![1.0, 2.0], vec![vec![1.0]]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { x: 2, y: 1 }));

        let err = DataTable::<f64>::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::NoData));
    }

    #[test]
    fn test_accessors() {
        let table = sample_table();
        assert_eq!(table.len(), 5);
        assert!(!table.is_empty());
        assert_eq!(table.n_columns(), 3);
        assert_eq!(table.x()[2], 2.0);
        assert_eq!(table.column(2).unwrap()[4], 16.0);

        let err = table.column(3).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnOutOfRange {
                index: 3,
                columns: 3
            }
        ));
    }

    #[test]
    fn test_fit_single_column() {
        let table = sample_table();
        let fit = table.fit(0, 2).unwrap();
        assert_close!(fit.coefficients()[0], 1.0, 1e-9);
        assert_close!(fit.coefficients()[1], 2.0, 1e-9);
    }

    #[test]
    fn test_fit_default_is_quadratic() {
        let table = sample_table();
        let fit = table.fit_default(2).unwrap();
        assert_eq!(fit.dimension(), 3);
        assert!(fit.tlse() < 1e-9); // column 2 is exactly x^2
    }

    #[test]
    fn test_fit_all() {
        let table = sample_table();
        let fits = table.fit_all(2).unwrap();
        assert_eq!(fits.len(), 3);

        // Column 0 is an exact line, column 1 is not
        assert!(fits[0].tlse() < 1e-9);
        assert!(fits[1].tlse() > 1e-3);
    }

    #[test]
    fn test_tlse_grid_shape_and_ordering() {
        let table = sample_table();
        let grid = table.tlse_grid(&[2, 3]).unwrap();

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].len(), 3);

        // The exact line stays exact at both dimensions
        assert!(grid[0][0] < 1e-9);
        assert!(grid[1][0] < 1e-9);

        // The parabola only becomes exact once a quadratic term is allowed
        assert!(grid[0][2] > 1.0);
        assert!(grid[1][2] < 1e-9);

        // Adding a coefficient can never increase the training error
        for column in 0..3 {
            assert!(grid[1][column] <= grid[0][column] + 1e-9);
        }
    }

    #[test]
    fn test_tlse_grid_rejects_oversized_dimension() {
        let table = sample_table();
        let err = table.tlse_grid(&[2, 9]).unwrap_err();
        assert!(matches!(err, Error::SingularMatrix { n: 5, k: 9 }));
    }

    #[test]
    fn test_train_test_across_columns() {
        let table = sample_table();

        // Fit on the noisy line, evaluate against the exact one
        let fit = table.fit(1, 2).unwrap();
        let (_, test_tlse) = fit.residual_against(table.column(0).unwrap()).unwrap();

        // The exact line differs from the noisy fit, but not wildly
        assert!(test_tlse > 0.0);
        assert!(test_tlse < 1.0);
    }
}
