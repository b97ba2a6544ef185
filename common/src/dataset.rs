use nalgebra::{DMatrix, DVector};

use crate::{DataError, Result};

/// A regression dataset together with the coefficients that generated it.
/// Immutable once built, a new dataset replaces an old one as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: DMatrix<f64>,
    y: DVector<f64>,
    true_coef: DVector<f64>,
}

impl Dataset {
    /// Assemble a dataset, checking that the dimensions agree
    ///
    /// # Arguments:
    /// x: One row per sample, one column per feature
    /// y: One target per sample
    /// true_coef: One coefficient per feature
    pub fn new(x: DMatrix<f64>, y: DVector<f64>, true_coef: DVector<f64>) -> Result<Self> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(DataError::InvalidInput(format!(
                "feature matrix must be non-empty, got {}x{}",
                x.nrows(),
                x.ncols()
            )));
        }
        if y.len() != x.nrows() {
            return Err(DataError::InvalidInput(format!(
                "{} targets for {} samples",
                y.len(),
                x.nrows()
            )));
        }
        if true_coef.len() != x.ncols() {
            return Err(DataError::InvalidInput(format!(
                "{} true coefficients for {} features",
                true_coef.len(),
                x.ncols()
            )));
        }

        Ok(Self { x, y, true_coef })
    }

    /// The feature matrix
    #[inline(always)]
    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    /// The target vector
    #[inline(always)]
    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    /// The ground truth coefficients
    #[inline(always)]
    pub fn true_coef(&self) -> &DVector<f64> {
        &self.true_coef
    }

    /// Number of rows
    #[inline(always)]
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Number of columns
    #[inline(always)]
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Copy out the given rows, in the given order
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            x: self.x.select_rows(rows.iter()),
            y: self.y.select_rows(rows.iter()),
            true_coef: self.true_coef.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_are_checked() {
        let x = DMatrix::from_element(3, 2, 1.0);
        assert!(Dataset::new(x.clone(), DVector::zeros(3), DVector::zeros(2)).is_ok());
        assert!(Dataset::new(x.clone(), DVector::zeros(4), DVector::zeros(2)).is_err());
        assert!(Dataset::new(x, DVector::zeros(3), DVector::zeros(3)).is_err());
        assert!(Dataset::new(DMatrix::zeros(0, 2), DVector::zeros(0), DVector::zeros(2)).is_err());
    }

    #[test]
    fn select_rows() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let y = DVector::from_vec(vec![10.0, 20.0, 30.0]);
        let ds = Dataset::new(x, y, DVector::from_vec(vec![1.0, 0.0])).unwrap();

        let sub = ds.select_rows(&[2, 0]);
        assert_eq!(sub.x(), &DMatrix::from_row_slice(2, 2, &[5.0, 6.0, 1.0, 2.0]));
        assert_eq!(sub.y(), &DVector::from_vec(vec![30.0, 10.0]));
        assert_eq!(sub.true_coef(), ds.true_coef());
    }
}
