use nalgebra::{DMatrix, DVector};

use super::{normal_equations, validate_problem, Fit, LinReg, Result};

/// Plain least squares, the zero penalty limit of both penalized regressions
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinaryLeastSquares;

impl LinReg for OrdinaryLeastSquares {
    fn fit_coefficients(&self, design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<Fit> {
        validate_problem(design, targets)?;

        let coefficients = normal_equations::solve(design, targets, 0.0)?;
        Ok(Fit::closed_form(coefficients))
    }
}
