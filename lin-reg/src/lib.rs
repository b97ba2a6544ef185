//! Penalized least squares solvers used to trace coefficient shrinkage

#![warn(missing_docs)]

#[macro_use]
extern crate log;

use nalgebra::{DMatrix, DVector};

mod coordinate_descent_lasso;
mod errors;
mod normal_equations;
mod ordinary_least_squares;
mod tikhonov_regularization;

pub use coordinate_descent_lasso::{
    lambda_max, soft_threshold, CoordinateDescentLasso, LassoParams,
};
pub use errors::{LinRegError, NonConvergence};
pub use ordinary_least_squares::OrdinaryLeastSquares;
pub use tikhonov_regularization::TikhonovRegularization;

/// Convenience alias used throughout this crate
pub type Result<T> = std::result::Result<T, LinRegError>;

/// Generic way of performing linear regression and fitting the coefficients
pub trait LinReg: Clone {
    /// Fit the coefficient vector, mapping the design to the targets
    ///
    /// # Parameters
    /// design: Input data with one row per sample and one column per feature.
    /// No intercept column is expected, so the data should be centered.
    /// targets: Target vector with as many entries as `design` has rows
    fn fit_coefficients(&self, design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<Fit>;
}

/// A regression whose objective carries a penalty strength
pub trait Penalized: LinReg {
    /// The penalty strength currently in use
    fn penalty(&self) -> f64;

    /// Same solver configuration, different penalty strength
    fn with_penalty(&self, penalty: f64) -> Self;
}

/// Result of fitting a linear regression
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    /// One coefficient per design column
    pub coefficients: DVector<f64>,
    /// Number of full sweeps an iterative solver used, 0 for closed form solvers
    pub sweeps: usize,
    /// Set when an iterative solver hit its sweep cap before converging
    pub non_convergence: Option<NonConvergence>,
}

impl Fit {
    pub(crate) fn closed_form(coefficients: DVector<f64>) -> Self {
        Self {
            coefficients,
            sweeps: 0,
            non_convergence: None,
        }
    }

    /// Whether the solver reached its convergence criterion
    #[inline(always)]
    pub fn converged(&self) -> bool {
        self.non_convergence.is_none()
    }
}

/// Ridge coefficients minimizing `||y - X b||^2 + lambda * ||b||^2`
pub fn solve_ridge(
    design: &DMatrix<f64>,
    targets: &DVector<f64>,
    lambda: f64,
) -> Result<DVector<f64>> {
    let regressor = TikhonovRegularization {
        regularization_coeff: lambda,
    };
    Ok(regressor.fit_coefficients(design, targets)?.coefficients)
}

/// Lasso coefficients minimizing `||y - X b||^2 + lambda * ||b||_1`,
/// using the default coordinate descent settings.
/// Hitting the sweep cap is logged and the last iterate is returned.
pub fn solve_lasso(
    design: &DMatrix<f64>,
    targets: &DVector<f64>,
    lambda: f64,
) -> Result<DVector<f64>> {
    let regressor = CoordinateDescentLasso::new(lambda);
    Ok(regressor.fit_coefficients(design, targets)?.coefficients)
}

/// Reject designs and targets that no solver can work with
pub(crate) fn validate_problem(design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<()> {
    if design.nrows() == 0 || design.ncols() == 0 {
        return Err(LinRegError::InvalidInput(format!(
            "design must be non-empty, got {}x{}",
            design.nrows(),
            design.ncols()
        )));
    }
    if design.nrows() != targets.len() {
        return Err(LinRegError::InvalidInput(format!(
            "design has {} rows but there are {} targets",
            design.nrows(),
            targets.len()
        )));
    }
    if design.iter().chain(targets.iter()).any(|v| !v.is_finite()) {
        return Err(LinRegError::InvalidInput("design and targets must be finite".to_string()));
    }

    Ok(())
}

pub(crate) fn validate_penalty(penalty: f64) -> Result<()> {
    if !penalty.is_finite() || penalty <= 0.0 {
        return Err(LinRegError::InvalidInput(format!(
            "penalty must be a strictly positive real, got {}",
            penalty
        )));
    }
    Ok(())
}
