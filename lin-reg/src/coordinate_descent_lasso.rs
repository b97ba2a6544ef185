use nalgebra::{DMatrix, DVector};

use super::{
    validate_penalty, validate_problem, Fit, LinReg, LinRegError, NonConvergence, Penalized, Result,
};

/// Stopping rule of the coordinate descent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LassoParams {
    /// A sweep whose largest coefficient change stays below this ends the iteration
    pub tolerance: f64,
    /// Upper bound on the number of full sweeps over all coefficients
    pub max_sweeps: usize,
}

impl Default for LassoParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_sweeps: 1000,
        }
    }
}

impl LassoParams {
    fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(LinRegError::InvalidInput(format!(
                "tolerance must be strictly positive, got {}",
                self.tolerance
            )));
        }
        if self.max_sweeps == 0 {
            return Err(LinRegError::InvalidInput("max_sweeps must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Lasso regression solved with cyclic coordinate descent.
/// Minimizes `||y - X b||^2 + regularization_coeff * ||b||_1`
/// and produces exact zeros for coefficients below the soft threshold.
#[derive(Debug, Clone)]
pub struct CoordinateDescentLasso {
    /// L1 penalty strength, must be strictly positive
    pub regularization_coeff: f64,
    /// Convergence settings
    pub params: LassoParams,
}

impl CoordinateDescentLasso {
    /// Lasso with the default convergence settings
    pub fn new(regularization_coeff: f64) -> Self {
        Self {
            regularization_coeff,
            params: LassoParams::default(),
        }
    }
}

impl LinReg for CoordinateDescentLasso {
    fn fit_coefficients(&self, design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<Fit> {
        validate_problem(design, targets)?;
        validate_penalty(self.regularization_coeff)?;
        self.params.validate()?;

        let n_features = design.ncols();
        let col_sq_norms: Vec<f64> =
            (0..n_features).map(|j| design.column(j).norm_squared()).collect();
        // The derivative of the squared loss carries a factor of 2
        let threshold = self.regularization_coeff / 2.0;

        let mut coefficients: DVector<f64> = DVector::zeros(n_features);
        // residual = targets - design * coefficients, kept up to date after every move
        let mut residual = targets.clone_owned();
        let mut max_change = 0.0_f64;

        for sweep in 1..=self.params.max_sweeps {
            max_change = 0.0;
            for j in 0..n_features {
                let sq_norm = col_sq_norms[j];
                if sq_norm == 0.0 {
                    continue;
                }
                let column = design.column(j);
                let old = coefficients[j];
                let rho = column.dot(&residual) + sq_norm * old;
                let new = soft_threshold(rho, threshold) / sq_norm;
                if new != old {
                    residual.axpy(old - new, &column, 1.0);
                    coefficients[j] = new;
                    max_change = max_change.max((new - old).abs());
                }
            }
            trace!("sweep {}: max coefficient change {:e}", sweep, max_change);

            if max_change < self.params.tolerance {
                debug!(
                    "lasso fit with lambda {} converged after {} sweeps, {} non-zero coefficients",
                    self.regularization_coeff,
                    sweep,
                    coefficients.iter().filter(|c| **c != 0.0).count()
                );
                return Ok(Fit {
                    coefficients,
                    sweeps: sweep,
                    non_convergence: None,
                });
            }
        }

        let warning = NonConvergence {
            sweeps: self.params.max_sweeps,
            max_change,
            tolerance: self.params.tolerance,
        };
        warn!("lasso with lambda {}: {}", self.regularization_coeff, warning);

        Ok(Fit {
            coefficients,
            sweeps: self.params.max_sweeps,
            non_convergence: Some(warning),
        })
    }
}

impl Penalized for CoordinateDescentLasso {
    #[inline(always)]
    fn penalty(&self) -> f64 {
        self.regularization_coeff
    }

    fn with_penalty(&self, penalty: f64) -> Self {
        Self {
            regularization_coeff: penalty,
            params: self.params,
        }
    }
}

/// Soft-thresholding operator `S(z, t) = sign(z) * max(|z| - t, 0)`.
/// Returns exactly `0.0` whenever `|z| <= t`.
#[inline]
pub fn soft_threshold(z: f64, threshold: f64) -> f64 {
    if z > threshold {
        z - threshold
    } else if z < -threshold {
        z + threshold
    } else {
        0.0
    }
}

/// Smallest penalty for which all lasso coefficients are exactly zero
pub fn lambda_max(design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<f64> {
    validate_problem(design, targets)?;
    // Same dot products as the first sweep, so lambda_max / 2 is exactly the largest |rho|
    let max_abs_corr = (0..design.ncols())
        .map(|j| design.column(j).dot(targets).abs())
        .fold(0.0, f64::max);
    Ok(2.0 * max_abs_corr)
}
