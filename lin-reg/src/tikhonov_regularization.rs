use nalgebra::{DMatrix, DVector};

use super::{normal_equations, validate_penalty, validate_problem, Fit, LinReg, Penalized, Result};

/// Tikhonov regularization aka ridge regression
/// It is particularly useful to mitigate the problem of multicollinearity in
/// linear regression. Coefficients shrink continuously towards zero as the
/// penalty grows, but do not reach it for any finite penalty.
#[derive(Debug, Clone)]
pub struct TikhonovRegularization {
    /// Ridge parameter, must be strictly positive
    pub regularization_coeff: f64,
}

impl LinReg for TikhonovRegularization {
    fn fit_coefficients(&self, design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<Fit> {
        validate_problem(design, targets)?;
        validate_penalty(self.regularization_coeff)?;

        let coefficients = normal_equations::solve(design, targets, self.regularization_coeff)?;
        debug!(
            "ridge fit with lambda {}: |b|_2 = {:.6}",
            self.regularization_coeff,
            coefficients.norm()
        );

        Ok(Fit::closed_form(coefficients))
    }
}

impl Penalized for TikhonovRegularization {
    #[inline(always)]
    fn penalty(&self) -> f64 {
        self.regularization_coeff
    }

    fn with_penalty(&self, penalty: f64) -> Self {
        Self {
            regularization_coeff: penalty,
        }
    }
}

#[cfg(test)]
mod tests {
    use round::round;

    use super::*;
    use crate::{LinRegError, OrdinaryLeastSquares};

    fn design_with_ones() -> DMatrix<f64> {
        // Note the first column being just ones
        DMatrix::from_vec(
            4,
            3,
            vec![1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 2.0],
        )
    }

    #[test]
    fn tikhonov_regularization() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let design = design_with_ones();
        let targets = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        info!("design: {}, targets: {}", design, targets);

        let regressor = TikhonovRegularization {
            regularization_coeff: 1e-9,
        };
        let mut coefficients = regressor.fit_coefficients(&design, &targets).unwrap().coefficients;
        info!("coefficients: {}", coefficients);

        // round coefficients
        coefficients.iter_mut().for_each(|v| *v = round(*v, 1));

        assert_eq!(coefficients, DVector::from_vec(vec![1.0, 1.0, 0.0]));
    }

    #[test]
    fn tikhonov_regularization_shifted() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let design = design_with_ones() * 100.0;
        let targets = DVector::from_vec(vec![100.0, 200.0, 300.0, 400.0]);
        info!("design: {}, targets: {}", design, targets);

        let regressor = TikhonovRegularization {
            regularization_coeff: 1e-9,
        };
        let mut coefficients = regressor.fit_coefficients(&design, &targets).unwrap().coefficients;
        info!("coefficients: {}", coefficients);

        coefficients.iter_mut().for_each(|v| *v = round(*v, 1));

        assert_eq!(coefficients, DVector::from_vec(vec![1.0, 1.0, 0.0]));
    }

    #[test]
    fn small_penalty_approaches_least_squares() {
        let design = DMatrix::from_row_slice(
            6,
            3,
            &[
                0.3, -1.2, 0.8, 1.5, 0.4, -0.2, -0.7, 0.9, 1.1, 0.2, -0.3, -1.6, -1.1, 1.4, 0.5,
                0.9, -0.6, 0.1,
            ],
        );
        let targets = DVector::from_vec(vec![1.0, 2.5, -0.5, -2.0, 1.5, 0.8]);

        let ols = OrdinaryLeastSquares.fit_coefficients(&design, &targets).unwrap().coefficients;
        let mut prev_gap = f64::MAX;
        for lambda in [1.0, 1e-2, 1e-4, 1e-8] {
            let ridge = TikhonovRegularization {
                regularization_coeff: lambda,
            }
            .fit_coefficients(&design, &targets)
            .unwrap()
            .coefficients;
            let gap = (&ridge - &ols).amax();
            assert!(gap <= prev_gap);
            prev_gap = gap;
        }
        assert!(prev_gap < 1e-6);
    }

    #[test]
    fn large_penalty_shrinks_to_zero_without_reaching_it() {
        let design = design_with_ones();
        let targets = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);

        let coefficients = TikhonovRegularization {
            regularization_coeff: 1e12,
        }
        .fit_coefficients(&design, &targets)
        .unwrap()
        .coefficients;

        assert!(coefficients.amax() < 1e-9);
        assert!(coefficients.iter().all(|c| *c != 0.0));
    }

    #[test]
    fn near_singular_gram_matrix_is_a_numerical_error() {
        // Two identical columns
        let design = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let targets = DVector::from_vec(vec![1.0, 2.0, 3.0]);

        let res = TikhonovRegularization {
            regularization_coeff: 1e-20,
        }
        .fit_coefficients(&design, &targets);
        assert!(matches!(res, Err(LinRegError::Numerical(_))));

        // A proper penalty makes the problem well posed again
        let coefficients = TikhonovRegularization {
            regularization_coeff: 1.0,
        }
        .fit_coefficients(&design, &targets)
        .unwrap()
        .coefficients;
        assert!((coefficients[0] - coefficients[1]).abs() < 1e-12);
    }

    #[test]
    fn deterministic() {
        let design = design_with_ones();
        let targets = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let regressor = TikhonovRegularization {
            regularization_coeff: 0.3,
        };
        assert_eq!(
            regressor.fit_coefficients(&design, &targets).unwrap(),
            regressor.fit_coefficients(&design, &targets).unwrap()
        );
    }

    #[test]
    fn with_penalty() {
        let regressor = TikhonovRegularization {
            regularization_coeff: 0.3,
        };
        let other = regressor.with_penalty(7.0);
        assert_eq!(other.penalty(), 7.0);
        assert_eq!(regressor.penalty(), 0.3);
    }
}
