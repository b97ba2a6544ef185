use nalgebra::{DMatrix, DVector};
use rand::{seq::SliceRandom, Rng};
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::{DataError, Dataset, Result};

/// How the ground truth coefficients are obtained
#[derive(Debug, Clone, PartialEq)]
pub enum TrueCoefficients {
    /// Use exactly these coefficients, one per feature
    Given(Vec<f64>),
    /// Draw `n_informative` non-zero coefficients at random positions,
    /// with magnitudes uniform in `[1, max_magnitude)` and random signs.
    /// All other coefficients are exactly zero.
    Sparse {
        /// Number of non-zero coefficients
        n_informative: usize,
        /// Exclusive upper bound on the magnitude
        max_magnitude: f64,
    },
}

/// The parameters of the synthetic data generator
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    /// Number of rows
    pub n_samples: usize,
    /// Number of columns
    pub n_features: usize,
    /// Standard deviation of the gaussian noise added to the targets
    pub noise_scale: f64,
    /// Ground truth used to compute the targets
    pub coefficients: TrueCoefficients,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            n_samples: 100,
            n_features: 10,
            noise_scale: 1.0,
            coefficients: TrueCoefficients::Given(vec![
                5.0, 0.0, -3.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, -1.0,
            ]),
        }
    }
}

impl GeneratorParams {
    fn validate(&self) -> Result<()> {
        if self.n_samples == 0 || self.n_features == 0 {
            return Err(DataError::InvalidInput(format!(
                "sample and feature counts must be positive, got {} and {}",
                self.n_samples, self.n_features
            )));
        }
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(DataError::InvalidInput(format!(
                "noise scale must be finite and non-negative, got {}",
                self.noise_scale
            )));
        }
        match &self.coefficients {
            TrueCoefficients::Given(coefs) => {
                if coefs.len() != self.n_features {
                    return Err(DataError::InvalidInput(format!(
                        "{} coefficients given for {} features",
                        coefs.len(),
                        self.n_features
                    )));
                }
                if coefs.iter().any(|c| !c.is_finite()) {
                    return Err(DataError::InvalidInput(
                        "given coefficients must be finite".to_string(),
                    ));
                }
            }
            TrueCoefficients::Sparse {
                n_informative,
                max_magnitude,
            } => {
                if *n_informative == 0 || *n_informative > self.n_features {
                    return Err(DataError::InvalidInput(format!(
                        "n_informative must lie in [1, {}], got {}",
                        self.n_features, n_informative
                    )));
                }
                if !max_magnitude.is_finite() || *max_magnitude <= 1.0 {
                    return Err(DataError::InvalidInput(format!(
                        "max_magnitude must be a finite value above 1, got {}",
                        max_magnitude
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Generate a synthetic regression dataset `y = X * true_coef + noise`,
/// where X has independent standard normal entries
///
/// # Arguments:
/// params: Sizes, noise and ground truth
/// rng: The random source, seed it for reproducible data
pub fn generate_data<R: Rng + ?Sized>(params: &GeneratorParams, rng: &mut R) -> Result<Dataset> {
    params.validate()?;
    let noise = Normal::new(0.0, params.noise_scale)
        .map_err(|e| DataError::InvalidInput(format!("noise distribution: {}", e)))?;

    let x = DMatrix::from_fn(params.n_samples, params.n_features, |_, _| {
        rng.sample::<f64, _>(StandardNormal)
    });

    let true_coef = match &params.coefficients {
        TrueCoefficients::Given(coefs) => DVector::from_column_slice(coefs),
        TrueCoefficients::Sparse {
            n_informative,
            max_magnitude,
        } => {
            let mut indices: Vec<usize> = (0..params.n_features).collect();
            indices.shuffle(rng);
            let mut coefs = DVector::zeros(params.n_features);
            for i in indices.into_iter().take(*n_informative) {
                let magnitude = rng.gen_range(1.0..*max_magnitude);
                coefs[i] = if rng.gen_bool(0.5) { -magnitude } else { magnitude };
            }
            coefs
        }
    };

    let mut y = &x * &true_coef;
    for v in y.iter_mut() {
        *v += noise.sample(rng);
    }

    info!(
        "generated {} samples with {} features, {} informative, noise scale {}",
        params.n_samples,
        params.n_features,
        true_coef.iter().filter(|c| **c != 0.0).count(),
        params.noise_scale
    );
    trace!("true coefficients: {}", true_coef);

    Dataset::new(x, y, true_coef)
}
