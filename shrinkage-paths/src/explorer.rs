use common::{
    count_non_zero, generate_data, mean_squared_error, r2_score, train_test_split, Dataset,
    GeneratorParams, PreprocessParams, ProcessedDataset,
};
use lin_reg::{CoordinateDescentLasso, Fit, LassoParams, LinReg, TikhonovRegularization};
use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, SeedableRng};

use crate::{Generation, GenerationToken, PathBuilder, PathError, Paths, PenaltyGrid, Result};

/// Everything a recomputation depends on
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Synthetic data settings
    pub generator: GeneratorParams,
    /// Standardization settings
    pub preprocess: PreprocessParams,
    /// Coordinate descent settings
    pub lasso: LassoParams,
    /// Penalties of the shrinkage paths
    pub grid: PenaltyGrid,
    /// Share of samples held out for evaluation
    pub test_fraction: f64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorParams::default(),
            preprocess: PreprocessParams::default(),
            lasso: LassoParams::default(),
            grid: PenaltyGrid::default(),
            test_fraction: 0.2,
        }
    }
}

impl ExplorerConfig {
    fn validate(&self) -> Result<()> {
        self.grid.len()?;
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PathError::Data(common::DataError::InvalidInput(format!(
                "test fraction must lie in (0, 1), got {}",
                self.test_fraction
            ))));
        }
        let n = self.generator.n_samples;
        let n_test = (n as f64 * self.test_fraction).ceil() as usize;
        if n_test < 2 || n < n_test + 2 {
            return Err(PathError::Data(common::DataError::InvalidInput(format!(
                "{} samples with test fraction {} leave fewer than 2 rows on one side",
                n, self.test_fraction
            ))));
        }
        Ok(())
    }
}

/// The derived state for one dataset, replaced as a whole on regeneration
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerState {
    /// The seed the dataset was generated with
    pub seed: u64,
    /// The full generated dataset
    pub dataset: Dataset,
    /// Rows used for fitting
    pub train: Dataset,
    /// Held out rows
    pub test: Dataset,
    /// Standardized training rows
    pub processed: ProcessedDataset,
    /// Held out rows, standardized with the training statistics
    pub test_x: DMatrix<f64>,
    /// Shrinkage paths fitted on the training rows
    pub paths: Paths,
}

impl ExplorerState {
    fn compute(config: &ExplorerConfig, seed: u64, token: &GenerationToken) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let dataset = generate_data(&config.generator, &mut rng)?;
        let (train, test) = train_test_split(&dataset, config.test_fraction, &mut rng)?;
        let processed = ProcessedDataset::from_dataset(&train, &config.preprocess)?;
        let test_x = processed.standardization().transform(test.x())?;
        token.check()?;

        let paths = PathBuilder::new(&config.grid)?
            .lasso_params(config.lasso)
            .cancellable(token.clone())
            .build(&processed)?;

        Ok(Self {
            seed,
            dataset,
            train,
            test,
            processed,
            test_x,
            paths,
        })
    }
}

/// How one model does at the selected penalty
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    /// Coefficients on the standardized scale
    pub coefficients: DVector<f64>,
    /// Mean squared error on the training rows
    pub train_mse: f64,
    /// Mean squared error on the held out rows
    pub test_mse: f64,
    /// R2 on the training rows
    pub train_r2: f64,
    /// R2 on the held out rows
    pub test_r2: f64,
    /// Coefficients that are not exactly zero
    pub non_zero: usize,
    /// False if the solver stopped at its iteration cap
    pub converged: bool,
}

/// Side by side view of lasso and ridge at one penalty
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The penalty both models were fitted with
    pub penalty: f64,
    /// Ground truth the data was generated from
    pub true_coef: DVector<f64>,
    /// L1 model
    pub lasso: ModelReport,
    /// L2 model
    pub ridge: ModelReport,
}

/// Owns the current dataset and everything derived from it.
/// A regeneration either completes and replaces the whole state or leaves it untouched.
#[derive(Debug)]
pub struct Explorer {
    config: ExplorerConfig,
    generation: Generation,
    state: ExplorerState,
}

impl Explorer {
    /// Generate the initial dataset and its paths
    pub fn new(config: ExplorerConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let generation = Generation::new();
        let token = generation.advance();
        let state = ExplorerState::compute(&config, seed, &token)?;

        Ok(Self {
            config,
            generation,
            state,
        })
    }

    /// The current configuration
    #[inline(always)]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// The current state
    #[inline(always)]
    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    /// Handle to the generation counter, advancing it supersedes a running recomputation
    pub fn generation(&self) -> Generation {
        self.generation.clone()
    }

    /// Draw a new dataset with the current configuration
    pub fn regenerate(&mut self, seed: u64) -> Result<()> {
        let config = self.config.clone();
        self.reconfigure(config, seed)
    }

    /// Switch to a new configuration and dataset.
    /// On error the previous configuration and state stay in place.
    pub fn reconfigure(&mut self, config: ExplorerConfig, seed: u64) -> Result<()> {
        config.validate()?;
        let token = self.generation.advance();
        let state = ExplorerState::compute(&config, seed, &token)?;
        token.check()?;

        info!("generation {}: dataset from seed {} is live", token.id(), seed);
        self.config = config;
        self.state = state;
        Ok(())
    }

    /// Fit both models at `penalty` on the training rows and evaluate them
    pub fn compare_at(&self, penalty: f64) -> Result<Comparison> {
        let lasso = CoordinateDescentLasso {
            regularization_coeff: penalty,
            params: self.config.lasso,
        };
        let ridge = TikhonovRegularization {
            regularization_coeff: penalty,
        };
        let x = self.state.processed.x();
        let y = self.state.processed.y();

        Ok(Comparison {
            penalty,
            true_coef: self.state.dataset.true_coef().clone(),
            lasso: self.report(lasso.fit_coefficients(x, y)?)?,
            ridge: self.report(ridge.fit_coefficients(x, y)?)?,
        })
    }

    fn report(&self, fit: Fit) -> Result<ModelReport> {
        let standardization = self.state.processed.standardization();
        let train_pred = standardization.predict(self.state.processed.x(), &fit.coefficients)?;
        let test_pred = standardization.predict(&self.state.test_x, &fit.coefficients)?;
        let (train_y, test_y) = (self.state.train.y(), self.state.test.y());

        Ok(ModelReport {
            train_mse: mean_squared_error(train_y, &train_pred)?,
            test_mse: mean_squared_error(test_y, &test_pred)?,
            train_r2: r2_score(train_y, &train_pred)?,
            test_r2: r2_score(test_y, &test_pred)?,
            non_zero: count_non_zero(&fit.coefficients),
            converged: fit.converged(),
            coefficients: fit.coefficients,
        })
    }
}

#[cfg(test)]
mod tests {
    use common::TrueCoefficients;
    use lin_reg::LinRegError;

    use super::*;

    const SEED: u64 = 42;

    #[test]
    fn initial_state() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let explorer = Explorer::new(ExplorerConfig::default(), SEED).unwrap();
        let state = explorer.state();

        assert_eq!(state.seed, SEED);
        assert_eq!(state.dataset.n_samples(), 100);
        assert_eq!(state.train.n_samples(), 80);
        assert_eq!(state.test.n_samples(), 20);
        assert_eq!(state.test_x.nrows(), 20);
        assert_eq!(state.paths.ridge.len(), 31);
        assert_eq!(state.paths.lasso.len(), 31);
    }

    #[test]
    fn comparison_at_small_and_large_penalty() {
        let explorer = Explorer::new(ExplorerConfig::default(), SEED).unwrap();

        let weak = explorer.compare_at(0.01).unwrap();
        assert_eq!(weak.true_coef.len(), 10);
        assert_eq!(weak.ridge.non_zero, 10);
        assert!(weak.lasso.converged);
        // Signal dominates a noise scale of 1
        assert!(weak.ridge.train_r2 > 0.9);
        assert!(weak.lasso.test_r2 > 0.8);

        let strong = explorer.compare_at(1e4).unwrap();
        assert_eq!(strong.lasso.non_zero, 0);
        assert_eq!(strong.ridge.non_zero, 10);
        assert!(strong.lasso.train_mse > weak.lasso.train_mse);
        assert!(strong.ridge.train_mse > weak.ridge.train_mse);
        // Predicting the training mean everywhere
        assert!(strong.lasso.train_r2.abs() < 1e-12);
    }

    #[test]
    fn regenerate_replaces_everything() {
        let mut explorer = Explorer::new(ExplorerConfig::default(), SEED).unwrap();
        let before = explorer.state().clone();

        explorer.regenerate(SEED + 1).unwrap();
        assert_eq!(explorer.state().seed, SEED + 1);
        assert_ne!(explorer.state().dataset, before.dataset);
        assert_ne!(explorer.state().paths, before.paths);

        // Same seed, same state
        explorer.regenerate(SEED).unwrap();
        assert_eq!(explorer.state(), &before);
    }

    #[test]
    fn failed_reconfiguration_keeps_state() {
        let mut explorer = Explorer::new(ExplorerConfig::default(), SEED).unwrap();
        let before = explorer.state().clone();

        let mut config = ExplorerConfig::default();
        config.generator.noise_scale = -1.0;
        assert!(matches!(explorer.reconfigure(config, 7), Err(PathError::Data(_))));

        let mut config = ExplorerConfig::default();
        config.grid.log10_step = 0.0;
        assert!(matches!(explorer.reconfigure(config, 7), Err(PathError::InvalidGrid(_))));

        assert_eq!(explorer.state(), &before);
        assert_eq!(explorer.config(), &ExplorerConfig::default());
    }

    #[test]
    fn reconfigure_with_sparse_ground_truth() {
        let mut explorer = Explorer::new(ExplorerConfig::default(), SEED).unwrap();
        let config = ExplorerConfig {
            generator: GeneratorParams {
                n_samples: 200,
                n_features: 20,
                noise_scale: 10.0,
                coefficients: TrueCoefficients::Sparse {
                    n_informative: 10,
                    max_magnitude: 100.0,
                },
            },
            ..Default::default()
        };
        explorer.reconfigure(config, 3).unwrap();

        let state = explorer.state();
        assert_eq!(state.dataset.n_features(), 20);
        assert_eq!(state.train.n_samples(), 160);
        assert!(state.paths.lasso.points.iter().all(|p| p.coefficients.len() == 20));
        assert_eq!(explorer.compare_at(1.0).unwrap().ridge.coefficients.len(), 20);
    }

    #[test]
    fn invalid_split_and_penalty() {
        let config = ExplorerConfig {
            test_fraction: 0.0,
            ..Default::default()
        };
        assert!(Explorer::new(config, SEED).is_err());

        let config = ExplorerConfig {
            generator: GeneratorParams {
                n_samples: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(Explorer::new(config, SEED).is_err());

        let explorer = Explorer::new(ExplorerConfig::default(), SEED).unwrap();
        for penalty in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                explorer.compare_at(penalty),
                Err(PathError::Solver(LinRegError::InvalidInput(_)))
            ));
        }
    }

    #[test]
    fn oversized_grid_is_rejected_and_state_kept() {
        let mut explorer = Explorer::new(ExplorerConfig::default(), SEED).unwrap();
        let before = explorer.state().clone();

        for log10_step in [1e-300, 1e-12] {
            let mut config = ExplorerConfig::default();
            config.grid.log10_step = log10_step;
            assert!(matches!(
                explorer.reconfigure(config.clone(), 7),
                Err(PathError::InvalidGrid(_))
            ));
            assert!(matches!(Explorer::new(config, SEED), Err(PathError::InvalidGrid(_))));
        }
        assert_eq!(explorer.state(), &before);
    }

    #[test]
    fn generation_advances_per_regeneration() {
        let mut explorer = Explorer::new(ExplorerConfig::default(), SEED).unwrap();
        let generation = explorer.generation();
        assert_eq!(generation.latest(), 1);

        explorer.regenerate(1).unwrap();
        explorer.regenerate(2).unwrap();
        assert_eq!(generation.latest(), 3);
    }
}
