use common::ProcessedDataset;
use lin_reg::{
    CoordinateDescentLasso, LassoParams, LinReg, NonConvergence, Penalized, TikhonovRegularization,
};
use nalgebra::DVector;

use crate::{validate_penalties, GenerationToken, PenaltyGrid, Result};

/// (penalty, coefficient) pairs of a single feature, ready for charting
pub type Series = Vec<(f64, f64)>;

/// The coefficients fitted at one penalty
#[derive(Debug, Clone, PartialEq)]
pub struct PathPoint {
    /// The penalty strength
    pub penalty: f64,
    /// One coefficient per feature
    pub coefficients: DVector<f64>,
    /// Set if the solver stopped at its iteration cap
    pub non_convergence: Option<NonConvergence>,
}

/// Coefficient vectors across a sequence of penalties, in the order they were requested
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShrinkagePath {
    /// The fitted points
    pub points: Vec<PathPoint>,
}

impl ShrinkagePath {
    /// Number of points
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the path holds no points
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The trajectory of one coefficient
    pub fn series(&self, feature: usize) -> Series {
        self.points
            .iter()
            .filter_map(|p| p.coefficients.get(feature).map(|c| (p.penalty, *c)))
            .collect()
    }

    /// First penalty along the path from which on the coefficient stays exactly zero
    pub fn zero_from(&self, feature: usize) -> Option<f64> {
        let mut zero_from = None;
        for p in self.points.iter() {
            match p.coefficients.get(feature) {
                Some(c) if *c == 0.0 => {
                    if zero_from.is_none() {
                        zero_from = Some(p.penalty);
                    }
                }
                _ => zero_from = None,
            }
        }
        zero_from
    }

    /// Number of points where the solver hit its iteration cap
    pub fn non_converged(&self) -> usize {
        self.points.iter().filter(|p| p.non_convergence.is_some()).count()
    }
}

/// The ridge and lasso paths over the same penalties
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    /// L2 path
    pub ridge: ShrinkagePath,
    /// L1 path
    pub lasso: ShrinkagePath,
}

/// Fit `regressor` once per penalty, independently of the other penalties
///
/// # Arguments:
/// data: The standardized dataset
/// penalties: Strictly positive penalties, the output keeps their order
/// regressor: Template solver, its own penalty is replaced at every point
/// token: If given, the sweep is abandoned as soon as the generation is superseded
pub fn build_path<R: Penalized>(
    data: &ProcessedDataset,
    penalties: &[f64],
    regressor: &R,
    token: Option<&GenerationToken>,
) -> Result<ShrinkagePath> {
    validate_penalties(penalties)?;

    let mut points = Vec::with_capacity(penalties.len());
    for penalty in penalties.iter().copied() {
        if let Some(token) = token {
            token.check()?;
        }
        let fit = regressor.with_penalty(penalty).fit_coefficients(data.x(), data.y())?;
        points.push(PathPoint {
            penalty,
            coefficients: fit.coefficients,
            non_convergence: fit.non_convergence,
        });
    }

    Ok(ShrinkagePath { points })
}

/// Sweeps both solvers over a set of penalties
#[derive(Debug, Clone)]
pub struct PathBuilder {
    penalties: Vec<f64>,
    lasso_params: LassoParams,
    token: Option<GenerationToken>,
}

impl PathBuilder {
    /// Sweep over a log-spaced grid
    pub fn new(grid: &PenaltyGrid) -> Result<Self> {
        Self::from_penalties(grid.penalties()?)
    }

    /// Sweep over an explicit sequence of penalties
    pub fn from_penalties(penalties: Vec<f64>) -> Result<Self> {
        validate_penalties(&penalties)?;
        Ok(Self {
            penalties,
            lasso_params: LassoParams::default(),
            token: None,
        })
    }

    /// Use these coordinate descent settings for the lasso path
    pub fn lasso_params(mut self, params: LassoParams) -> Self {
        self.lasso_params = params;
        self
    }

    /// Abandon the sweep once `token` is superseded
    pub fn cancellable(mut self, token: GenerationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// The penalties that will be swept
    #[inline(always)]
    pub fn penalties(&self) -> &[f64] {
        &self.penalties
    }

    /// Compute the ridge and the lasso path
    pub fn build(&self, data: &ProcessedDataset) -> Result<Paths> {
        let ridge_template = TikhonovRegularization {
            regularization_coeff: self.penalties[0],
        };
        let lasso_template = CoordinateDescentLasso {
            regularization_coeff: self.penalties[0],
            params: self.lasso_params,
        };

        let ridge = build_path(data, &self.penalties, &ridge_template, self.token.as_ref())?;
        let lasso = build_path(data, &self.penalties, &lasso_template, self.token.as_ref())?;
        if lasso.non_converged() > 0 {
            warn!(
                "lasso did not converge at {} of {} penalties",
                lasso.non_converged(),
                lasso.len()
            );
        }
        info!("built shrinkage paths over {} penalties", self.penalties.len());

        Ok(Paths { ridge, lasso })
    }
}
