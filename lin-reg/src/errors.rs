use thiserror::Error;

/// Errors a regression can run into
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinRegError {
    /// Malformed dimensions, non-finite data or a non-positive penalty
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The normal equations could not be solved reliably
    #[error("numerical error: {0}")]
    Numerical(String),
}

/// Reported when coordinate descent used up its sweep budget.
/// Not an error, the fit still carries the last iterate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonConvergence {
    /// Number of sweeps that were performed
    pub sweeps: usize,
    /// Largest coefficient change observed in the final sweep
    pub max_change: f64,
    /// The tolerance that was not reached
    pub tolerance: f64,
}

impl std::fmt::Display for NonConvergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no convergence after {} sweeps (max change {:e}, tolerance {:e})",
            self.sweeps, self.max_change, self.tolerance
        )
    }
}
