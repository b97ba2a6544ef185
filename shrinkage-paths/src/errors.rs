use common::DataError;
use lin_reg::LinRegError;
use thiserror::Error;

/// Everything that can stop a sweep
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Bad grid bounds or penalty values
    #[error("invalid penalty grid: {0}")]
    InvalidGrid(String),

    /// Generating or preprocessing the data failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// A solver failed
    #[error(transparent)]
    Solver(#[from] LinRegError),

    /// A newer computation was requested while this one was running
    #[error("generation {generation} was superseded by generation {latest}")]
    Superseded {
        /// The generation of the abandoned computation
        generation: u64,
        /// The latest generation at the time of the check
        latest: u64,
    },
}
