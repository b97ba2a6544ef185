//! Coefficient shrinkage paths of ridge and lasso over a penalty sweep

#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod errors;
mod explorer;
mod generation;
mod path_builder;
mod penalty_grid;

pub use errors::PathError;
pub use explorer::{Comparison, Explorer, ExplorerConfig, ExplorerState, ModelReport};
pub use generation::{Generation, GenerationToken};
pub use path_builder::{build_path, PathBuilder, PathPoint, Paths, Series, ShrinkagePath};
pub use penalty_grid::{validate_penalties, PenaltyGrid, MAX_GRID_POINTS};

/// Convenience alias used throughout this crate
pub type Result<T> = std::result::Result<T, PathError>;
