//! This crate provides the data side: synthetic regression datasets,
//! standardization, train / test splitting and fit metrics

#![deny(unused_imports, unused_crate_dependencies)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod dataset;
mod errors;
mod generator;
mod metrics;
mod preprocessing;
mod split;

pub use dataset::Dataset;
pub use errors::DataError;
pub use generator::{generate_data, GeneratorParams, TrueCoefficients};
pub use metrics::{count_non_zero, mean_squared_error, r2_score};
pub use preprocessing::{preprocess_data, PreprocessParams, ProcessedDataset, Standardization};
pub use split::train_test_split;

/// Convenience alias used throughout this crate
pub type Result<T> = std::result::Result<T, DataError>;
