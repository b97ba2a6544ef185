use nalgebra::{DMatrix, DVector};

use crate::{DataError, Dataset, Result};

/// Options of the preprocessing step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessParams {
    /// Subtract the target mean, so no intercept has to be fitted
    pub center_target: bool,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            center_target: true,
        }
    }
}

/// Fitted per-column means and scales.
/// A scale of zero marks a constant column, which is mapped to all zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardization {
    feature_means: DVector<f64>,
    feature_scales: DVector<f64>,
    target_mean: f64,
}

impl Standardization {
    fn fit(x: &DMatrix<f64>, y: &DVector<f64>, params: &PreprocessParams) -> Self {
        let n = x.nrows() as f64;
        let mut feature_means = DVector::zeros(x.ncols());
        let mut feature_scales = DVector::zeros(x.ncols());
        for (j, column) in x.column_iter().enumerate() {
            let mean = column.sum() / n;
            let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();

            feature_means[j] = mean;
            if std <= 1e-12 * mean.abs().max(1.0) {
                warn!("feature {} is constant, it will be zero after standardization", j);
            } else {
                feature_scales[j] = std;
            }
        }
        let target_mean = if params.center_target { y.sum() / n } else { 0.0 };

        Self {
            feature_means,
            feature_scales,
            target_mean,
        }
    }

    /// Per-column means
    #[inline(always)]
    pub fn feature_means(&self) -> &DVector<f64> {
        &self.feature_means
    }

    /// Per-column population standard deviations, zero for constant columns
    #[inline(always)]
    pub fn feature_scales(&self) -> &DVector<f64> {
        &self.feature_scales
    }

    /// The value subtracted from the targets, zero if they were not centered
    #[inline(always)]
    pub fn target_mean(&self) -> f64 {
        self.target_mean
    }

    /// Apply the fitted transformation to (possibly unseen) feature rows
    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if x.ncols() != self.feature_means.len() {
            return Err(DataError::InvalidInput(format!(
                "expected {} features, got {}",
                self.feature_means.len(),
                x.ncols()
            )));
        }

        let mut out = x.clone();
        for (j, mut column) in out.column_iter_mut().enumerate() {
            let mean = self.feature_means[j];
            let scale = self.feature_scales[j];
            if scale == 0.0 {
                column.fill(0.0);
            } else {
                column.iter_mut().for_each(|v| *v = (*v - mean) / scale);
            }
        }
        Ok(out)
    }

    /// Apply the fitted target centering
    pub fn transform_target(&self, y: &DVector<f64>) -> DVector<f64> {
        y.add_scalar(-self.target_mean)
    }

    /// Predictions in the original target units from standardized features
    ///
    /// # Arguments:
    /// x_std: Standardized feature rows
    /// coefficients: Coefficients fitted on standardized data
    pub fn predict(
        &self,
        x_std: &DMatrix<f64>,
        coefficients: &DVector<f64>,
    ) -> Result<DVector<f64>> {
        if x_std.ncols() != coefficients.len() {
            return Err(DataError::InvalidInput(format!(
                "{} coefficients for {} features",
                coefficients.len(),
                x_std.ncols()
            )));
        }
        Ok((x_std * coefficients).add_scalar(self.target_mean))
    }
}

/// A dataset with standardized features and (optionally) centered targets.
/// Reused for every solver invocation on the same data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDataset {
    x: DMatrix<f64>,
    y: DVector<f64>,
    standardization: Standardization,
}

impl ProcessedDataset {
    /// Standardize a generated dataset
    pub fn from_dataset(dataset: &Dataset, params: &PreprocessParams) -> Result<Self> {
        preprocess_data(dataset.x(), dataset.y(), params)
    }

    /// Standardized features
    #[inline(always)]
    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    /// Centered targets
    #[inline(always)]
    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    /// The transformation that produced this dataset
    #[inline(always)]
    pub fn standardization(&self) -> &Standardization {
        &self.standardization
    }

    /// Number of columns
    #[inline(always)]
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

/// Standardize every feature column to zero mean and unit population variance
/// and center the target if requested
pub fn preprocess_data(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    params: &PreprocessParams,
) -> Result<ProcessedDataset> {
    if x.nrows() < 2 || x.ncols() == 0 {
        return Err(DataError::InvalidInput(format!(
            "need at least 2 samples and 1 feature to standardize, got {}x{}",
            x.nrows(),
            x.ncols()
        )));
    }
    if y.len() != x.nrows() {
        return Err(DataError::InvalidInput(format!(
            "{} targets for {} samples",
            y.len(),
            x.nrows()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(DataError::InvalidInput("features and targets must be finite".to_string()));
    }

    let standardization = Standardization::fit(x, y, params);
    let x = standardization.transform(x)?;
    let y = standardization.transform_target(y);
    debug!(
        "standardized {} samples, feature means: {}",
        x.nrows(),
        standardization.feature_means.transpose()
    );

    Ok(ProcessedDataset {
        x,
        y,
        standardization,
    })
}
