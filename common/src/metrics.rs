use nalgebra::DVector;

use crate::{DataError, Result};

fn check_lengths(targets: &DVector<f64>, predictions: &DVector<f64>) -> Result<()> {
    if targets.is_empty() || targets.len() != predictions.len() {
        return Err(DataError::InvalidInput(format!(
            "need matching non-empty vectors, got {} targets and {} predictions",
            targets.len(),
            predictions.len()
        )));
    }
    Ok(())
}

/// Mean of the squared residuals
pub fn mean_squared_error(targets: &DVector<f64>, predictions: &DVector<f64>) -> Result<f64> {
    check_lengths(targets, predictions)?;
    Ok((targets - predictions).norm_squared() / targets.len() as f64)
}

/// Coefficient of determination `1 - SS_res / SS_tot`
pub fn r2_score(targets: &DVector<f64>, predictions: &DVector<f64>) -> Result<f64> {
    check_lengths(targets, predictions)?;
    let mean = targets.mean();
    let ss_tot = targets.iter().map(|t| (t - mean).powi(2)).sum::<f64>();
    if ss_tot == 0.0 {
        return Err(DataError::InvalidInput("r2 is undefined for a constant target".to_string()));
    }
    let ss_res = (targets - predictions).norm_squared();
    Ok(1.0 - ss_res / ss_tot)
}

/// Number of coefficients that are not exactly zero
pub fn count_non_zero(coefficients: &DVector<f64>) -> usize {
    coefficients.iter().filter(|c| **c != 0.0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let y = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(mean_squared_error(&y, &y).unwrap(), 0.0);
        assert_eq!(r2_score(&y, &y).unwrap(), 1.0);
    }

    #[test]
    fn mean_prediction_scores_zero() {
        let y = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let pred = DVector::from_element(3, 2.0);
        assert_eq!(mean_squared_error(&y, &pred).unwrap(), 2.0 / 3.0);
        assert_eq!(r2_score(&y, &pred).unwrap(), 0.0);
    }

    #[test]
    fn non_zero() {
        let coefs = DVector::from_vec(vec![0.0, -0.0, 1e-300, -2.0]);
        assert_eq!(count_non_zero(&coefs), 2);
    }

    #[test]
    fn invalid() {
        let y = DVector::from_vec(vec![1.0, 2.0]);
        let short = DVector::from_vec(vec![1.0]);
        assert!(mean_squared_error(&y, &short).is_err());
        assert!(r2_score(&DVector::from_element(2, 4.0), &y).is_err());
        assert!(r2_score(&DVector::zeros(0), &DVector::zeros(0)).is_err());
    }
}
