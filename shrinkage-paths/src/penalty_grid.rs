use crate::{PathError, Result};

/// Upper bound on the number of penalties of one grid
pub const MAX_GRID_POINTS: usize = 100_000;

/// Log-spaced penalty values `10^start, 10^(start + step), ..., 10^end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyGrid {
    /// Exponent of the smallest penalty
    pub log10_start: f64,
    /// Exponent of the largest penalty
    pub log10_end: f64,
    /// Distance between consecutive exponents
    pub log10_step: f64,
}

impl Default for PenaltyGrid {
    /// 31 penalties from 0.01 to 10_000
    fn default() -> Self {
        Self {
            log10_start: -2.0,
            log10_end: 4.0,
            log10_step: 0.2,
        }
    }
}

impl PenaltyGrid {
    /// Number of grid points, an end that falls between two steps is not included
    pub fn len(&self) -> Result<usize> {
        if !self.log10_start.is_finite() || !self.log10_end.is_finite() {
            return Err(PathError::InvalidGrid(format!(
                "bounds must be finite, got {} and {}",
                self.log10_start, self.log10_end
            )));
        }
        if !self.log10_step.is_finite() || self.log10_step <= 0.0 {
            return Err(PathError::InvalidGrid(format!(
                "step must be strictly positive, got {}",
                self.log10_step
            )));
        }
        if self.log10_end < self.log10_start {
            return Err(PathError::InvalidGrid(format!(
                "end {} lies below start {}",
                self.log10_end, self.log10_start
            )));
        }

        let intervals = ((self.log10_end - self.log10_start) / self.log10_step + 1e-9).floor();
        if !intervals.is_finite() || intervals >= MAX_GRID_POINTS as f64 {
            return Err(PathError::InvalidGrid(format!(
                "step {} from {} to {} exceeds {} penalties",
                self.log10_step, self.log10_start, self.log10_end, MAX_GRID_POINTS
            )));
        }
        Ok(intervals as usize + 1)
    }

    /// The penalties in increasing order
    pub fn penalties(&self) -> Result<Vec<f64>> {
        let len = self.len()?;
        let penalties: Vec<f64> = (0..len)
            .map(|k| 10f64.powf(self.log10_start + k as f64 * self.log10_step))
            .collect();
        validate_penalties(&penalties)?;
        Ok(penalties)
    }
}

/// Every penalty must be a strictly positive finite real
pub fn validate_penalties(penalties: &[f64]) -> Result<()> {
    if penalties.is_empty() {
        return Err(PathError::InvalidGrid("no penalties given".to_string()));
    }
    if let Some(p) = penalties.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(PathError::InvalidGrid(format!(
            "penalties must be strictly positive reals, got {}",
            p
        )));
    }
    Ok(())
}
