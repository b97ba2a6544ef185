use nalgebra::{Cholesky, DMatrix, DVector};

use crate::{LinRegError, Result};

/// Below this reciprocal condition estimate the solution is not trusted
pub(crate) const MIN_RECIPROCAL_CONDITION: f64 = 1e-12;

/// Solve `(X^T X + diagonal * I) b = X^T y` through a cholesky factorization
///
/// # Arguments:
/// design: The (centered) design matrix
/// targets: The (centered) target vector
/// diagonal: Added to every diagonal element of the gram matrix, 0 for plain least squares
pub(crate) fn solve(
    design: &DMatrix<f64>,
    targets: &DVector<f64>,
    diagonal: f64,
) -> Result<DVector<f64>> {
    let mut gram = design.tr_mul(design);
    for i in 0..gram.nrows() {
        gram[(i, i)] += diagonal;
    }
    let moments = design.tr_mul(targets);

    let cholesky = Cholesky::new(gram).ok_or_else(|| {
        LinRegError::Numerical("gram matrix is not positive definite".to_string())
    })?;

    let rcond = reciprocal_condition(&cholesky);
    trace!("reciprocal condition estimate: {:e}", rcond);
    if !(rcond >= MIN_RECIPROCAL_CONDITION) {
        return Err(LinRegError::Numerical(format!(
            "gram matrix is near singular (reciprocal condition estimate {:e})",
            rcond
        )));
    }

    Ok(cholesky.solve(&moments))
}

/// Cheap conditioning estimate from the spread of the cholesky diagonal
fn reciprocal_condition(cholesky: &Cholesky<f64, nalgebra::Dyn>) -> f64 {
    let diag = cholesky.l_dirty().diagonal();
    let (min, max) = diag
        .iter()
        .fold((f64::MAX, 0.0_f64), |(min, max), v| (min.min(*v), max.max(*v)));
    if max <= 0.0 {
        return 0.0;
    }
    (min / max).powi(2)
}
