//! Forward finite differences of sampled data.

use crate::symbolic::errors::EnvError;
use nalgebra::DVector;

/// Forward first differences `(y[i+1] - y[i]) / (x[i+1] - x[i])`. The last
/// slope repeats the second-to-last so the output length equals the input
/// length. Unequal input lengths or fewer than two samples fail with a
/// shape mismatch.
pub fn dydx(y: &DVector<f64>, x: &DVector<f64>) -> Result<DVector<f64>, EnvError> {
    if y.len() != x.len() {
        return Err(EnvError::ShapeMismatch {
            expected: y.len(),
            found: x.len(),
        });
    }
    if y.len() < 2 {
        return Err(EnvError::ShapeMismatch {
            expected: 2,
            found: y.len(),
        });
    }
    let n = y.len();
    let mut slopes = DVector::zeros(n);
    for i in 0..n - 1 {
        slopes[i] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
    }
    slopes[n - 1] = slopes[n - 2];
    Ok(slopes)
}
