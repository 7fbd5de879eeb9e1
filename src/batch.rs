//! Shape checks for batches of estimates and ideals

use crate::error::{LossError, Result};

/// Check that `estimate` and `ideal` form a non-empty rectangular pair of
/// batches of the same shape.
///
/// The expected width is taken from the first estimate row, the same row the
/// mean squared error divides by.
pub fn check_shapes(estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> Result<()> {
    if estimate.is_empty() {
        return Err(LossError::EmptyBatch);
    }
    if estimate.len() != ideal.len() {
        return Err(LossError::BatchSizeMismatch {
            estimate: estimate.len(),
            ideal: ideal.len(),
        });
    }

    let width = estimate[0].len();
    for (row, (e, i)) in estimate.iter().zip(ideal).enumerate() {
        for found in [e.len(), i.len()] {
            if found != width {
                return Err(LossError::ShapeMismatch { row, expected: width, found });
            }
        }
    }

    Ok(())
}
