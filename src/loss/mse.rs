use super::{GradientSeed, Loss};

/// Mean Squared Error loss
pub struct MSELoss;

impl Loss for MSELoss {
    /// Calculate MSE loss between estimate and ideal.
    ///
    /// The sum is divided by `batch * width`, where width is the length of
    /// the first estimate row. Callers must pass rectangular batches.
    fn forward(estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> f64 {
        let mut sum = 0.0;
        for (i, row) in estimate.iter().enumerate() {
            for (j, &e) in row.iter().enumerate() {
                sum += (e - ideal[i][j]).powi(2);
            }
        }

        let width = estimate.first().map_or(0, Vec::len);
        sum / (estimate.len() * width) as f64
    }
}

impl GradientSeed for MSELoss {
    /// Gradient seed for MSE, scaled by the output activation's derivative
    fn backward(estimate: f64, ideal: f64, activation: f64) -> f64 {
        activation * (estimate - ideal)
    }
}
