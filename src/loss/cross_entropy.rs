use super::{GradientSeed, Loss};

/// Offset keeping both logarithms of the binary cross entropy finite
const EPSILON: f64 = 1e-16;

/// Cross Entropy loss (for classification with a softmax output)
pub struct CrossEntropyLoss;

impl Loss for CrossEntropyLoss {
    /// Mean over the batch of `-sum(ideal * ln(estimate))`.
    ///
    /// Estimates are not clamped, so a zero estimate with a nonzero ideal
    /// gives an infinite loss.
    fn forward(estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> f64 {
        let mut sum = 0.0;
        for (i, row) in estimate.iter().enumerate() {
            let mut ce = 0.0;
            for (j, &e) in row.iter().enumerate() {
                ce += ideal[i][j] * e.ln();
            }
            sum -= ce;
        }
        sum / estimate.len() as f64
    }
}

impl GradientSeed for CrossEntropyLoss {
    /// Softmax + cross entropy gradient; the activation cancels out
    fn backward(estimate: f64, ideal: f64, _activation: f64) -> f64 {
        estimate - ideal
    }
}

/// Binary Cross Entropy loss (for independent sigmoid outputs)
pub struct BinaryCrossEntropyLoss;

impl Loss for BinaryCrossEntropyLoss {
    fn forward(estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> f64 {
        let mut sum = 0.0;
        for (i, row) in estimate.iter().enumerate() {
            let mut ce = 0.0;
            for (j, &e) in row.iter().enumerate() {
                let t = ideal[i][j];
                ce += t * (e + EPSILON).ln() + (1.0 - t) * (1.0 - e + EPSILON).ln();
            }
            sum -= ce;
        }
        sum / estimate.len() as f64
    }
}

impl GradientSeed for BinaryCrossEntropyLoss {
    /// Sigmoid + binary cross entropy gradient; the activation cancels out
    fn backward(estimate: f64, ideal: f64, _activation: f64) -> f64 {
        estimate - ideal
    }
}
