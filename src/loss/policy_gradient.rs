//! Actor-critic policy gradient seeds.
//!
//! Neither variant has a batch loss: the caller computes the loss from the
//! chosen action and the TD-error, so only [`GradientSeed`] is implemented.

use super::GradientSeed;

/// Actor side: loss is `-delta * ln(pi)` for the chosen action
pub struct ActorPolicyGradient;

impl GradientSeed for ActorPolicyGradient {
    /// `d(-delta * ln(pi))/dpi = -delta / pi`, times the activation derivative.
    ///
    /// `pi` is the probability of the chosen action and `delta` the advantage,
    /// `reward + gamma * V(s') - V(s)`.
    fn backward(pi: f64, delta: f64, activation: f64) -> f64 {
        -delta / pi * activation
    }
}

/// Critic side: loss is the squared TD-error
pub struct CriticPolicyGradient;

impl GradientSeed for CriticPolicyGradient {
    /// `2 * delta * gamma`, times the activation derivative. The estimate is
    /// unused; `deltagamma` already holds the TD-error scaled by the discount.
    fn backward(_estimate: f64, deltagamma: f64, activation: f64) -> f64 {
        2.0 * deltagamma * activation
    }
}
