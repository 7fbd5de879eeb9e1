//! Loss functions for training neural networks
//!
//! | Kind | `F` (batch loss) | `Df` (gradient seed) |
//! |---|---|---|
//! | [`CrossEntropyLoss`] | `-mean(sum(ideal * ln(estimate)))` | `estimate - ideal` |
//! | [`BinaryCrossEntropyLoss`] | binary CE with `ε = 1e-16` | `estimate - ideal` |
//! | [`MSELoss`] | `sum((estimate - ideal)^2) / (batch * width)` | `activation * (estimate - ideal)` |
//! | [`ActorPolicyGradient`] | none | `-delta / pi * activation` |
//! | [`CriticPolicyGradient`] | none | `2 * deltagamma * activation` |
//!
//! `Df` is the seed for the output layer's pre-activation values. For the
//! entropy losses the activation derivative cancels against the loss
//! derivative (softmax + CE, sigmoid + BinCE), so `activation` is ignored.

mod cross_entropy;
mod mse;
mod policy_gradient;

pub use cross_entropy::{BinaryCrossEntropyLoss, CrossEntropyLoss};
pub use mse::MSELoss;
pub use policy_gradient::{ActorPolicyGradient, CriticPolicyGradient};

use log::{debug, trace};

use crate::batch::check_shapes;
use crate::error::{LossError, Result};
use crate::kind::LossKind;

/// Per-element gradient seed for backpropagation
pub trait GradientSeed {
    /// Gradient of the loss with respect to one output unit's pre-activation
    /// value.
    ///
    /// For the policy gradients `ideal` carries the advantage or scaled
    /// TD-error rather than a target.
    fn backward(estimate: f64, ideal: f64, activation: f64) -> f64;
}

/// Loss functions with an aggregate batch form
pub trait Loss: GradientSeed {
    /// Calculate the loss over a batch of shape `[batch][output]`
    fn forward(estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> f64;
}

/// A loss function selected at runtime by its [`LossKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LossFunction {
    CrossEntropy,
    BinaryCrossEntropy,
    MeanSquared,
    ActorPolicyGradient,
    CriticPolicyGradient,
}

/// Look up the loss function for `kind`.
///
/// `LossKind::None` falls back to cross entropy. Use [`resolve_strict`] to
/// reject it instead.
pub fn resolve(kind: LossKind) -> LossFunction {
    trace!("resolving loss {}", kind);
    match kind {
        LossKind::CrossEntropy => LossFunction::CrossEntropy,
        LossKind::BinaryCrossEntropy => LossFunction::BinaryCrossEntropy,
        LossKind::MeanSquared => LossFunction::MeanSquared,
        LossKind::ActorPolicyGradient => LossFunction::ActorPolicyGradient,
        LossKind::CriticPolicyGradient => LossFunction::CriticPolicyGradient,
        LossKind::None => {
            debug!("no loss kind given, falling back to cross entropy");
            LossFunction::CrossEntropy
        }
    }
}

/// Look up a loss function by integer code, falling back to cross entropy
/// for unknown codes
pub fn resolve_code(code: i32) -> LossFunction {
    match LossKind::try_from(code) {
        Ok(kind) => resolve(kind),
        Err(err) => {
            debug!("{}, falling back to cross entropy", err);
            LossFunction::CrossEntropy
        }
    }
}

/// Look up the loss function for `kind`, failing on `LossKind::None`
pub fn resolve_strict(kind: LossKind) -> Result<LossFunction> {
    match kind {
        LossKind::None => Err(LossError::InvalidLossKind(kind.code())),
        _ => Ok(resolve(kind)),
    }
}

impl LossFunction {
    /// The kind this function implements
    pub fn kind(self) -> LossKind {
        match self {
            LossFunction::CrossEntropy => LossKind::CrossEntropy,
            LossFunction::BinaryCrossEntropy => LossKind::BinaryCrossEntropy,
            LossFunction::MeanSquared => LossKind::MeanSquared,
            LossFunction::ActorPolicyGradient => LossKind::ActorPolicyGradient,
            LossFunction::CriticPolicyGradient => LossKind::CriticPolicyGradient,
        }
    }

    pub fn label(self) -> &'static str {
        self.kind().label()
    }

    /// Aggregate loss over a batch, or `None` for the policy gradients whose
    /// loss is computed by the caller from the chosen action.
    ///
    /// Inputs are not validated: an empty batch yields NaN and a zero
    /// estimate under cross entropy yields infinity.
    pub fn f(self, estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> Option<f64> {
        match self {
            LossFunction::CrossEntropy => Some(CrossEntropyLoss::forward(estimate, ideal)),
            LossFunction::BinaryCrossEntropy => Some(BinaryCrossEntropyLoss::forward(estimate, ideal)),
            LossFunction::MeanSquared => Some(MSELoss::forward(estimate, ideal)),
            LossFunction::ActorPolicyGradient | LossFunction::CriticPolicyGradient => None,
        }
    }

    /// Like [`LossFunction::f`], but checks shapes first and reports a
    /// missing aggregate form as an error
    pub fn try_f(self, estimate: &[Vec<f64>], ideal: &[Vec<f64>]) -> Result<f64> {
        if !self.kind().has_aggregate() {
            return Err(LossError::UndefinedAggregate(self.kind()));
        }
        check_shapes(estimate, ideal)?;
        self.f(estimate, ideal)
            .ok_or(LossError::UndefinedAggregate(self.kind()))
    }

    /// Gradient seed for one output unit
    pub fn df(self, estimate: f64, ideal: f64, activation: f64) -> f64 {
        match self {
            LossFunction::CrossEntropy => CrossEntropyLoss::backward(estimate, ideal, activation),
            LossFunction::BinaryCrossEntropy => BinaryCrossEntropyLoss::backward(estimate, ideal, activation),
            LossFunction::MeanSquared => MSELoss::backward(estimate, ideal, activation),
            LossFunction::ActorPolicyGradient => ActorPolicyGradient::backward(estimate, ideal, activation),
            LossFunction::CriticPolicyGradient => CriticPolicyGradient::backward(estimate, ideal, activation),
        }
    }

    /// Apply [`LossFunction::df`] elementwise, writing into `out`
    pub fn df_slice(self, estimate: &[f64], ideal: &[f64], activation: &[f64], out: &mut [f64]) {
        debug_assert!(
            estimate.len() == ideal.len() && estimate.len() == activation.len() && estimate.len() == out.len(),
            "Slice lengths don't match!"
        );
        for (((o, &e), &i), &a) in out.iter_mut().zip(estimate).zip(ideal).zip(activation) {
            *o = self.df(e, i, a);
        }
    }

    /// Gradient seeds for a whole batch of shape `[batch][output]`
    pub fn df_batch(self, estimate: &[Vec<f64>], ideal: &[Vec<f64>], activation: &[Vec<f64>]) -> Vec<Vec<f64>> {
        debug_assert!(
            estimate.len() == ideal.len() && estimate.len() == activation.len(),
            "Batch sizes don't match!"
        );
        estimate
            .iter()
            .zip(ideal)
            .zip(activation)
            .map(|((e, i), a)| {
                let mut row = vec![0.0; e.len()];
                self.df_slice(e, i, a, &mut row);
                row
            })
            .collect()
    }
}

impl From<LossKind> for LossFunction {
    fn from(kind: LossKind) -> Self {
        resolve(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_functions() -> Vec<LossFunction> {
        LossKind::ALL.iter().map(|&kind| resolve(kind)).collect()
    }

    #[test]
    fn test_resolve_each_kind() {
        assert_eq!(resolve(LossKind::CrossEntropy), LossFunction::CrossEntropy);
        assert_eq!(resolve(LossKind::BinaryCrossEntropy), LossFunction::BinaryCrossEntropy);
        assert_eq!(resolve(LossKind::MeanSquared), LossFunction::MeanSquared);
        assert_eq!(resolve(LossKind::ActorPolicyGradient), LossFunction::ActorPolicyGradient);
        assert_eq!(resolve(LossKind::CriticPolicyGradient), LossFunction::CriticPolicyGradient);
    }

    #[test]
    fn test_none_and_unknown_fall_back_to_cross_entropy() {
        assert_eq!(resolve(LossKind::None), LossFunction::CrossEntropy);
        assert_eq!(resolve_code(0), LossFunction::CrossEntropy);
        assert_eq!(resolve_code(99), LossFunction::CrossEntropy);
        assert_eq!(resolve_code(-3), LossFunction::CrossEntropy);
        assert_eq!(resolve_code(3), LossFunction::MeanSquared);

        let estimate = vec![vec![0.3, 0.7]];
        let ideal = vec![vec![0.0, 1.0]];
        let fallback = resolve_code(99);
        let ce = resolve(LossKind::CrossEntropy);
        assert_eq!(fallback.f(&estimate, &ideal), ce.f(&estimate, &ideal));
        assert_eq!(fallback.df(0.3, 0.0, 0.5), ce.df(0.3, 0.0, 0.5));
    }

    #[test]
    fn test_resolve_strict() {
        assert_eq!(resolve_strict(LossKind::None), Err(LossError::InvalidLossKind(0)));
        assert_eq!(resolve_strict(LossKind::MeanSquared), Ok(LossFunction::MeanSquared));
    }

    #[test]
    fn test_labels_follow_kind() {
        assert_eq!(resolve(LossKind::CrossEntropy).label(), "CE");
        assert_eq!(resolve(LossKind::BinaryCrossEntropy).label(), "BinCE");
        assert_eq!(resolve(LossKind::MeanSquared).label(), "MSE");
        assert_eq!(resolve(LossKind::ActorPolicyGradient).label(), "APG");
        assert_eq!(resolve(LossKind::CriticPolicyGradient).label(), "CPG");
        // The fallback reports what it actually computes
        assert_eq!(resolve(LossKind::None).label(), "CE");
    }

    #[test]
    fn test_policy_gradients_have_no_aggregate() {
        let estimate = vec![vec![0.5]];
        let ideal = vec![vec![1.0]];
        assert_eq!(LossFunction::ActorPolicyGradient.f(&estimate, &ideal), None);
        assert_eq!(LossFunction::CriticPolicyGradient.f(&estimate, &ideal), None);
        assert_eq!(
            LossFunction::ActorPolicyGradient.try_f(&estimate, &ideal),
            Err(LossError::UndefinedAggregate(LossKind::ActorPolicyGradient))
        );
    }

    #[test]
    fn test_try_f_validates_shapes() {
        let ce = LossFunction::CrossEntropy;
        assert_eq!(ce.try_f(&[], &[]), Err(LossError::EmptyBatch));

        let estimate = vec![vec![0.5, 0.5], vec![0.5]];
        let ideal = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
        assert_eq!(
            LossFunction::MeanSquared.try_f(&estimate, &ideal),
            Err(LossError::ShapeMismatch { row: 1, expected: 2, found: 1 })
        );

        let estimate = vec![vec![0.5, 0.5]];
        let ideal = vec![vec![1.0, 0.0]];
        let loss = ce.try_f(&estimate, &ideal).unwrap();
        assert!((loss - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_df_slice_and_batch() {
        let estimate = [0.2, 0.9];
        let ideal = [0.0, 1.0];
        let activation = [0.5, 2.0];
        let mut out = [0.0; 2];

        LossFunction::MeanSquared.df_slice(&estimate, &ideal, &activation, &mut out);
        assert!((out[0] - 0.1).abs() < 1e-12);
        assert!((out[1] + 0.2).abs() < 1e-12);

        let batch = LossFunction::CrossEntropy.df_batch(
            &[estimate.to_vec()],
            &[ideal.to_vec()],
            &[activation.to_vec()],
        );
        assert_eq!(batch.len(), 1);
        assert!((batch[0][0] - 0.2).abs() < 1e-12);
        assert!((batch[0][1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let estimate = vec![vec![0.1, 0.6, 0.3], vec![0.25, 0.25, 0.5]];
        let ideal = vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        for function in all_functions() {
            let first = function.f(&estimate, &ideal).map(f64::to_bits);
            let second = function.f(&estimate, &ideal).map(f64::to_bits);
            assert_eq!(first, second);

            let first = function.df(0.37, -1.25, 0.8).to_bits();
            let second = function.df(0.37, -1.25, 0.8).to_bits();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_from_kind() {
        assert_eq!(LossFunction::from(LossKind::MeanSquared), LossFunction::MeanSquared);
        assert_eq!(LossFunction::from(LossKind::None), LossFunction::CrossEntropy);
    }
}
