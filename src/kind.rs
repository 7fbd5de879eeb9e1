//! Loss kind tags used to select and label loss functions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LossError;

/// Tag naming a loss function.
///
/// Integer codes are stable and match the values stored in existing model
/// configurations: `None` = 0 through `CriticPolicyGradient` = 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossKind {
    /// Unspecified loss
    #[default]
    None,
    CrossEntropy,
    /// Cross entropy for independent binary outputs
    BinaryCrossEntropy,
    MeanSquared,
    /// Actor side of an actor-critic policy gradient
    ActorPolicyGradient,
    /// Critic (value function) side of an actor-critic policy gradient
    CriticPolicyGradient,
}

impl LossKind {
    /// Every kind, in code order
    pub const ALL: [LossKind; 6] = [
        LossKind::None,
        LossKind::CrossEntropy,
        LossKind::BinaryCrossEntropy,
        LossKind::MeanSquared,
        LossKind::ActorPolicyGradient,
        LossKind::CriticPolicyGradient,
    ];

    /// Stable integer code of this kind
    pub fn code(self) -> i32 {
        match self {
            LossKind::None => 0,
            LossKind::CrossEntropy => 1,
            LossKind::BinaryCrossEntropy => 2,
            LossKind::MeanSquared => 3,
            LossKind::ActorPolicyGradient => 4,
            LossKind::CriticPolicyGradient => 5,
        }
    }

    /// Lenient conversion from an integer code: unknown codes become `None`.
    ///
    /// Use `LossKind::try_from` to reject unknown codes instead.
    pub fn from_code(code: i32) -> Self {
        LossKind::try_from(code).unwrap_or(LossKind::None)
    }

    /// Short code used in logs and labels
    pub fn label(self) -> &'static str {
        match self {
            LossKind::CrossEntropy => "CE",
            LossKind::BinaryCrossEntropy => "BinCE",
            LossKind::MeanSquared => "MSE",
            LossKind::ActorPolicyGradient => "APG",
            LossKind::CriticPolicyGradient => "CPG",
            LossKind::None => "N/A",
        }
    }

    /// Whether the kind has an aggregate batch loss (`F`)
    pub fn has_aggregate(self) -> bool {
        !matches!(
            self,
            LossKind::ActorPolicyGradient | LossKind::CriticPolicyGradient
        )
    }

    fn name(self) -> &'static str {
        match self {
            LossKind::None => "none",
            LossKind::CrossEntropy => "cross_entropy",
            LossKind::BinaryCrossEntropy => "binary_cross_entropy",
            LossKind::MeanSquared => "mean_squared",
            LossKind::ActorPolicyGradient => "actor_policy_gradient",
            LossKind::CriticPolicyGradient => "critic_policy_gradient",
        }
    }
}

impl TryFrom<i32> for LossKind {
    type Error = LossError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        LossKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.code() == code)
            .ok_or(LossError::InvalidLossKind(code))
    }
}

impl From<LossKind> for i32 {
    fn from(kind: LossKind) -> i32 {
        kind.code()
    }
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for LossKind {
    type Err = LossError;

    /// Parse either a short label ("CE", "BinCE", ...) or a snake_case name
    /// ("cross_entropy", ...), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        LossKind::ALL
            .iter()
            .copied()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(trimmed)
                    || kind.name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| LossError::UnknownLabel(s.to_string()))
    }
}
