//! Error types for the strict loss API

use crate::kind::LossKind;

/// Result type for the strict loss API
pub type Result<T> = std::result::Result<T, LossError>;

/// Errors reported by the strict (validating) entry points.
///
/// The lenient entry points never produce these: they fall back to
/// cross-entropy or let NaN/Inf propagate instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LossError {
    /// Integer code that names no loss kind
    #[error("invalid loss kind code: {0}")]
    InvalidLossKind(i32),

    /// Text that is neither a label nor a snake_case kind name
    #[error("unknown loss label '{0}'")]
    UnknownLabel(String),

    /// Batch with no rows
    #[error("empty batch")]
    EmptyBatch,

    /// Estimate and ideal hold a different number of rows
    #[error("batch size mismatch: estimate has {estimate} rows, ideal has {ideal}")]
    BatchSizeMismatch {
        estimate: usize,
        ideal: usize,
    },

    /// A row is ragged, or its ideal counterpart has another width
    #[error("shape mismatch at row {row}: expected width {expected}, found {found}")]
    ShapeMismatch {
        /// Offending row
        row: usize,
        /// Width of the first estimate row
        expected: usize,
        /// Width actually found
        found: usize,
    },

    /// The kind has no aggregate loss form
    #[error("loss kind {0} has no aggregate form")]
    UndefinedAggregate(LossKind),
}
