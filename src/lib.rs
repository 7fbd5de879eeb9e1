//! # Loss Catalog
//!
//! Loss functions and backpropagation gradient seeds for neural network
//! training.
//!
//! A [`LossKind`] tag selects a [`LossFunction`] through [`resolve`]. Every
//! function provides `df`, the per-element gradient seed for the output
//! layer; cross entropy, binary cross entropy and mean squared error also
//! provide `f`, the aggregate loss over a batch.
//!
//! ```
//! use loss_catalog::{resolve, LossKind};
//!
//! let ce = resolve(LossKind::CrossEntropy);
//! let loss = ce.f(&[vec![0.5, 0.5]], &[vec![1.0, 0.0]]).unwrap();
//! assert!((loss - 0.6931).abs() < 1e-4);
//! assert_eq!(ce.df(0.5, 1.0, 0.25), -0.5);
//! ```

pub mod batch;
mod error;
mod kind;
pub mod loss;

// Re-export main types
pub use error::{LossError, Result};
pub use kind::LossKind;
pub use loss::{resolve, resolve_code, resolve_strict, GradientSeed, Loss, LossFunction};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_function_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync + Copy>() {}
        assert_send_sync::<LossKind>();
        assert_send_sync::<LossFunction>();
    }

    #[test]
    fn test_concurrent_calls_agree() {
        let estimate = vec![vec![0.2, 0.3, 0.5], vec![0.6, 0.3, 0.1]];
        let ideal = vec![vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]];
        let expected = resolve(LossKind::BinaryCrossEntropy).f(&estimate, &ideal);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| resolve(LossKind::BinaryCrossEntropy).f(&estimate, &ideal)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().map(f64::to_bits), expected.map(f64::to_bits));
            }
        });
    }
}
