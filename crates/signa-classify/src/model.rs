//! Model capabilities
//!
//! The pipeline never links an inference runtime directly. A `ModelLoader`
//! produces a `GestureModel` for the requested delegate.

use signa_core::{InputTensor, SignaError, SignaResult};

/// Hardware backend a model runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delegate {
    /// GPU / NPU
    Accelerated,
    Cpu,
}

impl Delegate {
    pub fn as_str(self) -> &'static str {
        match self {
            Delegate::Accelerated => "accelerated",
            Delegate::Cpu => "cpu",
        }
    }
}

impl std::fmt::Display for Delegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded classification model
///
/// Not safe for concurrent use; `predict` takes `&mut self`.
pub trait GestureModel: Send {
    /// One score per label for a `[frames x width]` input
    fn predict(&mut self, input: &InputTensor) -> SignaResult<Vec<f32>>;

    /// Release runtime resources
    fn close(&mut self) {}
}

/// Creates models on a delegate
pub trait ModelLoader: Send + Sync {
    fn load(&self, delegate: Delegate) -> SignaResult<Box<dyn GestureModel>>;
}

/// What a fallback-aware load produced
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub delegate: Delegate,
    /// Set when the accelerated delegate failed and CPU was used instead
    pub fallback: Option<SignaError>,
}

/// Load on the accelerated delegate if requested, otherwise or on failure on CPU
///
/// An accelerated failure is logged and kept in `fallback`; only a CPU
/// failure is returned as an error.
pub fn load_with_fallback<T, F>(
    what: &str,
    use_acceleration: bool,
    load: F,
) -> SignaResult<Loaded<T>>
where
    F: Fn(Delegate) -> SignaResult<T>,
{
    let mut fallback = None;

    if use_acceleration {
        match load(Delegate::Accelerated) {
            Ok(value) => {
                return Ok(Loaded {
                    value,
                    delegate: Delegate::Accelerated,
                    fallback: None,
                })
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "cannot use accelerated delegate for {}, using cpu",
                    what
                );
                fallback = Some(SignaError::DelegateUnavailable(format!(
                    "cannot use accelerated delegate for {what}, falling back to cpu: {e}"
                )));
            }
        }
    }

    let value = load(Delegate::Cpu)?;
    Ok(Loaded {
        value,
        delegate: Delegate::Cpu,
        fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_fallback_to_cpu() {
        let attempts = RefCell::new(Vec::new());
        let loaded = load_with_fallback("classifier", true, |delegate| {
            attempts.borrow_mut().push(delegate);
            match delegate {
                Delegate::Accelerated => Err(SignaError::ModelLoad("no gpu".into())),
                Delegate::Cpu => Ok(7),
            }
        })
        .unwrap();

        assert_eq!(loaded.value, 7);
        assert_eq!(loaded.delegate, Delegate::Cpu);
        assert!(loaded.fallback.is_some());
        assert_eq!(*attempts.borrow(), vec![Delegate::Accelerated, Delegate::Cpu]);
    }

    #[test]
    fn test_cpu_failure_is_returned() {
        let result = load_with_fallback("classifier", true, |_| -> SignaResult<()> {
            Err(SignaError::ModelLoad("corrupt".into()))
        });
        assert_eq!(result.unwrap_err(), SignaError::ModelLoad("corrupt".into()));
    }

    #[test]
    fn test_no_acceleration_goes_straight_to_cpu() {
        let loaded = load_with_fallback("pose", false, Ok).unwrap();
        assert_eq!(loaded.value, Delegate::Cpu);
        assert!(loaded.fallback.is_none());
    }
}
