//! Disposer fault classification.
//!
//! A disposer is terminal cleanup: nothing it does may escape a firing. The
//! types here describe what went wrong so the fault can be logged before it
//! is discarded.
//!
//! # Outcomes
//!
//! A disposer may return any type implementing [`DisposeOutcome`]:
//!
//! | Return type | Fault when |
//! |-------------|------------|
//! | `()` | never |
//! | `bool` | `false` |
//! | `Result<T, E: Display>` | `Err(e)` |
//! | `Option<T>` | `None` |
//!
//! A panicking disposer is reported as [`DisposerFault::Panicked`].

use core::any::Any;
use core::fmt::Display;

/// A failure raised by a disposer while firing.
///
/// Faults never propagate to the caller of [`fire`](crate::ScopedResource::fire)
/// or to the enclosing scope. They are logged at `warn` level and dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisposerFault {
    /// The disposer returned an outcome describing a failure.
    #[error("disposer failed: {0}")]
    Failed(String),

    /// The disposer panicked.
    #[error("disposer panicked: {0}")]
    Panicked(String),
}

impl DisposerFault {
    /// Builds a fault from a payload caught by `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(payload) => match payload.downcast::<String>() {
                Ok(message) => *message,
                Err(_) => "non-string panic payload".to_owned(),
            },
        };
        Self::Panicked(message)
    }
}

/// The value returned by a disposer, inspected for failure after firing.
///
/// Implement this for custom status types to have their failures logged.
///
/// # Example
///
/// ```
/// use scoped_core::error::{DisposeOutcome, DisposerFault};
///
/// struct Status(i32);
///
/// impl DisposeOutcome for Status {
///     fn into_fault(self) -> Option<DisposerFault> {
///         (self.0 != 0).then(|| DisposerFault::Failed(format!("status {}", self.0)))
///     }
/// }
///
/// assert!(Status(0).into_fault().is_none());
/// assert!(Status(-1).into_fault().is_some());
/// ```
pub trait DisposeOutcome {
    /// Converts the outcome into a fault, or `None` on success.
    fn into_fault(self) -> Option<DisposerFault>;
}

impl DisposeOutcome for () {
    fn into_fault(self) -> Option<DisposerFault> {
        None
    }
}

impl DisposeOutcome for bool {
    fn into_fault(self) -> Option<DisposerFault> {
        (!self)
            .then(|| DisposerFault::Failed("disposer reported failure".to_owned()))
    }
}

impl<T, E: Display> DisposeOutcome for Result<T, E> {
    fn into_fault(self) -> Option<DisposerFault> {
        self.err()
            .map(|error| DisposerFault::Failed(error.to_string()))
    }
}

impl<T> DisposeOutcome for Option<T> {
    fn into_fault(self) -> Option<DisposerFault> {
        match self {
            Some(_) => None,
            None => Some(DisposerFault::Failed("disposer returned no value".to_owned())),
        }
    }
}
