//! Values that carry a known-good default.

use serde::{Deserialize, Serialize};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Produced by the collaborator and accepted by validation
    Generated,
    /// Substituted locally because the stage failed
    Fallback,
}

/// A stage result paired with whether it is real or a substitute.
///
/// # Examples
///
/// ```
/// use jester_core::{FallbackValue, ValueSource};
///
/// let ok: FallbackValue<u32> = FallbackValue::resolve(Ok::<_, ()>(7), || 0);
/// assert_eq!(*ok.value(), 7);
///
/// let failed: FallbackValue<u32> = FallbackValue::resolve(Err("boom"), || 0);
/// assert_eq!(*failed.value(), 0);
/// assert_eq!(failed.source(), ValueSource::Fallback);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackValue<T> {
    value: T,
    source: ValueSource,
}

impl<T> FallbackValue<T> {
    /// Wrap a value produced by a collaborator.
    pub fn generated(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Generated,
        }
    }

    /// Wrap a locally computed substitute.
    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Fallback,
        }
    }

    /// Keep `result` when it succeeded, otherwise compute the fallback.
    pub fn resolve<E>(result: Result<T, E>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Self::generated(value),
            Err(_) => Self::fallback(fallback()),
        }
    }

    /// Borrow the resolved value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the resolved value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Origin of the value.
    pub fn source(&self) -> ValueSource {
        self.source
    }

    /// True when the fallback was used.
    pub fn is_fallback(&self) -> bool {
        self.source == ValueSource::Fallback
    }
}
