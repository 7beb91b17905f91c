//! Values tagged with the data source that produced them.

use serde::{Deserialize, Serialize};

/// Where a value came from.
///
/// Serialized as the diagnostic source tag on every catalog response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// The durable store answered. The literal is part of the public API
    /// contract and does not name the actual store product.
    #[serde(rename = "mongodb", alias = "database")]
    Primary,
    /// The durable store was unreachable and the built-in dataset answered.
    #[serde(rename = "mock")]
    Fallback,
}

impl Origin {
    /// The wire literal for this origin.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "mongodb",
            Self::Fallback => "mock",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value plus the [`Origin`] that served it.
///
/// Degraded mode is part of the return value rather than a side channel:
/// callers that care can branch on [`Sourced::is_fallback`], everyone else
/// just takes the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Sourced<T> {
    #[must_use]
    pub const fn primary(value: T) -> Self {
        Self {
            value,
            origin: Origin::Primary,
        }
    }

    #[must_use]
    pub const fn fallback(value: T) -> Self {
        Self {
            value,
            origin: Origin::Fallback,
        }
    }

    /// Transform the value, keeping the origin.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            origin: self.origin,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.origin, Origin::Fallback)
    }

    /// Whether a write reported through this value reached the durable store.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self.origin, Origin::Primary)
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
