//! Common error infrastructure.
//!
//! Domain-specific errors (`GridError`, `ActionError`, ...) live next to the
//! code they validate; this module provides the shared severity taxonomy.
//! Out-of-bounds and unreachable conditions are not errors at all: queries
//! return absent results (`Option`) and callers treat absence as "cannot
//! target or path here". Errors proper split into rejected-before-mutation
//! illegality and invariant violations that indicate a bug.

/// Severity level of an error, used for categorization and recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative action/target.
    ///
    /// Examples: destination blocked, target out of range.
    Recoverable,

    /// Invalid input; do not retry without changing the request.
    ///
    /// Examples: unknown unit, action index outside the template's lists.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug; investigate.
    ///
    /// Example: a unit's position disagrees with the cell hosting it.
    Internal,

    /// Game state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if a caller may retry with an alternative request.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all simulation errors.
///
/// Implemented by every error enum in the crate so callers (including the
/// AI driver) can decide uniformly whether to retry with another target or
/// surface a bug.
pub trait SimError: std::fmt::Display + std::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;
}
