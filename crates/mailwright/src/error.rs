//! Error types for mail composition.

/// Result type alias for mail composition operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Mail composition error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Empty or otherwise unusable setter argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// A mail session was requested but no host name was configured and no
    /// pre-built session was supplied.
    #[error("Cannot resolve a mail session: no host name configured")]
    MissingHost,

    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Message composition failed.
    #[error("Message composition failed: {reason}")]
    Composition {
        /// What the composer was doing when it failed.
        reason: String,
        /// Underlying session or content failure, if any.
        #[source]
        cause: Option<Box<Error>>,
    },

    /// A second build was attempted on an already-built composer.
    #[error("Message already built; a composer builds exactly once")]
    AlreadyBuilt,
}

impl Error {
    /// Creates a composition error with no underlying cause.
    #[must_use]
    pub fn composition(reason: impl Into<String>) -> Self {
        Self::Composition {
            reason: reason.into(),
            cause: None,
        }
    }

    /// Wraps an underlying failure as a composition error, preserving it as
    /// the error source for diagnostics.
    #[must_use]
    pub fn composition_from(reason: impl Into<String>, cause: Self) -> Self {
        Self::Composition {
            reason: reason.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Returns true if this is the normalized composition error kind.
    #[must_use]
    pub const fn is_composition(&self) -> bool {
        matches!(self, Self::Composition { .. })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_composition_preserves_cause() {
        let err = Error::composition_from("could not resolve mail session", Error::MissingHost);
        assert!(err.is_composition());
        let source = err.source().unwrap();
        assert!(source.to_string().contains("no host name"));
    }

    #[test]
    fn test_composition_without_cause() {
        let err = Error::composition("no sender address");
        assert!(err.is_composition());
        assert!(err.source().is_none());
    }
}
