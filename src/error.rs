use thiserror::Error;

/// Errors raised by path resolution and the operations built on top of it.
///
/// Every failure is a distinguishable, catchable condition; the resolver and
/// dispatcher propagate on first violation and never swallow errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed call-site input: invalid path syntax or a rejected
    /// random source.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A strict-mode traversal or final-step lookup missed a key.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// An operation required a container at a position holding a scalar.
    #[error("Value at '{0}' is not countable")]
    UncountableValue(String),

    /// JSON text could not be decoded into a value.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A value could not be encoded as JSON text.
    #[error("Encode error: {0}")]
    Encode(String),
}

impl Error {
    pub(crate) fn key_not_found(key: impl Into<String>) -> Self {
        Error::KeyNotFound(key.into())
    }

    pub(crate) fn uncountable(at: impl Into<String>) -> Self {
        Error::UncountableValue(at.into())
    }

    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }

    pub(crate) fn encode(err: serde_json::Error) -> Self {
        Error::Encode(err.to_string())
    }
}
