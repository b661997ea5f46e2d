//! Crate-wide error type.

use crate::config::ConfigError;

/// Boxed error produced by user code (interactors, optimizers, update hooks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by shape construction and by the simulation loop.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid construction arguments for a shape or structure.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Coincident points or zero-length edges.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Invalid argument to an optimizer or other world component.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure raised by a user-supplied detect/handle/update/receive.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    /// A being or group mutex was poisoned by a panicking thread.
    #[error("lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// World configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Wraps a user error so it can be returned from a handler.
    pub fn handler<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Handler(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_wraps_message() {
        let err = Error::handler("wall exploded");
        assert_eq!(err.to_string(), "handler failed: wall exploded");
        assert!(std::error::Error::source(&err).is_some());
    }
}
