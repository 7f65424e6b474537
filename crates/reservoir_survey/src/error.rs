//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid generation arguments and unknown partitioning strategies.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported strategy '{id}'")]
    UnsupportedStrategy { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_strategy_names_the_id() {
        let err = Error::UnsupportedStrategy {
            id: "dijkstra".into(),
        };
        assert_eq!(err.to_string(), "unsupported strategy 'dijkstra'");
    }

    #[test]
    fn invalid_argument_formats_message() {
        let err = Error::InvalidArgument("size must be > 0".into());
        assert_eq!(err.to_string(), "invalid argument: size must be > 0");
    }

    #[test]
    fn errors_are_thread_safe_std_errors() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<Error>();
    }
}
