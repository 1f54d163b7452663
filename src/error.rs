//! Error types for hall.
//!
//! Every failure is local to the call that raised it. A probability that
//! leaves `[0, 1]` after evaluation is not represented here: it means a
//! plugged-in distribution is broken, and is raised as a panic instead.

use thiserror::Error;

/// hall error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Parameters violate a constructor's constraints.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Operand has the wrong numeric kind (e.g. complex where a real is required).
    #[error("type error: {0}")]
    Type(String),

    /// Argument lies outside the domain of the operation.
    #[error("domain error: {0}")]
    Domain(String),

    /// Operation is explicitly unsupported.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Numeric integration or summation failed to converge.
    #[error("computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = Error::NotImplemented("joint distributions".into());
        assert_eq!(e.to_string(), "not implemented: joint distributions");
        let e = Error::Domain("p = 1.5".into());
        assert!(e.to_string().starts_with("domain error"));
    }
}
