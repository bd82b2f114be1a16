use std::fmt;

/// Errors that may occur when using this crate
#[derive(Debug)]
pub enum PwHashError {
    /// Indicates that the user of a type or function has specified an invalid parameter or
    /// set of parameters
    InvalidParameter(&'static str),

    /// Indicates that a provided hash string was expected to be valid, but is invalid. This
    /// normally occurs when a hash string is improperly formatted or uses an unsupported
    /// format.
    InvalidHash(&'static str),

    /// An error reported by one of the underlying key derivation functions
    KdfError(String),
}

impl std::error::Error for PwHashError {}

impl fmt::Display for PwHashError {
    /// Turn a `PwHashError` into a descriptive string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwHashError::InvalidParameter(msg) => {
                write!(f, "PwHashError: Invalid parameter: {}", msg)
            }
            PwHashError::InvalidHash(msg) => write!(f, "PwHashError: Invalid hash: {}", msg),
            PwHashError::KdfError(msg) => {
                write!(f, "PwHashError: Key derivation failed: {}", msg)
            }
        }
    }
}
