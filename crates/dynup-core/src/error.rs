//! Error types for the dynup system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for dynup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dynup system
#[derive(Error, Debug)]
pub enum Error {
    /// Public-IP discovery errors (transient, skips the current cycle)
    #[error("IP source error: {0}")]
    IpSource(String),

    /// DNS record resolution errors (transient, skips the affected label)
    #[error("record resolver error: {0}")]
    Resolver(String),

    /// Update publication errors (transient, retried on the next cycle)
    #[error("publisher error: {0}")]
    Publisher(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal errors; these end the monitor loop and are
    /// surfaced to the Supervisor as a `LoopFault`
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a record resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create a publisher error
    pub fn publisher(msg: impl Into<String>) -> Self {
        Self::Publisher(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error must terminate the monitor loop.
    ///
    /// Transient collaborator failures are contained within a cycle; only
    /// internal errors escalate to a `LoopFault`.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
///
/// Errors arriving through this bridge were not classified by the code
/// that produced them, so they are treated as internal faults.
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
