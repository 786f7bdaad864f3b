//! Error types for the host directory
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for directory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the host directory
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not four dot-separated octets in 0..=255
    #[error("Invalid address format '{input}': {reason}")]
    InvalidAddressFormat {
        /// Rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// The input is not a fully-qualified machine name
    #[error("Invalid name format '{input}': {reason}")]
    InvalidNameFormat {
        /// Rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// A backing-store line could not be turned into a record
    #[error("Malformed line {line_number}: {reason}")]
    MalformedLine {
        /// 1-based line number, 0 when parsed outside of a load
        line_number: usize,
        /// Why the line was rejected
        reason: String,
    },

    /// A record with this name already exists
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// A record with this address already exists
    #[error("Duplicate address: {0}")]
    DuplicateAddress(String),

    /// Reading or appending to the backing store failed
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A line-protocol command could not be understood
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// I/O errors outside the backing store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid address error
    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddressFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNameFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed line error
    pub fn malformed_line(line_number: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line_number,
            reason: reason.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceFailure(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid command error
    pub fn invalid_command(msg: impl Into<String>) -> Self {
        Self::InvalidCommand(msg.into())
    }

    /// Whether this error is a uniqueness violation
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName(_) | Self::DuplicateAddress(_))
    }
}
