//! Error types for Shipyard core.

use std::{error::Error, fmt};

/// Error type for Shipyard core operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipyardError {
    /// A ship record, a single field or a paging parameter failed validation.
    InvalidInput(String),
    /// A ship identifier that is not strictly positive.
    InvalidIdentifier(i64),
    /// No ship exists with the given identifier.
    NotFound(i64),
    /// The record store failed; carries the backend message uninterpreted.
    Storage(String),
}

impl ShipyardError {
    /// Build an invalid-input error from any message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Build a storage error from any displayable backend error.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

impl fmt::Display for ShipyardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidIdentifier(id) => write!(f, "invalid ship id: {id}"),
            Self::NotFound(id) => write!(f, "ship {id} not found"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ShipyardError {}

/// Convenience result type for Shipyard core.
pub type Result<T> = std::result::Result<T, ShipyardError>;
