//! Error types for gridcmd-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or executing a grid command
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address or column letters
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid range string
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// No sheet at the given index
    #[error("Sheet {0} not found")]
    SheetNotFound(usize),

    /// A required command argument was not supplied
    #[error("{0} is required")]
    MissingArgument(&'static str),

    /// A command argument was supplied but is out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No host grid is bound to the service
    #[error("Workbook not initialized")]
    HostUnavailable,

    /// The capability exists in the command surface but has no implementation
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// The host grid rejected an operation
    #[error("Host error: {0}")]
    Host(String),
}

impl Error {
    /// Create a new host error with a message
    pub fn host<S: Into<String>>(msg: S) -> Self {
        Error::Host(msg.into())
    }

    /// Whether this error is a parse failure of an address or range string
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Error::InvalidAddress(_) | Error::InvalidRange(_))
    }
}
