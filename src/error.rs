//! This module defines all error types used throughout the application.

use crate::runtime::StateError;
use std::io;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (input file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed markup or a violated document rule
    #[error("Parse error: {0}")]
    Parse(String),

    /// The document cannot be expressed as generated code
    #[error("Code generation error: {0}")]
    Generate(String),

    /// Illegal sequencing while driving a machine
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a code generation error
    pub fn generate(msg: impl Into<String>) -> Self {
        Self::Generate(msg.into())
    }

    /// Check if the document was rejected (syntax or rule violation)
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Parse(format!("malformed markup: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Custom(format!("JSON error: {}", err))
    }
}

// Helper macros for creating errors

/// Create a parse error with formatting
#[macro_export]
macro_rules! parse_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Parse(format!($($arg)*))
    };
}

/// Bail with a parse error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::parse_error!($($arg)*))
    };
}

/// Ensure a condition is true or return a parse error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}
