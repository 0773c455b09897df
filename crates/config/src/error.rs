//! Error types for the configuration module

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic error with a message
    #[error("Error: {0}")]
    Generic(String),

    /// A value could not be parsed, either from the config file or from the command line
    #[error("Parse error: {0}")]
    ParseError(String),
}
