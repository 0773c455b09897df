/// Error type for the codegen module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error when a contract name cannot be used in a C++ identifier
    #[error("Invalid contract name: '{0}'")]
    InvalidName(String),
    /// Error when writing generated code into its buffer
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}
