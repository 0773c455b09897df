/// Error type for the Compiler module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error when reading the input directory or writing generated files
    #[error("IO error: {0}")]
    Io(String),
    /// Error when a contract file does not hold valid hex bytecode
    #[error("Invalid hex in '{name}': {reason}")]
    InvalidHex {
        /// The file the bytecode was read from
        name: String,
        /// Why decoding failed
        reason: String,
    },
    /// Error when a contract file is not named after a 20-byte address
    #[error("Invalid contract address: '{0}'")]
    InvalidAddress(String),
    /// Error when two files name the same address
    #[error("Duplicate contract: {0}")]
    DuplicateContract(String),
    /// Error when an option cannot be used in the generated build script
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    /// Error when generating code for one contract
    #[error("Failed to generate {name}: {source}")]
    Contract {
        /// The contract's canonical address
        name: String,
        /// The underlying error
        source: evmaot_codegen::Error,
    },
    /// Error when generating the shared scaffold
    #[error("Codegen error: {0}")]
    CodegenError(#[from] evmaot_codegen::Error),
    /// Error when writing generated code into its buffer
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
    /// Error when a code generation worker fails, e.g. by panicking
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
