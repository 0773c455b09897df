/// Error type for the Analyzer module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error when the target cannot be loaded or decoded
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}
