//! Error types for the `hello_hak` demo.

use thiserror::Error;

/// Convenience alias for demo results.
pub type Result<T, E = HelloHakError> = std::result::Result<T, E>;

/// Errors raised by the demo binary.
#[derive(Debug, Error)]
pub enum HelloHakError {
    /// The command tree or config table was declared inconsistently.
    #[error("invalid definition: {0}")]
    Definition(#[from] hakcli::DefinitionError),
    /// The global subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(Box<dyn std::error::Error + Send + Sync>),
    /// Writing the greeting failed.
    #[error("failed to write greeting: {0}")]
    Output(#[from] std::io::Error),
}
