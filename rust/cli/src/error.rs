//! Error types for the CLI application.
//!
//! ## Batch Validation Errors
//!
//! `BatchValidationError<T>` collects per-item failures with context. The
//! `verify` command reports one per broken draw record.

use groupdraw_engine::errors::{DrawError, PoolDataError};
use std::fmt;

/// Custom error type for CLI operations.
///
/// This enum encompasses all error types that can occur during CLI execution,
/// allowing for proper error propagation using the `?` operator.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Draw engine error
    Engine(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<DrawError> for CliError {
    fn from(error: DrawError) -> Self {
        CliError::Engine(error.to_string())
    }
}

// Bad pool data always comes from a user-supplied file or the bundled dataset
impl From<PoolDataError> for CliError {
    fn from(error: PoolDataError) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

/// Generic error type for batch validation operations.
///
/// # Type Parameters
///
/// * `T` - Context type identifying the failed item (e.g., `usize` for a line
///   number). Must implement `Display` for error formatting.
///
/// # Examples
///
/// ```rust
/// use groupdraw_cli::BatchValidationError;
///
/// let error = BatchValidationError {
///     item_context: 5,
///     message: "group C has 3 teams".to_string(),
/// };
/// assert_eq!(error.to_string(), "5: group C has 3 teams");
/// ```
#[derive(Debug)]
pub struct BatchValidationError<T> {
    /// Context identifying the item that failed validation
    pub item_context: T,
    /// Descriptive error message
    pub message: String,
}

impl<T: std::fmt::Display> std::fmt::Display for BatchValidationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_context, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_validation_error_with_string() {
        let error = BatchValidationError {
            item_context: "draws.jsonl".to_string(),
            message: "Corrupted file".to_string(),
        };
        assert_eq!(error.to_string(), "draws.jsonl: Corrupted file");
    }

    #[test]
    fn test_draw_error_maps_to_engine() {
        let e: CliError = DrawError::NoValidGroup {
            team: "GHA".to_string(),
        }
        .into();
        assert_eq!(e.to_string(), "Engine error: No valid group for GHA");
    }

    #[test]
    fn test_pool_data_error_maps_to_invalid_input() {
        let e: CliError = PoolDataError::EmptyCode.into();
        assert!(matches!(e, CliError::InvalidInput(_)));
    }
}
