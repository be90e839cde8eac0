//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A built-in or configured text pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Filter rule not found.
    #[error("Filter rule not found: {0}")]
    RuleNotFound(String),

    /// Rule kind spelling not recognised.
    #[error("Unknown rule kind: {0} (expected allow or deny)")]
    UnknownRuleKind(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Alert could not be handed to the delivery channel.
    #[error("Delivery error: {0}")]
    Delivery(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
