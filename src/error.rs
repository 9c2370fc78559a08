//! Error types for taskone.

use crate::onboarding::Screen;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the onboarding flow controller.
///
/// A continue pressed while its gate is closed is not an error; the
/// sequencer treats it as a no-op.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Unknown {catalog} id: {id}")]
    InvalidSelectionId { catalog: &'static str, id: String },

    #[error("Failed to persist onboarding completion: {0}")]
    PersistenceWriteFailure(#[source] DatabaseError),

    #[error("Onboarding completion is already being written")]
    CompletionInFlight,

    #[error("Only available on {expected}, currently on {current}")]
    WrongScreen { expected: Screen, current: Screen },

    #[error("Completion task did not finish: {0}")]
    TaskAborted(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
