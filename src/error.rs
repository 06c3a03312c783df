//! Error types for model-forge
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Result type alias for model-forge
pub type Result<T> = std::result::Result<T, ModelForgeError>;

/// Main error type for model-forge
#[derive(Error, Debug)]
pub enum ModelForgeError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Literal evaluation errors (restricted data-literal grammar)
    #[error("Literal evaluation error: {0}")]
    Literal(String),

    /// Command with wrong argument shape
    #[error("Invalid syntax for {command}: expected {expected}")]
    InvalidCommandSyntax { command: String, expected: String },

    /// Unknown CLI command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),
}
