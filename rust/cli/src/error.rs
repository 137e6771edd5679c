//! Error types for the CLI application.
//!
//! Engine and session errors are folded into [`CliError`] so command handlers
//! can propagate everything with `?` and [`crate::run`] can map the result to
//! an exit code in one place.

use crate::config::ConfigError;
use crate::exit_code;
use lastturn_engine::errors::GameError;
use lastturn_session::SessionError;
use std::fmt;

/// Custom error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Error reported by the match engine or the live session
    Engine(String),

    /// The user quit before the match was decided
    Interrupted(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Interrupted(_) => exit_code::INTERRUPTED,
            _ => exit_code::ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
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

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        match error {
            GameError::InvalidConfig(msg) => CliError::Config(msg),
            other => CliError::Engine(other.to_string()),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Game(e) => e.into(),
            other => CliError::Engine(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}
