//! Exit code constants for the CLI application.
//!
//! All commands map their result onto one of these codes in [`crate::run`].

/// Success exit code (standard Unix convention).
pub const SUCCESS: i32 = 0;

/// General error exit code.
pub const ERROR: i32 = 2;

/// The user left an interactive match before it was decided.
pub const INTERRUPTED: i32 = 130;
