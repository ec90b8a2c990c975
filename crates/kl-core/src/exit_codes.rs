//! Exit codes for the keyline CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing. These are stable.

use kl_common::Error;

/// Exit codes for keyline operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Clean run
    Ok = 0,

    /// Configuration could not be parsed (syntax, type, include errors)
    ConfigError = 10,

    /// Lookup failed (unbound name, type mismatch, expansion failure)
    LookupError = 11,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates an error.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Map a library error onto the exit-code space via its stable code.
    pub fn from_error(err: &Error) -> Self {
        match err.code() {
            10..=29 => ExitCode::ConfigError,
            30..=39 => ExitCode::LookupError,
            60..=69 => ExitCode::IoError,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
