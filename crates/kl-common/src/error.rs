//! Error types for keyline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for keyline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for keyline.
///
/// Every structural failure carries the context a caller needs to decide
/// policy: the file and line for parse errors, the variable name for lookup
/// errors. Redefinitions are not errors; they go to the diagnostic sink.
#[derive(Error, Debug)]
pub enum Error {
    // Syntax errors (10-19)
    #[error("syntax error in {file} at line {line}: unexpected end of line")]
    UnexpectedLine { file: PathBuf, line: u32 },

    #[error("syntax error in {file} at line {line}: invalid type name {type_name}")]
    InvalidTypeName {
        file: PathBuf,
        line: u32,
        type_name: String,
    },

    #[error("syntax error in {file} at line {line}: invalid {type_name} value {value:?}")]
    InvalidValue {
        file: PathBuf,
        line: u32,
        type_name: String,
        value: String,
    },

    #[error("invalid name {name:?} for user-set variable")]
    DefineInvalidName { name: String },

    #[error("invalid type name {type_name} for user-set variable {name}")]
    DefineInvalidType { name: String, type_name: String },

    #[error("invalid {type_name} value {value:?} for user-set variable {name}")]
    DefineInvalidValue {
        name: String,
        type_name: String,
        value: String,
    },

    // Include errors (20-29)
    #[error("include cycle in {file} at line {line}: {target} is already being loaded")]
    IncludeCycle {
        file: PathBuf,
        line: u32,
        target: PathBuf,
    },

    #[error("includes nested deeper than {max} levels in {file} at line {line}")]
    IncludeDepth { file: PathBuf, line: u32, max: usize },

    #[error("absolute include path {target} in {file} at line {line}")]
    AbsoluteInclude {
        file: PathBuf,
        line: u32,
        target: PathBuf,
    },

    // Lookup errors (30-39)
    #[error("configuration variable {name} is not bound")]
    NotFound { name: String },

    #[error("incompatible type for configuration variable {name}: looked for {expected}, but found {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("string expansion of {name} exceeded {max} levels; reference cycle suspected")]
    ExpansionDepth { name: String, max: usize },

    // I/O errors (60-69)
    #[error("could not read configuration file {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns the stable numeric code for this error type.
    /// The CLI maps these onto its exit-code space.
    pub fn code(&self) -> u32 {
        match self {
            Error::UnexpectedLine { .. } => 10,
            Error::InvalidTypeName { .. } => 11,
            Error::InvalidValue { .. } => 12,
            Error::DefineInvalidName { .. } => 13,
            Error::DefineInvalidType { .. } => 14,
            Error::DefineInvalidValue { .. } => 15,
            Error::IncludeCycle { .. } => 20,
            Error::IncludeDepth { .. } => 21,
            Error::AbsoluteInclude { .. } => 22,
            Error::NotFound { .. } => 30,
            Error::TypeMismatch { .. } => 31,
            Error::ExpansionDepth { .. } => 32,
            Error::Io { .. } => 60,
        }
    }
}
