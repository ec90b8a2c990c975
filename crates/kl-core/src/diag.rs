//! Advisory diagnostics.
//!
//! Redefinitions are not errors: the last write wins and loading continues.
//! They are still worth surfacing, so the loader and the merge paths report
//! them through a sink the caller controls. Production code logs them;
//! tests collect them.

use std::path::PathBuf;
use tracing::warn;

/// A non-fatal notice that a name was bound more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redefinition {
    /// The file whose processing observed the rebinding.
    pub file: PathBuf,
    /// The rebinding declaration or include line, when known. Layered
    /// merges (extra files, defines) carry no line.
    pub line: Option<u32>,
    /// The rebound variable.
    pub name: String,
}

/// Receives advisory warnings. Mockable for tests.
pub trait DiagnosticSink {
    fn redefinition(&mut self, redef: Redefinition);
}

/// Logs warnings through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn redefinition(&mut self, redef: Redefinition) {
        match redef.line {
            Some(line) => warn!(
                file = %redef.file.display(),
                line,
                name = %redef.name,
                "configuration variable is already bound"
            ),
            None => warn!(
                file = %redef.file.display(),
                name = %redef.name,
                "configuration variable is already bound"
            ),
        }
    }
}

/// Collects warnings in memory, for assertions.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub warnings: Vec<Redefinition>,
}

impl DiagnosticSink for CollectingSink {
    fn redefinition(&mut self, redef: Redefinition) {
        self.warnings.push(redef);
    }
}
