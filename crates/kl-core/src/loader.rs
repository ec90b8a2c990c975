//! Recursive configuration-file loading.
//!
//! A file is read whole and parsed eagerly, line by line. Declarations go
//! through the value parser; `use` directives load the referenced file
//! (resolved against the directory of the referencing file) and merge its
//! bindings, warning on redefinition. The include graph is walked with the
//! active path on a stack, so cycles are reported instead of recursing
//! forever.

use crate::diag::{DiagnosticSink, Redefinition, TracingSink};
use crate::line::{classify, Line};
use crate::table::ConfigTable;
use crate::value::{parse_value, ValueError};
use kl_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum depth of `use` nesting before loading is aborted.
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// Where file contents come from. Mockable for tests.
pub trait FileSource {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl FileSource for FsSource {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Drives the recursive load of one file and its transitive includes.
pub struct Loader<'a> {
    source: &'a dyn FileSource,
    sink: &'a mut dyn DiagnosticSink,
    /// Files currently being loaded, outermost first.
    active: Vec<PathBuf>,
}

impl<'a> Loader<'a> {
    pub fn new(source: &'a dyn FileSource, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            source,
            sink,
            active: Vec::new(),
        }
    }

    /// Load `path` and everything it includes into one flat table.
    pub fn load(&mut self, path: &Path) -> Result<ConfigTable> {
        debug!(file = %path.display(), "loading configuration");
        self.load_inner(path)
    }

    fn load_inner(&mut self, path: &Path) -> Result<ConfigTable> {
        let content = self
            .source
            .read_to_string(path)
            .map_err(|source| Error::Io {
                file: path.to_path_buf(),
                source,
            })?;
        self.active.push(path.to_path_buf());
        let result = self.parse_content(path, &content);
        self.active.pop();
        result
    }

    fn parse_content(&mut self, path: &Path, content: &str) -> Result<ConfigTable> {
        let mut table = ConfigTable::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = (idx + 1) as u32;
            match classify(raw) {
                Some(Line::Skip) => {}
                Some(Line::Include { relpath }) => {
                    let target = self.resolve_include(path, line, relpath)?;
                    let included = self.load_include(path, line, &target)?;
                    table.merge(included, path, Some(line), self.sink);
                }
                Some(Line::Declaration {
                    type_name,
                    name,
                    value,
                }) => {
                    let parsed = parse_value(type_name, value).map_err(|err| match err {
                        ValueError::InvalidTypeName { type_name } => Error::InvalidTypeName {
                            file: path.to_path_buf(),
                            line,
                            type_name,
                        },
                        ValueError::InvalidSyntax { type_name, text } => Error::InvalidValue {
                            file: path.to_path_buf(),
                            line,
                            type_name,
                            value: text,
                        },
                    })?;
                    if table.insert(name.to_string(), parsed).is_some() {
                        self.sink.redefinition(Redefinition {
                            file: path.to_path_buf(),
                            line: Some(line),
                            name: name.to_string(),
                        });
                    }
                }
                None => {
                    return Err(Error::UnexpectedLine {
                        file: path.to_path_buf(),
                        line,
                    })
                }
            }
        }
        Ok(table)
    }

    /// Resolve an include path against the directory of the current file.
    /// Absolute paths are not permitted.
    fn resolve_include(&self, file: &Path, line: u32, relpath: &str) -> Result<PathBuf> {
        let rel = Path::new(relpath);
        if rel.is_absolute() {
            return Err(Error::AbsoluteInclude {
                file: file.to_path_buf(),
                line,
                target: rel.to_path_buf(),
            });
        }
        let dir = file.parent().unwrap_or_else(|| Path::new(""));
        Ok(dir.join(rel))
    }

    fn load_include(&mut self, file: &Path, line: u32, target: &Path) -> Result<ConfigTable> {
        if self.active.len() >= MAX_INCLUDE_DEPTH {
            return Err(Error::IncludeDepth {
                file: file.to_path_buf(),
                line,
                max: MAX_INCLUDE_DEPTH,
            });
        }
        if self.active.iter().any(|p| p == target) {
            return Err(Error::IncludeCycle {
                file: file.to_path_buf(),
                line,
                target: target.to_path_buf(),
            });
        }
        self.load_inner(target)
    }
}

/// Load one configuration file and its transitive includes, logging
/// redefinition warnings through `tracing`.
pub fn load_file(path: impl AsRef<Path>) -> Result<ConfigTable> {
    let mut sink = TracingSink;
    Loader::new(&FsSource, &mut sink).load(path.as_ref())
}
