//! Layered configuration sources and default path resolution.
//!
//! A program's configuration comes from up to three layers, lowest to
//! highest precedence: the base file (with its transitive includes), extra
//! files merged over it in the order given, and individually supplied
//! name/type/value defines applied last. Later layers overwrite earlier
//! ones; every cross-layer rebinding is reported as a redefinition
//! warning.

use crate::diag::{DiagnosticSink, Redefinition, TracingSink};
use crate::loader::{FileSource, FsSource, Loader};
use crate::table::ConfigTable;
use crate::value::{parse_value, ConfigValue, ValueError};
use kl_common::{is_valid_name, Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the base configuration file.
pub const CONFIG_ENV_VAR: &str = "KEYLINE_CONFIG";

/// Fallback configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "keyline.cfg";

/// Pseudo-file that redefinition warnings from the define layer carry.
const DEFINE_ORIGIN: &str = "<define>";

/// The layered inputs a configuration is built from.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    base: PathBuf,
    extras: Vec<PathBuf>,
    defines: Vec<(String, ConfigValue)>,
}

impl ConfigSources {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            extras: Vec::new(),
            defines: Vec::new(),
        }
    }

    /// The base file this configuration is rooted at.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Add an extra file, merged over the base (and earlier extras).
    pub fn add_extra(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.extras.push(path.into());
        self
    }

    /// Add a single user-set variable, highest precedence. The value text
    /// is parsed immediately with the declared type.
    pub fn add_define(&mut self, name: &str, type_name: &str, value: &str) -> Result<&mut Self> {
        if !is_valid_name(name) {
            return Err(Error::DefineInvalidName {
                name: name.to_string(),
            });
        }
        let parsed = parse_value(type_name, value).map_err(|err| match err {
            ValueError::InvalidTypeName { type_name } => Error::DefineInvalidType {
                name: name.to_string(),
                type_name,
            },
            ValueError::InvalidSyntax { type_name, text } => Error::DefineInvalidValue {
                name: name.to_string(),
                type_name,
                value: text,
            },
        })?;
        self.defines.push((name.to_string(), parsed));
        Ok(self)
    }

    /// Build the merged table from all layers.
    pub fn load(&self, source: &dyn FileSource, sink: &mut dyn DiagnosticSink) -> Result<ConfigTable> {
        let mut table = Loader::new(source, &mut *sink).load(&self.base)?;
        for extra in &self.extras {
            let layer = Loader::new(source, &mut *sink).load(extra)?;
            table.merge(layer, extra, None, sink);
        }
        for (name, value) in &self.defines {
            if table.insert(name.clone(), value.clone()).is_some() {
                sink.redefinition(Redefinition {
                    file: PathBuf::from(DEFINE_ORIGIN),
                    line: None,
                    name: name.clone(),
                });
            }
        }
        Ok(table)
    }

    /// Build from the real filesystem, logging warnings through `tracing`.
    pub fn load_default(&self) -> Result<ConfigTable> {
        let mut sink = TracingSink;
        self.load(&FsSource, &mut sink)
    }
}

/// Resolve the base configuration file: an explicit path wins, then
/// `$KEYLINE_CONFIG`, then the user configuration directory, then the
/// current directory.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    if let Some(dir) = dirs::config_dir() {
        let candidate = dir.join("keyline").join(DEFAULT_CONFIG_FILE);
        if candidate.exists() {
            return candidate;
        }
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::CollectingSink;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapSource {
        files: HashMap<PathBuf, String>,
    }

    impl MapSource {
        fn with(mut self, path: &str, content: &str) -> Self {
            self.files.insert(PathBuf::from(path), content.to_string());
            self
        }
    }

    impl FileSource for MapSource {
        fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
            self.files.get(path).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")
            })
        }
    }

    // ── layering ───────────────────────────────────────────────────

    #[test]
    fn base_alone() {
        let source = MapSource::default().with("base.cfg", "int N = 1\n");
        let sources = ConfigSources::new("base.cfg");
        let mut sink = CollectingSink::default();
        let table = sources.load(&source, &mut sink).unwrap();
        assert_eq!(table.get_int("N").unwrap(), 1);
        assert!(sink.warnings.is_empty());
    }

    #[test]
    fn extra_overwrites_base_with_warning() {
        let source = MapSource::default()
            .with("base.cfg", "int N = 1\nint KEEP = 7\n")
            .with("site.cfg", "int N = 2\n");
        let mut sources = ConfigSources::new("base.cfg");
        sources.add_extra("site.cfg");
        let mut sink = CollectingSink::default();
        let table = sources.load(&source, &mut sink).unwrap();
        assert_eq!(table.get_int("N").unwrap(), 2);
        assert_eq!(table.get_int("KEEP").unwrap(), 7);
        assert_eq!(sink.warnings.len(), 1);
        assert_eq!(sink.warnings[0].name, "N");
    }

    #[test]
    fn extras_merge_in_order() {
        let source = MapSource::default()
            .with("base.cfg", "int N = 1\n")
            .with("a.cfg", "int N = 2\n")
            .with("b.cfg", "int N = 3\n");
        let mut sources = ConfigSources::new("base.cfg");
        sources.add_extra("a.cfg");
        sources.add_extra("b.cfg");
        let mut sink = CollectingSink::default();
        let table = sources.load(&source, &mut sink).unwrap();
        assert_eq!(table.get_int("N").unwrap(), 3);
        assert_eq!(sink.warnings.len(), 2);
    }

    #[test]
    fn define_has_highest_precedence() {
        let source = MapSource::default()
            .with("base.cfg", "int N = 1\n")
            .with("site.cfg", "int N = 2\n");
        let mut sources = ConfigSources::new("base.cfg");
        sources.add_extra("site.cfg");
        sources.add_define("N", "int", "9").unwrap();
        let mut sink = CollectingSink::default();
        let table = sources.load(&source, &mut sink).unwrap();
        assert_eq!(table.get_int("N").unwrap(), 9);
    }

    #[test]
    fn define_of_new_name_warns_nothing() {
        let source = MapSource::default().with("base.cfg", "int N = 1\n");
        let mut sources = ConfigSources::new("base.cfg");
        sources.add_define("EXTRA", "string", "\"added\"").unwrap();
        let mut sink = CollectingSink::default();
        let table = sources.load(&source, &mut sink).unwrap();
        assert_eq!(table.get_string("EXTRA").unwrap(), "added");
        assert!(sink.warnings.is_empty());
    }

    #[test]
    fn missing_extra_fails_the_load() {
        let source = MapSource::default().with("base.cfg", "int N = 1\n");
        let mut sources = ConfigSources::new("base.cfg");
        sources.add_extra("gone.cfg");
        let mut sink = CollectingSink::default();
        assert!(matches!(
            sources.load(&source, &mut sink),
            Err(Error::Io { .. })
        ));
    }

    // ── defines ────────────────────────────────────────────────────

    #[test]
    fn define_with_bad_name_is_rejected() {
        let mut sources = ConfigSources::new("base.cfg");
        assert!(matches!(
            sources.add_define("2fast", "int", "1"),
            Err(Error::DefineInvalidName { .. })
        ));
    }

    #[test]
    fn define_with_bad_type_is_rejected() {
        let mut sources = ConfigSources::new("base.cfg");
        assert!(matches!(
            sources.add_define("N", "double", "1.0"),
            Err(Error::DefineInvalidType { .. })
        ));
    }

    #[test]
    fn define_with_bad_value_is_rejected() {
        let mut sources = ConfigSources::new("base.cfg");
        assert!(matches!(
            sources.add_define("N", "int", "12x"),
            Err(Error::DefineInvalidValue { .. })
        ));
    }

    #[test]
    fn define_normalizes_like_the_file_parser() {
        let source = MapSource::default().with("base.cfg", "int N = 1\n");
        let mut sources = ConfigSources::new("base.cfg");
        sources.add_define("MASK", "hex", "0xFF").unwrap();
        sources.add_define("FLAG", "boolean", "true").unwrap();
        let mut sink = CollectingSink::default();
        let table = sources.load(&source, &mut sink).unwrap();
        assert_eq!(table.get_int("MASK").unwrap(), 255);
        assert!(table.get_bool("FLAG").unwrap());
    }
}
