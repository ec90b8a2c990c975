//! Keyline configuration parsing, loading, and typed lookup.
//!
//! This crate provides:
//! - The pure value parser for the seven declared type names
//! - The recursive file loader with include resolution and cycle guards
//! - [`ConfigTable`] typed lookups with read-time `$name` expansion
//! - Layered source resolution (base file → extra files → defines)
//! - A build-on-first-use configuration context with invalidate/refresh

pub mod context;
pub mod diag;
pub mod exit_codes;
pub mod line;
pub mod loader;
pub mod resolve;
pub mod table;
pub mod value;

pub use context::ConfigContext;
pub use diag::{CollectingSink, DiagnosticSink, Redefinition, TracingSink};
pub use loader::{load_file, FileSource, FsSource, Loader, MAX_INCLUDE_DEPTH};
pub use resolve::{resolve_config_path, ConfigSources};
pub use table::{ConfigTable, MAX_EXPANSION_DEPTH};
pub use value::{parse_value, ConfigValue, ValueError, ValueKind};
