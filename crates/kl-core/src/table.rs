//! The flat name → value mapping and typed lookup.
//!
//! A [`ConfigTable`] is the result of loading one file plus its transitive
//! includes (and, through [`crate::resolve`], any layered extras and
//! defines). Lookups are strict: an absent name or a kind mismatch is an
//! error, never a silent default. String lookups expand `$name` references
//! at read time.

use crate::diag::{DiagnosticSink, Redefinition};
use crate::value::{ConfigValue, ValueKind};
use kl_common::{Error, Result, NAME_PATTERN};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Maximum `$name` expansion nesting before a reference cycle is assumed.
pub const MAX_EXPANSION_DEPTH: usize = 32;

/// `$$` (a literal `$`) or `$name`. The escape alternative must come first.
static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\$\$|\$({NAME_PATTERN})")).expect("expansion regex"));

/// Name → typed value mapping with strict typed lookup.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ConfigTable {
    values: HashMap<String, ConfigValue>,
}

impl ConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `name` is bound.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The raw stored value, without expansion.
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    /// Bind `name`, returning the previous value when rebinding.
    pub fn insert(&mut self, name: String, value: ConfigValue) -> Option<ConfigValue> {
        self.values.insert(name, value)
    }

    /// All bound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Merge `other` into `self`, last write wins. Each rebinding is
    /// reported to `sink`, attributed to `file` and `line` (the include
    /// directive or layer that caused the merge).
    pub fn merge(
        &mut self,
        other: ConfigTable,
        file: &Path,
        line: Option<u32>,
        sink: &mut dyn DiagnosticSink,
    ) {
        for (name, value) in other.values {
            if self.values.contains_key(&name) {
                sink.redefinition(Redefinition {
                    file: file.to_path_buf(),
                    line,
                    name: name.clone(),
                });
            }
            self.values.insert(name, value);
        }
    }

    // ── typed lookup ───────────────────────────────────────────────

    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.lookup(name, ValueKind::Int)? {
            ConfigValue::Int(v) => Ok(*v),
            _ => unreachable!("lookup checked the kind"),
        }
    }

    pub fn get_float(&self, name: &str) -> Result<f64> {
        match self.lookup(name, ValueKind::Float)? {
            ConfigValue::Float(v) => Ok(*v),
            _ => unreachable!("lookup checked the kind"),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.lookup(name, ValueKind::Bool)? {
            ConfigValue::Bool(v) => Ok(*v),
            _ => unreachable!("lookup checked the kind"),
        }
    }

    pub fn get_char(&self, name: &str) -> Result<char> {
        match self.lookup(name, ValueKind::Char)? {
            ConfigValue::Char(v) => Ok(*v),
            _ => unreachable!("lookup checked the kind"),
        }
    }

    /// String lookup with `$name` expansion.
    ///
    /// Every `$name` in the stored value is replaced by the string value of
    /// `name` in this table, recursively; `$$` yields a literal `$`. A `$`
    /// followed by neither `$` nor a name is taken literally. Expansion
    /// failures follow the same rules as top-level lookups.
    pub fn get_string(&self, name: &str) -> Result<String> {
        match self.lookup(name, ValueKind::String)? {
            ConfigValue::String(raw) => self.expand(raw, 0, name),
            _ => unreachable!("lookup checked the kind"),
        }
    }

    fn lookup(&self, name: &str, expected: ValueKind) -> Result<&ConfigValue> {
        let value = self.values.get(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })?;
        if value.kind() != expected {
            return Err(Error::TypeMismatch {
                name: name.to_string(),
                expected: expected.to_string(),
                found: value.kind().to_string(),
            });
        }
        Ok(value)
    }

    fn expand(&self, raw: &str, depth: usize, root: &str) -> Result<String> {
        if depth > MAX_EXPANSION_DEPTH {
            return Err(Error::ExpansionDepth {
                name: root.to_string(),
                max: MAX_EXPANSION_DEPTH,
            });
        }
        let mut out = String::with_capacity(raw.len());
        let mut last = 0;
        for caps in VAR_RE.captures_iter(raw) {
            let m = caps.get(0).expect("whole match");
            out.push_str(&raw[last..m.start()]);
            last = m.end();
            match caps.get(1) {
                Some(var) => {
                    let value = self.string_value(var.as_str())?;
                    out.push_str(&self.expand(&value, depth + 1, root)?);
                }
                None => out.push('$'),
            }
        }
        out.push_str(&raw[last..]);
        Ok(out)
    }

    /// Unexpanded string value of `name`, for use inside expansion.
    fn string_value(&self, name: &str) -> Result<String> {
        match self.lookup(name, ValueKind::String)? {
            ConfigValue::String(v) => Ok(v.clone()),
            _ => unreachable!("lookup checked the kind"),
        }
    }
}
