//! Typed configuration values and the value parser.
//!
//! [`parse_value`] is the pure half of the loader: given a declared type
//! name and a raw value token it either produces a [`ConfigValue`] or
//! reports which of the two ways it failed. It performs no I/O and is
//! deterministic, so the file loader and the `-D` define path share it.

use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// A single typed configuration value.
///
/// The `hex` and `octal` type names only affect how the token is parsed;
/// both store as [`ConfigValue::Int`]. `boolean` is an alias for `bool`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    String(String),
}

impl ConfigValue {
    /// The stored kind, for type-mismatch diagnostics.
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::Float(_) => ValueKind::Float,
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Char(_) => ValueKind::Char,
            ConfigValue::String(_) => ValueKind::String,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Int(v) => write!(f, "{v}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Bool(v) => write!(f, "{v}"),
            ConfigValue::Char(v) => write!(f, "{v}"),
            ConfigValue::String(v) => write!(f, "{v}"),
        }
    }
}

/// The five kinds a value can be stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Char,
    String,
}

impl ValueKind {
    /// The kind name as it appears in diagnostics and `--kind` arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Char => "char",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a value token failed to parse.
///
/// The loader wraps these with file/line context; the token itself carries
/// none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The declared type is not one of the seven recognized names.
    #[error("invalid type name {type_name}")]
    InvalidTypeName { type_name: String },

    /// The token does not fully match the grammar for its declared type.
    #[error("invalid {type_name} value {text:?}")]
    InvalidSyntax { type_name: String, text: String },
}

static FLOAT_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("float regex"));

/// Parse a raw value token according to its declared type name.
///
/// The token must match the type's grammar in full; trailing garbage, an
/// empty token, or digits outside the declared base are all
/// [`ValueError::InvalidSyntax`].
pub fn parse_value(type_name: &str, text: &str) -> Result<ConfigValue, ValueError> {
    let invalid = || ValueError::InvalidSyntax {
        type_name: type_name.to_string(),
        text: text.to_string(),
    };

    match type_name {
        "int" => parse_radix(text, 10).map(ConfigValue::Int).ok_or_else(invalid),
        "hex" => {
            let digits = text.strip_prefix("0x").unwrap_or(text);
            parse_radix(digits, 16).map(ConfigValue::Int).ok_or_else(invalid)
        }
        "octal" => parse_radix(text, 8).map(ConfigValue::Int).ok_or_else(invalid),
        "float" => {
            if FLOAT_RE.is_match(text) {
                text.parse::<f64>().map(ConfigValue::Float).map_err(|_| invalid())
            } else {
                Err(invalid())
            }
        }
        "bool" | "boolean" => match text {
            "true" | "1" => Ok(ConfigValue::Bool(true)),
            "false" | "0" => Ok(ConfigValue::Bool(false)),
            _ => Err(invalid()),
        },
        "char" => parse_char(text).map(ConfigValue::Char).ok_or_else(invalid),
        "string" => parse_string(text).map(ConfigValue::String).ok_or_else(invalid),
        _ => Err(ValueError::InvalidTypeName {
            type_name: type_name.to_string(),
        }),
    }
}

/// Integer token in the given base; the whole token must be digits of that
/// base. Overflow is a syntax error, not a wrap.
fn parse_radix(text: &str, radix: u32) -> Option<i64> {
    if text.is_empty() || !text.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(text, radix).ok()
}

/// Char token: a single character, optionally `'...'`-quoted, or one of the
/// escapes `\n`, `\r`, `\t` (quoted or bare). First matching form wins.
fn parse_char(text: &str) -> Option<char> {
    let inner = if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        &text[1..text.len() - 1]
    } else {
        text
    };
    match inner {
        r"\n" => Some('\n'),
        r"\r" => Some('\r'),
        r"\t" => Some('\t'),
        _ => {
            let mut chars = inner.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
    }
}

/// String token: a fully `"`-quoted token has its quotes stripped (the
/// content may not contain `"`); anything else non-empty is taken as-is.
fn parse_string(text: &str) -> Option<String> {
    if let Some(rest) = text.strip_prefix('"') {
        let inner = rest.strip_suffix('"')?;
        if inner.contains('"') {
            return None;
        }
        Some(inner.to_string())
    } else if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
