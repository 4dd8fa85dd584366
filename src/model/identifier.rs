use crate::error::{json_kind, ImdbError, Result};
use crate::model::catalog;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

/// Number of digits after the prefix in a canonical identifier
pub const ID_WIDTH: usize = 7;

static TITLE_ID: LazyLock<Regex> = LazyLock::new(|| pattern(IdKind::Title));
static NAME_ID: LazyLock<Regex> = LazyLock::new(|| pattern(IdKind::Name));

fn pattern(kind: IdKind) -> Regex {
    Regex::new(&format!(r"^{}[0-9]{{{}}}$", kind.prefix(), ID_WIDTH))
        .expect("identifier pattern is a valid regex")
}

/// Root-fetchable entity kinds, each with its own identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    /// Media titles, `tt#######`
    Title,
    /// People, `nm#######`
    Name,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Title => "tt",
            IdKind::Name => "nm",
        }
    }

    /// Descriptor this kind is constructed with
    pub fn descriptor_name(&self) -> &'static str {
        match self {
            IdKind::Title => catalog::TITLE,
            IdKind::Name => catalog::NAME,
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            IdKind::Title => &TITLE_ID,
            IdKind::Name => &NAME_ID,
        }
    }
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IdKind::Title => write!(f, "title"),
            IdKind::Name => write!(f, "name"),
        }
    }
}

/// Identifier as supplied by a caller: a bare number or a (possibly
/// prefixed) string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdInput {
    Integer(i64),
    Text(String),
}

impl From<i64> for IdInput {
    fn from(value: i64) -> Self {
        IdInput::Integer(value)
    }
}

impl From<i32> for IdInput {
    fn from(value: i32) -> Self {
        IdInput::Integer(value.into())
    }
}

impl From<u32> for IdInput {
    fn from(value: u32) -> Self {
        IdInput::Integer(value.into())
    }
}

impl From<&str> for IdInput {
    fn from(value: &str) -> Self {
        IdInput::Text(value.to_string())
    }
}

impl From<String> for IdInput {
    fn from(value: String) -> Self {
        IdInput::Text(value)
    }
}

impl From<&CanonicalId> for IdInput {
    fn from(value: &CanonicalId) -> Self {
        IdInput::Text(value.0.clone())
    }
}

impl TryFrom<&Value> for IdInput {
    type Error = ImdbError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(IdInput::Text(s.clone())),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Ok(IdInput::Integer(i)),
                // Integral, just far too long to be an identifier
                (None, Some(u)) => Err(ImdbError::InvalidIdentifier {
                    value: u.to_string(),
                    expected: format!("at most {} digits", ID_WIDTH),
                }),
                (None, None) => Err(ImdbError::InvalidArgumentType(format!(
                    "identifier must be an integer or a string, {} given",
                    json_kind(value)
                ))),
            },
            other => Err(ImdbError::InvalidArgumentType(format!(
                "identifier must be an integer or a string, {} given",
                json_kind(other)
            ))),
        }
    }
}

/// Normalized `prefix + 7 digits` identifier. Only `normalize` makes one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize an identifier: strip an existing prefix, zero-pad the
/// digits on the left to `ID_WIDTH`, prepend the prefix, then require the
/// exact `prefix\d{7}` shape.
pub fn normalize(input: impl Into<IdInput>, kind: IdKind) -> Result<CanonicalId> {
    let raw = match input.into() {
        IdInput::Integer(n) => n.to_string(),
        IdInput::Text(s) => s,
    };

    let digits = raw.strip_prefix(kind.prefix()).unwrap_or(&raw);
    let candidate = if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}{:0>width$}", kind.prefix(), digits, width = ID_WIDTH)
    } else {
        format!("{}{}", kind.prefix(), digits)
    };

    if kind.pattern().is_match(&candidate) {
        Ok(CanonicalId(candidate))
    } else {
        Err(ImdbError::InvalidIdentifier {
            value: raw,
            expected: format!("{}{}", kind.prefix(), "#".repeat(ID_WIDTH)),
        })
    }
}
