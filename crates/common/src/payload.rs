//! Tagged payload values carried in an exchange's input and output slots.
//!
//! Processors never probe payload types at runtime. They declare the exact
//! Rust type they accept and [`FromPayload`] performs the check once, yielding
//! either a typed value or `None` (a guard mismatch).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A message body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl Payload {
    /// Short name of the variant, used in logs and diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "json",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Typed view of this payload. `None` when the variant does not match `T`.
    pub fn extract<T: FromPayload>(&self) -> Option<T> {
        T::from_payload(self)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("[Body is null]"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => write!(f, "[Body is bytes, {} bytes]", b.len()),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Payload {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

// ── FromPayload ─────────────────────────────────────────────────────────────

/// Exact-type accessor for payloads.
///
/// Implementations match a single variant. There is no coercion: a `Text("5")`
/// payload is not an `i64`.
pub trait FromPayload: Sized {
    /// Name reported when the guard rejects a payload.
    const TYPE_NAME: &'static str;

    fn from_payload(payload: &Payload) -> Option<Self>;
}

impl FromPayload for String {
    const TYPE_NAME: &'static str = "text";

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromPayload for i64 {
    const TYPE_NAME: &'static str = "int";

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromPayload for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromPayload for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromPayload for Vec<u8> {
    const TYPE_NAME: &'static str = "bytes";

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Bytes(b) => Some(b.clone()),
            _ => None,
        }
    }
}

impl FromPayload for serde_json::Value {
    const TYPE_NAME: &'static str = "json";

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Json(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Accepts any non-null payload.
impl FromPayload for Payload {
    const TYPE_NAME: &'static str = "any";

    fn from_payload(payload: &Payload) -> Option<Self> {
        (!payload.is_null()).then(|| payload.clone())
    }
}
