//! Values accepted by the encoder
//!
//! [`Value`] is a closed set of shapes: scalars, ordered sequences, keyed
//! mappings, named-field composites and the explicitly typed [`SoapVal`]
//! wrapper. Classification of a value into an encoding rule is a `match`
//! over this enum.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::soapval::SoapVal;

/// Ordered key/value pairs
pub type Mapping = IndexMap<String, Value>;

/// Universal encoder input
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Whole number
    Int(i64),
    /// Whole number above `i64::MAX`
    UInt(u64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Binary payload, encoded as base64
    Bytes(Vec<u8>),
    /// Ordered list
    Sequence(Vec<Value>),
    /// Keyed mapping, in insertion order
    Mapping(Mapping),
    /// Value carrying named fields and a type name of its own
    Composite(Composite),
    /// Explicitly typed value; overrides classification
    Typed(Box<SoapVal>),
    /// Host value with no XML representation
    Opaque {
        /// Kind of the value
        kind: String,
        /// Printable form of the value
        repr: String,
    },
}

/// Named-field value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composite {
    /// Type name, used as element name when the composite has none
    pub type_name: String,
    /// Fields in declaration order
    pub fields: Mapping,
}

impl Composite {
    /// Create an empty composite
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Mapping::new(),
        }
    }

    /// Add a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Shape of a keyed mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    /// Every key is a non-negative integer index; encoded as an array
    Simple,
    /// At least one key is a name; encoded as a struct
    Struct,
}

/// Classify a mapping by scanning all of its keys
pub fn classify_mapping(mapping: &Mapping) -> MappingKind {
    if mapping.keys().all(|k| is_index_key(k)) {
        MappingKind::Simple
    } else {
        MappingKind::Struct
    }
}

// Canonical decimal form only: "01" and "+1" are names, not indexes
fn is_index_key(key: &str) -> bool {
    !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'))
}

impl Value {
    /// Build a mapping value from pairs
    pub fn mapping<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a binary value
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Build an opaque value
    pub fn opaque(kind: impl Into<String>, repr: impl Into<String>) -> Self {
        Value::Opaque {
            kind: kind.into(),
            repr: repr.into(),
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if the value is a scalar (boolean, number, text or bytes)
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_)
                | Value::Int(_)
                | Value::UInt(_)
                | Value::Float(_)
                | Value::Text(_)
                | Value::Bytes(_)
        )
    }

    /// Short name of the variant, for traces and diagnostics
    pub fn kind_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::UInt(_) => "unsignedLong",
            Value::Float(_) => "double",
            Value::Text(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Composite(_) => "composite",
            Value::Typed(_) => "soapval",
            Value::Opaque { kind, .. } => kind,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Value::UInt(v), Value::Int)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for Value {
    fn from(v: Mapping) -> Self {
        Value::Mapping(v)
    }
}

impl From<Composite> for Value {
    fn from(v: Composite) -> Self {
        Value::Composite(v)
    }
}

impl From<SoapVal> for Value {
    fn from(v: SoapVal) -> Self {
        Value::Typed(Box::new(v))
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(u)) => Value::UInt(u),
                (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            JsonValue::Object(obj) => {
                Value::Mapping(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
