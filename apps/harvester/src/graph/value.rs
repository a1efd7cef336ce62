//! Snapshot values: the tagged union every record field is built from.
//!
//! The page cache stores pointers as `{"__ref": "<key>"}` objects. They are
//! lifted into `Value::Reference` at load time so resolution never has to
//! sniff object shapes.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value as Json};

/// A key into the snapshot store, e.g. `Employer:1234`.
pub type Key = String;

/// A normalized record: field name → value.
pub type Record = HashMap<String, Value>;

const REF_FIELD: &str = "__ref";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Reference(Key),
    List(Vec<Value>),
    Object(Record),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Value::Reference(key) => Some(key),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Record> {
        match self {
            Value::Object(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Textual form of a scalar, used for loose id comparison (`42` == `"42"`).
    pub fn text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// A short name for the variant, used in shape-mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Reference(_) => "reference",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(mut map) => {
                let is_marker = map.len() == 1 && matches!(map.get(REF_FIELD), Some(Json::String(_)));
                if is_marker {
                    if let Some(Json::String(key)) = map.remove(REF_FIELD) {
                        return Value::Reference(key);
                    }
                }
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Json::deserialize(deserializer).map(Value::from)
    }
}

/// Writes the value back in page form: references become `{"__ref": k}`
/// again and scalars keep their JSON type.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Reference(key) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(REF_FIELD, key)?;
                map.end()
            }
            Value::List(items) => serializer.collect_seq(items),
            Value::Object(record) => serializer.collect_map(record),
        }
    }
}

/// Typed field access on a record. Inline nested objects are walked by `path`;
/// references are left to the resolver.
pub trait RecordExt {
    fn field(&self, name: &str) -> Option<&Value>;
    fn path(&self, path: &[&str]) -> Option<&Value>;

    fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// The field exactly as stored; `Null` when absent.
    fn raw_field(&self, name: &str) -> Value {
        self.field(name).cloned().unwrap_or_default()
    }

    fn bool_field(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::as_bool)
    }

    fn reference(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_reference)
    }
}

impl RecordExt for Record {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.get(*first)?, |value, name| value.as_object()?.get(*name))
    }
}
