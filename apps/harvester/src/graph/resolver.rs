//! Reference Resolver: follows `Value::Reference` markers through a snapshot.
//!
//! Every step returns `Resolved<T>`; chains are composed with `?` so a
//! multi-hop lookup stops at the first missing hop. At the field boundary
//! `ResolvedExt::or_log` turns the result into an `Option`, logging misses at
//! debug and unexpected shapes at warn. Nothing here panics.

use thiserror::Error;
use tracing::{debug, warn};

use crate::graph::store::{Snapshot, ROOT_QUERY};
use crate::graph::value::{Record, RecordExt, Value};

const TYPE_ID_DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("nothing stored under '{0}'")]
    Missing(String),

    #[error("expected {expected} at '{at}', found {found}")]
    Shape {
        at: String,
        expected: &'static str,
        found: &'static str,
    },
}

pub type Resolved<T> = Result<T, ResolveError>;

/// Extracts the id part of a typed key: `Employer:194` → `194`.
pub fn ref_id(key: &str) -> Option<&str> {
    key.split(TYPE_ID_DELIMITER).nth(1).filter(|id| !id.is_empty())
}

/// Read-only resolver over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a Snapshot,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a Snapshot) -> Self {
        Self { store }
    }

    /// Direct key lookup.
    pub fn lookup(&self, key: &str) -> Resolved<&'a Record> {
        self.store
            .get(key)
            .ok_or_else(|| ResolveError::Missing(key.to_string()))
    }

    /// Resolves a value to a record: references are followed, inline objects
    /// resolve to themselves.
    pub fn follow(&self, value: &'a Value) -> Resolved<&'a Record> {
        match value {
            Value::Reference(key) => self.lookup(key),
            Value::Object(record) => Ok(record),
            other => Err(shape("value", "reference or object", other)),
        }
    }

    /// Resolves `record.field` to a record.
    pub fn follow_field(&self, record: &'a Record, field: &str) -> Resolved<&'a Record> {
        let value = record
            .field(field)
            .ok_or_else(|| ResolveError::Missing(field.to_string()))?;
        if value.is_null() {
            return Err(ResolveError::Missing(field.to_string()));
        }
        self.follow(value).map_err(|e| retarget(e, field))
    }

    /// Reads a list-valued field.
    pub fn list_field(&self, record: &'a Record, field: &str) -> Resolved<&'a [Value]> {
        let value = record
            .field(field)
            .ok_or_else(|| ResolveError::Missing(field.to_string()))?;
        value.as_list().ok_or_else(|| shape(field, "list", value))
    }

    /// Reads a cached query result out of `ROOT_QUERY`.
    pub fn query(&self, query_key: &str) -> Resolved<&'a Value> {
        let root = self
            .store
            .root_query()
            .ok_or_else(|| ResolveError::Missing(ROOT_QUERY.to_string()))?;
        match root.field(query_key) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(ResolveError::Missing(query_key.to_string())),
        }
    }

    /// Reads a query result that must itself be a reference and returns its key.
    pub fn query_reference(&self, query_key: &str) -> Resolved<&'a str> {
        let value = self.query(query_key)?;
        value
            .as_reference()
            .ok_or_else(|| shape(query_key, "reference", value))
    }

    /// Resolves every element of a list, keeping position. Elements that fail
    /// become `None` without affecting their siblings.
    pub fn follow_all(&self, items: &'a [Value]) -> Vec<Option<&'a Record>> {
        items
            .iter()
            .map(|item| self.follow(item).or_log("list element"))
            .collect()
    }
}

fn shape(at: &str, expected: &'static str, found: &Value) -> ResolveError {
    ResolveError::Shape {
        at: at.to_string(),
        expected,
        found: found.kind(),
    }
}

fn retarget(error: ResolveError, field: &str) -> ResolveError {
    match error {
        ResolveError::Shape { expected, found, .. } => ResolveError::Shape {
            at: field.to_string(),
            expected,
            found,
        },
        missing => missing,
    }
}

/// Fallback combinator applied where a resolution result becomes a field value.
pub trait ResolvedExt<T> {
    fn or_log(self, what: &str) -> Option<T>;
}

impl<T> ResolvedExt<T> for Resolved<T> {
    fn or_log(self, what: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e @ ResolveError::Missing(_)) => {
                debug!("No {what}: {e}");
                None
            }
            Err(e @ ResolveError::Shape { .. }) => {
                warn!("Unexpected snapshot shape for {what}: {e}");
                None
            }
        }
    }
}
