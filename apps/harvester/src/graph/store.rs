use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::graph::value::{Key, Record, Value};

/// Key of the record holding every cached query result.
pub const ROOT_QUERY: &str = "ROOT_QUERY";

/// A point-in-time copy of the page's normalized cache: `Key → Record`.
/// Read-only once built; the session replaces it wholesale on navigation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: HashMap<Key, Record>,
}

impl Snapshot {
    pub fn new(records: HashMap<Key, Record>) -> Self {
        Self { records }
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn root_query(&self) -> Option<&Record> {
        self.get(ROOT_QUERY)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<Key, Value>::deserialize(deserializer)?;
        let records = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Object(record) => Some((key, record)),
                other => {
                    debug!("Skipping non-record snapshot entry '{key}' ({})", other.kind());
                    None
                }
            })
            .collect();
        Ok(Snapshot::new(records))
    }
}
