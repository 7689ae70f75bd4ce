//! Canonical MessagePack, the encoding the ledger signs and hashes.
//!
//! Canonical form means: map keys sorted, zero-valued fields omitted, and
//! every integer written with its shortest representation. Objects build a
//! [`Value`] tree through [`MapBuilder`], which enforces the first two rules;
//! [`Writer`] enforces the third.

mod reader;
mod writer;

pub use reader::{Reader, ReaderError};
pub use writer::Writer;

use std::collections::BTreeMap;

/// Subset of MessagePack values used by ledger objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Nil,
    Bool(bool),
    Uint(u64),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    // Zero values are omitted from canonical maps
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(value) => !value,
            Value::Uint(value) => *value == 0,
            Value::Str(value) => value.is_empty(),
            Value::Bytes(value) => value.is_empty(),
            Value::Array(values) => values.is_empty(),
            Value::Map(entries) => entries.is_empty(),
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    // Lookup in a map value, None for missing keys or non-map values
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|entries| entries.get(key))
    }
}

/// Builds a canonical map: keys are kept sorted and empty values dropped.
#[derive(Debug, Default)]
pub struct MapBuilder {
    entries: BTreeMap<String, Value>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, key: &str, value: Value) -> Self {
        if !value.is_empty() {
            self.entries.insert(key.to_owned(), value);
        }
        self
    }

    pub fn uint(self, key: &str, value: u64) -> Self {
        self.value(key, Value::Uint(value))
    }

    pub fn bool(self, key: &str, value: bool) -> Self {
        self.value(key, Value::Bool(value))
    }

    pub fn str(self, key: &str, value: &str) -> Self {
        self.value(key, Value::Str(value.to_owned()))
    }

    pub fn bytes(self, key: &str, value: &[u8]) -> Self {
        self.value(key, Value::Bytes(value.to_vec()))
    }

    pub fn opt_bytes(self, key: &str, value: Option<&[u8]>) -> Self {
        match value {
            Some(value) => self.bytes(key, value),
            None => self,
        }
    }

    pub fn build(self) -> Value {
        Value::Map(self.entries)
    }
}

/// Objects with a canonical MessagePack form.
pub trait Serializer {
    fn to_value(&self) -> Value;

    fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_value(&self.to_value());
        writer.bytes()
    }
}

impl Serializer for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}
