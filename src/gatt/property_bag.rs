use super::ObjectPath;
use std::collections::HashMap;

pub const UUID: &str = "UUID";
pub const NAME: &str = "Name";
pub const FLAGS: &str = "Flags";
pub const VALUE: &str = "Value";
pub const NOTIFYING: &str = "Notifying";
pub const CHARACTERISTIC: &str = "Characteristic";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Str(String),
    Bool(bool),
    Bytes(Vec<u8>),
    StrList(Vec<String>),
    Path(ObjectPath),
}

/// Named attributes of a discovered or changed D-Bus object, keyed by BlueZ property name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    entries: HashMap<String, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: PropertyValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: PropertyValue) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            PropertyValue::Str(value) => Some(value.as_str()),
            other => mismatch(key, "string", other),
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            PropertyValue::Bool(value) => Some(*value),
            other => mismatch(key, "bool", other),
        }
    }

    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        match self.get(key)? {
            PropertyValue::Bytes(value) => Some(value.as_slice()),
            other => mismatch(key, "bytes", other),
        }
    }

    pub fn get_str_list(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            PropertyValue::StrList(value) => Some(value.as_slice()),
            other => mismatch(key, "string list", other),
        }
    }

    pub fn get_path(&self, key: &str) -> Option<&ObjectPath> {
        match self.get(key)? {
            PropertyValue::Path(value) => Some(value),
            other => mismatch(key, "object path", other),
        }
    }
}

fn mismatch<T>(key: &str, expected: &str, found: &PropertyValue) -> Option<T> {
    log::warn!("Property {key} should be a {expected}, found {found:?}");
    None
}
