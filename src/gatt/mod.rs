pub mod characteristic;
pub mod characteristic_event;
pub mod descriptor;
pub mod properties;
pub mod property_bag;

use std::fmt;

/// D-Bus object path identifying a BlueZ GATT object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectPath {
    fn from(path: &str) -> Self {
        ObjectPath(path.to_string())
    }
}

impl From<String> for ObjectPath {
    fn from(path: String) -> Self {
        ObjectPath(path)
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
