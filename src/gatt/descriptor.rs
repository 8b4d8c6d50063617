use super::{
    properties::{parse_property_flags, CharacteristicFlags},
    property_bag::{self, PropertyBag},
    ObjectPath,
};
use crate::uuid::ShortUuid;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A descriptor discovered beneath a characteristic.
///
/// Reading and writing descriptors happens elsewhere; this only keeps what
/// discovery reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub path: ObjectPath,
    pub uuid: Uuid,
    pub flags: CharacteristicFlags,
    pub value: Vec<u8>,
}

impl Descriptor {
    pub fn from_properties(path: ObjectPath, properties: &PropertyBag) -> Self {
        let uuid = match properties.get_str(property_bag::UUID).map(Uuid::from_string) {
            Some(Ok(uuid)) => uuid,
            Some(Err(err)) => {
                log::warn!("Descriptor {path} has an invalid UUID: {err}");
                Uuid::nil()
            }
            None => Uuid::nil(),
        };
        Descriptor {
            uuid,
            flags: properties
                .get_str_list(property_bag::FLAGS)
                .map(parse_property_flags)
                .unwrap_or_default(),
            value: properties
                .get_bytes(property_bag::VALUE)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
            path,
        }
    }
}

/// Owns every descriptor of one characteristic, keyed by object path.
///
/// Callers look descriptors up by path; they never keep references past the
/// lifetime of the owning characteristic.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: BTreeMap<ObjectPath, Descriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the descriptor on first sight. Returns `false` if it was already known.
    pub fn upsert(&mut self, path: &ObjectPath, properties: &PropertyBag) -> bool {
        if self.descriptors.contains_key(path) {
            log::debug!("Descriptor {path} already registered");
            return false;
        }
        let descriptor = Descriptor::from_properties(path.clone(), properties);
        log::debug!("Descriptor added {} {}", descriptor.path, descriptor.uuid);
        self.descriptors.insert(path.clone(), descriptor);
        true
    }

    pub fn contains(&self, path: &ObjectPath) -> bool {
        self.descriptors.contains_key(path)
    }

    pub fn get(&self, path: &ObjectPath) -> Option<&Descriptor> {
        self.descriptors.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }
}
