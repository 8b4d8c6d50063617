use super::{
    descriptor::{Descriptor, DescriptorRegistry},
    properties::{parse_property_flags, CharacteristicFlags},
    property_bag::{self, PropertyBag},
    ObjectPath,
};
use crate::uuid::{characteristic_name, ShortUuid};
use std::fmt;
use uuid::Uuid;

/// Cached observable state of one remote characteristic.
///
/// Only the owning client mutates it; every setter reports whether the
/// field actually changed so the client can decide what to announce.
#[derive(Debug)]
pub struct CharacteristicState {
    path: ObjectPath,
    uuid: Uuid,
    name: String,
    flags: CharacteristicFlags,
    notifying: bool,
    value: Vec<u8>,
    descriptors: DescriptorRegistry,
}

impl CharacteristicState {
    pub fn from_properties(path: ObjectPath, properties: &PropertyBag) -> Self {
        let uuid = match properties.get_str(property_bag::UUID).map(Uuid::from_string) {
            Some(Ok(uuid)) => uuid,
            Some(Err(err)) => {
                log::warn!("Characteristic {path} has an invalid UUID: {err}");
                Uuid::nil()
            }
            None => {
                log::warn!("Characteristic {path} reported no UUID");
                Uuid::nil()
            }
        };
        let name = match properties.get_str(property_bag::NAME) {
            Some(name) => name.to_string(),
            None => characteristic_name(&uuid)
                .map(str::to_string)
                .unwrap_or_else(|| uuid.to_string()),
        };

        CharacteristicState {
            path,
            uuid,
            name,
            flags: properties
                .get_str_list(property_bag::FLAGS)
                .map(parse_property_flags)
                .unwrap_or_default(),
            notifying: properties
                .get_bool(property_bag::NOTIFYING)
                .unwrap_or(false),
            value: properties
                .get_bytes(property_bag::VALUE)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
            descriptors: DescriptorRegistry::new(),
        }
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> CharacteristicFlags {
        self.flags
    }

    pub fn notifying(&self) -> bool {
        self.notifying
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    pub fn descriptor(&self, path: &ObjectPath) -> Option<&Descriptor> {
        self.descriptors.get(path)
    }

    pub fn has_descriptor(&self, path: &ObjectPath) -> bool {
        self.descriptors.contains(path)
    }

    pub(crate) fn set_value(&mut self, value: Vec<u8>) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    pub(crate) fn set_notifying(&mut self, notifying: bool) -> bool {
        if self.notifying == notifying {
            return false;
        }
        self.notifying = notifying;
        true
    }

    pub(crate) fn set_flags(&mut self, flags: CharacteristicFlags) {
        self.flags = flags;
    }

    pub(crate) fn descriptors_mut(&mut self) -> &mut DescriptorRegistry {
        &mut self.descriptors
    }
}

impl fmt::Display for CharacteristicState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Characteristic({}, {}, notifying: {}, {})",
            self.name, self.uuid, self.notifying, self.flags
        )
    }
}
