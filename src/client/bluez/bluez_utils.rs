use crate::error::{self, Error, ErrorType};
use crate::gatt::{
    property_bag::{self, PropertyBag, PropertyValue},
    ObjectPath,
};
use bluer::gatt::{
    remote::{Characteristic, Descriptor},
    CharacteristicFlags,
};

impl From<bluer::Error> for error::Error {
    fn from(error: bluer::Error) -> Self {
        Error::from_string(error.to_string(), ErrorType::Bluez)
    }
}

fn device_path(adapter_name: &str, address: bluer::Address) -> String {
    format!(
        "/org/bluez/{}/dev_{}",
        adapter_name,
        address.to_string().replace(':', "_")
    )
}

pub(crate) fn characteristic_path(characteristic: &Characteristic) -> ObjectPath {
    ObjectPath::from(format!(
        "{}/service{:04x}/char{:04x}",
        device_path(characteristic.adapter_name(), characteristic.device_address()),
        characteristic.service_id(),
        characteristic.id()
    ))
}

pub(crate) fn descriptor_path(characteristic: &ObjectPath, descriptor: &Descriptor) -> ObjectPath {
    ObjectPath::from(format!("{}/desc{:04x}", characteristic, descriptor.id()))
}

/// BlueZ tokens for the capability bits the client tracks.
///
/// `extended-properties` and `authorize` have no bit in the client's flag set and are left out.
pub(crate) fn flag_tokens(flags: &CharacteristicFlags) -> Vec<String> {
    let table = [
        (flags.broadcast, "broadcast"),
        (flags.read, "read"),
        (flags.write_without_response, "write-without-response"),
        (flags.write, "write"),
        (flags.notify, "notify"),
        (flags.indicate, "indicate"),
        (flags.authenticated_signed_writes, "authenticated-signed-writes"),
        (flags.reliable_write, "reliable-write"),
        (flags.writable_auxiliaries, "writable-auxiliaries"),
        (flags.encrypt_read, "encrypt-read"),
        (flags.encrypt_write, "encrypt-write"),
        (flags.encrypt_authenticated_read, "encrypt-authenticated-read"),
        (flags.encrypt_authenticated_write, "encrypt-authenticated-write"),
        (flags.secure_read, "secure-read"),
        (flags.secure_write, "secure-write"),
    ];
    table
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, token)| token.to_string())
        .collect()
}

pub(crate) async fn characteristic_properties(
    characteristic: &Characteristic,
) -> Result<PropertyBag, Error> {
    let mut bag = PropertyBag::new()
        .with(
            property_bag::UUID,
            PropertyValue::Str(characteristic.uuid().await?.to_string()),
        )
        .with(
            property_bag::FLAGS,
            PropertyValue::StrList(flag_tokens(&characteristic.flags().await?)),
        )
        .with(
            property_bag::VALUE,
            PropertyValue::Bytes(characteristic.cached_value().await?),
        );
    if let Some(notifying) = characteristic.notifying().await? {
        bag.insert(property_bag::NOTIFYING, PropertyValue::Bool(notifying));
    }
    Ok(bag)
}

pub(crate) async fn descriptor_properties(
    characteristic: &ObjectPath,
    descriptor: &Descriptor,
) -> Result<PropertyBag, Error> {
    Ok(PropertyBag::new()
        .with(
            property_bag::UUID,
            PropertyValue::Str(descriptor.uuid().await?.to_string()),
        )
        .with(
            property_bag::VALUE,
            PropertyValue::Bytes(descriptor.cached_value().await?),
        )
        .with(
            property_bag::CHARACTERISTIC,
            PropertyValue::Path(characteristic.clone()),
        ))
}
