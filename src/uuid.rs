use crate::error::{Error, ErrorType};
use uuid::Uuid;

const BASE_UUID_TAIL: &[u8; 8] = b"\x80\x00\x00\x80\x5F\x9B\x34\xFB";

pub trait ShortUuid {
    fn from_short(uuid: u16) -> Uuid;

    fn from_string(uuid_str: &str) -> Result<Uuid, Error>;

    /// Returns the 16-bit assigned number if this UUID lies on the Bluetooth base UUID.
    fn to_short(&self) -> Option<u16>;
}

impl ShortUuid for Uuid {
    fn from_short(uuid: u16) -> Uuid {
        Uuid::from_fields(uuid.into(), 0, 0x1000, BASE_UUID_TAIL)
    }

    fn from_string(uuid_str: &str) -> Result<Uuid, Error> {
        if let Ok(uuid) = Uuid::parse_str(uuid_str) {
            return Ok(uuid);
        }
        let long_uuid_str = match uuid_str.len() {
            4 => format!("0000{}-0000-1000-8000-00805f9b34fb", uuid_str),
            8 => format!("{}-0000-1000-8000-00805f9b34fb", uuid_str),
            _ => uuid_str.to_string(),
        };
        Uuid::parse_str(&long_uuid_str).map_err(|err| {
            Error::new(
                format!("Invalid UUID string: {}", uuid_str),
                err.to_string(),
                ErrorType::InvalidProperty,
            )
        })
    }

    fn to_short(&self) -> Option<u16> {
        let (d1, d2, d3, d4) = self.as_fields();
        if d2 == 0 && d3 == 0x1000 && d4 == BASE_UUID_TAIL && d1 <= u16::MAX as u32 {
            return Some(d1 as u16);
        }
        None
    }
}

/// Well-known name of a GATT characteristic from its assigned number.
pub fn characteristic_name(uuid: &Uuid) -> Option<&'static str> {
    let name = match uuid.to_short()? {
        0x2A00 => "Device Name",
        0x2A01 => "Appearance",
        0x2A04 => "Peripheral Preferred Connection Parameters",
        0x2A05 => "Service Changed",
        0x2A19 => "Battery Level",
        0x2A23 => "System ID",
        0x2A24 => "Model Number String",
        0x2A25 => "Serial Number String",
        0x2A26 => "Firmware Revision String",
        0x2A27 => "Hardware Revision String",
        0x2A28 => "Software Revision String",
        0x2A29 => "Manufacturer Name String",
        0x2A2B => "Current Time",
        0x2A37 => "Heart Rate Measurement",
        0x2A38 => "Body Sensor Location",
        0x2A4D => "Report",
        0x2A50 => "PnP ID",
        0x2A6E => "Temperature",
        0x2A6F => "Humidity",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_forms_agree() {
        let long = Uuid::from_string("00002a19-0000-1000-8000-00805f9b34fb").unwrap();
        assert_eq!(Uuid::from_string("2a19").unwrap(), long);
        assert_eq!(Uuid::from_short(0x2A19), long);
        assert_eq!(long.to_short(), Some(0x2A19));
    }

    #[test]
    fn vendor_uuid_has_no_short_form() {
        let uuid = Uuid::from_string("a92ee200-5501-11e4-916c-0800200c9a66").unwrap();
        assert_eq!(uuid.to_short(), None);
        assert_eq!(characteristic_name(&uuid), None);
    }

    #[test]
    fn malformed_uuid_is_an_error() {
        let err = Uuid::from_string("not-a-uuid").unwrap_err();
        assert_eq!(err.error_type(), &ErrorType::InvalidProperty);
    }

    #[test]
    fn battery_level_is_named() {
        assert_eq!(
            characteristic_name(&Uuid::from_short(0x2A19)),
            Some("Battery Level")
        );
    }
}
