#![allow(dead_code)]

use std::future::Future;

use bluez_gatt_client::{
    client::{CharacteristicTransport, Operation, OperationHandle},
    error::{Error, ErrorType},
    gatt::{
        property_bag::{self, PropertyBag, PropertyValue},
        ObjectPath,
    },
};
use tokio::{
    runtime::Builder,
    sync::mpsc::{self, unbounded_channel, UnboundedReceiver},
    task::LocalSet,
};

pub const CHAR_PATH: &str = "/org/bluez/hci0/dev_C4_7C_8D_6A_3E_11/service0010/char0011";

pub fn start_test(f: impl Future<Output = ()>) {
    let _ = pretty_env_logger::formatted_builder().is_test(true).try_init();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");
    LocalSet::new().block_on(&runtime, f);
}

/// Routes submissions into a channel so the test can complete them in any order.
pub struct MockTransport {
    submitted: mpsc::UnboundedSender<(OperationHandle, Operation)>,
    online: bool,
}

impl MockTransport {
    pub fn new() -> (Self, UnboundedReceiver<(OperationHandle, Operation)>) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                submitted: tx,
                online: true,
            },
            rx,
        )
    }

    pub fn offline() -> Self {
        let (tx, _) = unbounded_channel();
        Self {
            submitted: tx,
            online: false,
        }
    }
}

impl CharacteristicTransport for MockTransport {
    fn submit(&self, handle: OperationHandle, operation: Operation) -> Result<(), Error> {
        if !self.online {
            return Err(Error::from_string(
                "org.bluez.Error.NotConnected".to_string(),
                ErrorType::TransportUnavailable,
            ));
        }
        self.submitted.send((handle, operation)).unwrap();
        Ok(())
    }
}

pub fn characteristic_properties(flags: &[&str]) -> PropertyBag {
    PropertyBag::new()
        .with(
            property_bag::UUID,
            PropertyValue::Str("a92ee202-5501-11e4-916c-0800200c9a66".into()),
        )
        .with(property_bag::NAME, PropertyValue::Str("Keyturner Data".into()))
        .with(
            property_bag::FLAGS,
            PropertyValue::StrList(flags.iter().map(|f| f.to_string()).collect()),
        )
        .with(property_bag::VALUE, PropertyValue::Bytes(Vec::new()))
        .with(property_bag::NOTIFYING, PropertyValue::Bool(false))
}

pub fn descriptor_properties(uuid: &str) -> PropertyBag {
    PropertyBag::new()
        .with(property_bag::UUID, PropertyValue::Str(uuid.into()))
        .with(
            property_bag::CHARACTERISTIC,
            PropertyValue::Path(ObjectPath::from(CHAR_PATH)),
        )
        .with(property_bag::VALUE, PropertyValue::Bytes(vec![0x00, 0x00]))
}
