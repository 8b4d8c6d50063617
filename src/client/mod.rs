#[cfg(all(feature = "bluez", target_os = "linux"))]
mod bluez;
#[cfg(all(feature = "bluez", target_os = "linux"))]
pub use self::bluez::BluezTransport;

mod characteristic_client;
mod config;
pub mod pending;

pub use self::characteristic_client::CharacteristicClient;
pub use self::config::ClientConfig;
pub use self::pending::{OperationHandle, PendingOperationRegistry};

use crate::{
    error::Error,
    gatt::{property_bag::PropertyBag, ObjectPath},
};

/// A request against the remote characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write(Vec<u8>),
    StartNotify,
    StopNotify,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Read => "ReadValue",
            Operation::Write(_) => "WriteValue",
            Operation::StartNotify => "StartNotify",
            Operation::StopNotify => "StopNotify",
        }
    }
}

/// Deliveries from the transport, marshaled onto the client's task.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Exactly one per submitted handle. A successful write may carry an empty result.
    Completion {
        handle: OperationHandle,
        result: Result<Vec<u8>, Error>,
    },
    /// Unsolicited change of the backing object's properties.
    PropertiesChanged {
        changed: PropertyBag,
        invalidated: Vec<String>,
    },
    DescriptorDiscovered {
        path: ObjectPath,
        properties: PropertyBag,
    },
    /// The remote characteristic went away.
    Removed,
}

/// Lower layer that carries operations to the remote characteristic.
///
/// `submit` must not block. Its outcome arrives later as a
/// `TransportEvent::Completion` for the same handle; a synchronous error
/// means the operation never left and no completion will follow.
pub trait CharacteristicTransport {
    fn submit(&self, handle: OperationHandle, operation: Operation) -> Result<(), Error>;
}
