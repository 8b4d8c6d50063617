mod bluez_utils;

use super::{CharacteristicTransport, Operation, OperationHandle, TransportEvent};
use crate::{
    error::{Error, ErrorType},
    gatt::{
        property_bag::{self, PropertyBag, PropertyValue},
        ObjectPath,
    },
};
use bluer::gatt::remote::Characteristic;
use bluez_utils::{
    characteristic_path, characteristic_properties, descriptor_path, descriptor_properties,
};
use futures::StreamExt;
use std::sync::Mutex;
use tokio::sync::{mpsc::Sender, oneshot};

/// Carries operations to a remote characteristic through bluetoothd.
///
/// Every submission runs on its own tokio task; results come back on the
/// `TransportEvent` channel handed to `new`. Values pushed while a notify
/// session is open are delivered as `PropertiesChanged`.
pub struct BluezTransport {
    characteristic: Characteristic,
    path: ObjectPath,
    event_tx: Sender<TransportEvent>,
    notify_stop: Mutex<Option<oneshot::Sender<OperationHandle>>>,
}

impl BluezTransport {
    pub fn new(characteristic: Characteristic, event_tx: Sender<TransportEvent>) -> Self {
        let path = characteristic_path(&characteristic);
        BluezTransport {
            characteristic,
            path,
            event_tx,
            notify_stop: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// Current properties of the characteristic, for constructing a client.
    pub async fn properties(&self) -> Result<PropertyBag, Error> {
        characteristic_properties(&self.characteristic).await
    }

    /// Reports every descriptor below the characteristic as discovered.
    pub async fn discover_descriptors(&self) -> Result<usize, Error> {
        let descriptors = self.characteristic.descriptors().await?;
        for descriptor in &descriptors {
            let properties = descriptor_properties(&self.path, descriptor).await?;
            self.event_tx
                .send(TransportEvent::DescriptorDiscovered {
                    path: descriptor_path(&self.path, descriptor),
                    properties,
                })
                .await?;
        }
        log::debug!("{} has {} descriptors", self.path, descriptors.len());
        Ok(descriptors.len())
    }
}

impl CharacteristicTransport for BluezTransport {
    fn submit(&self, handle: OperationHandle, operation: Operation) -> Result<(), Error> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| Error::from_string(err.to_string(), ErrorType::TransportUnavailable))?;
        let characteristic = self.characteristic.clone();
        let event_tx = self.event_tx.clone();
        let mut notify_stop = match self.notify_stop.lock() {
            Ok(n) => n,
            Err(err) => return Err(Error::from_string(err.to_string(), ErrorType::Bluez)),
        };

        match operation {
            Operation::Read => {
                runtime.spawn(async move {
                    let result = characteristic.read().await.map_err(Error::from);
                    complete(&event_tx, handle, result).await;
                });
            }
            Operation::Write(value) => {
                runtime.spawn(async move {
                    let result = characteristic
                        .write(&value)
                        .await
                        .map(|()| Vec::new())
                        .map_err(Error::from);
                    complete(&event_tx, handle, result).await;
                });
            }
            Operation::StartNotify => {
                if notify_stop.as_ref().map_or(false, |tx| !tx.is_closed()) {
                    log::debug!("{} already has a notify session", self.path);
                    runtime.spawn(async move { complete(&event_tx, handle, Ok(Vec::new())).await });
                    return Ok(());
                }
                let (stop_tx, stop_rx) = oneshot::channel();
                *notify_stop = Some(stop_tx);
                runtime.spawn(notify_session(characteristic, event_tx, handle, stop_rx));
            }
            Operation::StopNotify => {
                let unsent = match notify_stop.take() {
                    Some(stop_tx) => stop_tx.send(handle).err(),
                    None => Some(handle),
                };
                if let Some(handle) = unsent {
                    runtime.spawn(async move {
                        let err = Error::from_string(
                            "No notify session started".to_string(),
                            ErrorType::Bluez,
                        );
                        complete(&event_tx, handle, Err(err)).await
                    });
                }
            }
        }
        Ok(())
    }
}

async fn notify_session(
    characteristic: Characteristic,
    event_tx: Sender<TransportEvent>,
    handle: OperationHandle,
    mut stop_rx: oneshot::Receiver<OperationHandle>,
) {
    let stream = match characteristic.notify().await {
        Ok(stream) => stream,
        Err(err) => {
            complete(&event_tx, handle, Err(err.into())).await;
            // A stop queued while the session was opening has nothing left to stop.
            if let Some(stop_handle) = take_queued_stop(&mut stop_rx) {
                complete(&event_tx, stop_handle, Ok(Vec::new())).await;
            }
            return;
        }
    };
    complete(&event_tx, handle, Ok(Vec::new())).await;

    let mut stream = Box::pin(stream);
    let stop_handle = loop {
        tokio::select! {
            value = stream.next() => match value {
                Some(value) => {
                    push(&event_tx, property_bag::VALUE, PropertyValue::Bytes(value)).await
                }
                None => {
                    log::debug!("Notify session ended by remote");
                    push(&event_tx, property_bag::NOTIFYING, PropertyValue::Bool(false)).await;
                    break take_queued_stop(&mut stop_rx);
                }
            },
            stop = &mut stop_rx => break stop.ok(),
        }
    };
    // Dropping the stream releases the session and issues StopNotify.
    drop(stream);
    if let Some(stop_handle) = stop_handle {
        complete(&event_tx, stop_handle, Ok(Vec::new())).await;
    }
}

/// Closes the stop channel and returns a handle that was sent before it closed.
///
/// Once closed, `StopNotify` submissions see the session as gone and fail on their own.
fn take_queued_stop(stop_rx: &mut oneshot::Receiver<OperationHandle>) -> Option<OperationHandle> {
    stop_rx.close();
    stop_rx.try_recv().ok()
}

async fn push(event_tx: &Sender<TransportEvent>, key: &str, value: PropertyValue) {
    let event = TransportEvent::PropertiesChanged {
        changed: PropertyBag::new().with(key, value),
        invalidated: Vec::new(),
    };
    if let Err(err) = event_tx.send(event).await {
        log::error!("Error sending property change: {:?}", err);
    }
}

async fn complete(
    event_tx: &Sender<TransportEvent>,
    handle: OperationHandle,
    result: Result<Vec<u8>, Error>,
) {
    if let Err(err) = event_tx
        .send(TransportEvent::Completion { handle, result })
        .await
    {
        log::error!("Error sending completion for {handle}: {:?}", err);
    }
}
