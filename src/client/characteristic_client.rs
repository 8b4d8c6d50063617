use super::{
    config::ClientConfig,
    pending::{OperationHandle, PendingOperationRegistry},
    CharacteristicTransport, Operation, TransportEvent,
};
use crate::{
    error::{Error, ErrorType},
    gatt::{
        characteristic::CharacteristicState,
        characteristic_event::CharacteristicEvent,
        properties::parse_property_flags,
        property_bag::{self, PropertyBag},
        ObjectPath,
    },
};
use tokio::sync::mpsc::{Receiver, UnboundedSender};

/// Client for a single remote GATT characteristic.
///
/// All methods run on the task that owns the client. Transport deliveries
/// reach it through `handle_transport_event`, usually via `run`. Any number
/// of operations may be outstanding at once and their completions may
/// arrive in any order; each is paired with its own handle.
///
/// Outward events go to an unbounded channel, so handling a delivery never
/// waits on the consumer.
pub struct CharacteristicClient<T: CharacteristicTransport> {
    state: CharacteristicState,
    pending: PendingOperationRegistry,
    transport: T,
    sender_tx: UnboundedSender<CharacteristicEvent>,
    config: ClientConfig,
    closed: bool,
}

impl<T: CharacteristicTransport> CharacteristicClient<T> {
    pub fn new(
        path: ObjectPath,
        properties: &PropertyBag,
        transport: T,
        sender_tx: UnboundedSender<CharacteristicEvent>,
        config: ClientConfig,
    ) -> Self {
        let state = CharacteristicState::from_properties(path, properties);
        log::debug!("Created {state}");
        CharacteristicClient {
            state,
            pending: PendingOperationRegistry::new(),
            transport,
            sender_tx,
            config,
            closed: false,
        }
    }

    pub fn state(&self) -> &CharacteristicState {
        &self.state
    }

    pub fn pending_operations(&self) -> usize {
        self.pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn read(&mut self) -> Result<OperationHandle, Error> {
        self.submit(Operation::Read)
    }

    pub fn write(&mut self, value: Vec<u8>) -> Result<OperationHandle, Error> {
        self.submit(Operation::Write(value))
    }

    /// The notifying flag only follows once the transport confirms.
    pub fn start_notifications(&mut self) -> Result<OperationHandle, Error> {
        self.submit(Operation::StartNotify)
    }

    pub fn stop_notifications(&mut self) -> Result<OperationHandle, Error> {
        self.submit(Operation::StopNotify)
    }

    fn submit(&mut self, operation: Operation) -> Result<OperationHandle, Error> {
        if self.closed {
            return Err(Error::new(
                format!("{} on {}", operation.name(), self.state.path()),
                "client is closed".to_string(),
                ErrorType::TransportUnavailable,
            ));
        }
        let name = operation.name();
        let handle = self.pending.register(operation.clone());
        if let Err(err) = self.transport.submit(handle, operation) {
            let _ = self.pending.resolve(handle);
            log::error!("{name} on {} could not be submitted: {err}", self.state.path());
            return Err(err);
        }
        log::debug!("{name} {handle} submitted on {}", self.state.path());
        Ok(handle)
    }

    /// Drains transport deliveries until the channel closes or the characteristic is removed.
    pub async fn run(&mut self, transport_rx: &mut Receiver<TransportEvent>) {
        while let Some(event) = transport_rx.recv().await {
            self.handle_transport_event(event);
            if self.closed {
                break;
            }
        }
    }

    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        if self.closed {
            log::debug!("Dropping {event:?} for closed {}", self.state.path());
            return;
        }
        match event {
            TransportEvent::Completion { handle, result } => self.on_completion(handle, result),
            TransportEvent::PropertiesChanged {
                changed,
                invalidated,
            } => self.on_push_update(&changed, &invalidated),
            TransportEvent::DescriptorDiscovered { path, properties } => {
                self.on_descriptor_discovered(&path, &properties);
            }
            TransportEvent::Removed => {
                log::debug!("{} removed", self.state.path());
                self.close();
            }
        }
    }

    fn on_completion(&mut self, handle: OperationHandle, result: Result<Vec<u8>, Error>) {
        let operation = match self.pending.resolve(handle) {
            Ok(operation) => operation,
            Err(err) => {
                log::warn!("Ignoring completion on {}: {err}", self.state.path());
                return;
            }
        };

        match (operation, result) {
            (Operation::Read, Ok(value)) => {
                if value.is_empty() {
                    log::debug!(
                        "{}: read {handle} returned no data",
                        ErrorType::AmbiguousEmptyResult
                    );
                }
                self.update_value(value.clone());
                self.emit(CharacteristicEvent::ReadingFinished { value, error: None });
            }
            (Operation::Write(value), Ok(_)) => {
                self.emit(CharacteristicEvent::WritingFinished { value, error: None });
            }
            (Operation::StartNotify, Ok(_)) => self.on_notifications_toggled(true),
            (Operation::StopNotify, Ok(_)) => self.on_notifications_toggled(false),
            (operation, Err(err)) => {
                log::warn!(
                    "{} {handle} on {} failed: {err}",
                    operation.name(),
                    self.state.path()
                );
                let error = Some(err);
                let event = match operation {
                    Operation::Read => CharacteristicEvent::ReadingFinished {
                        value: Vec::new(),
                        error,
                    },
                    Operation::Write(_) => CharacteristicEvent::WritingFinished {
                        value: Vec::new(),
                        error,
                    },
                    Operation::StartNotify => CharacteristicEvent::NotificationsToggled {
                        enabled: true,
                        error,
                    },
                    Operation::StopNotify => CharacteristicEvent::NotificationsToggled {
                        enabled: false,
                        error,
                    },
                };
                self.emit(event);
            }
        }
    }

    fn on_notifications_toggled(&mut self, enabled: bool) {
        self.update_notifying(enabled);
        self.emit(CharacteristicEvent::NotificationsToggled {
            enabled,
            error: None,
        });
    }

    /// Applies an out-of-band property change. Only reported facets are touched.
    pub fn on_push_update(&mut self, changed: &PropertyBag, invalidated: &[String]) {
        if self.closed {
            return;
        }
        if let Some(value) = changed.get_bytes(property_bag::VALUE) {
            self.update_value(value.to_vec());
        }
        if let Some(notifying) = changed.get_bool(property_bag::NOTIFYING) {
            self.update_notifying(notifying);
        }
        if let Some(flags) = changed.get_str_list(property_bag::FLAGS) {
            self.state.set_flags(parse_property_flags(flags));
        }
        if !invalidated.is_empty() {
            log::debug!(
                "{} invalidated {:?}, keeping cached values",
                self.state.path(),
                invalidated
            );
        }
    }

    /// Returns `true` if the descriptor was not known before.
    pub fn on_descriptor_discovered(
        &mut self,
        path: &ObjectPath,
        properties: &PropertyBag,
    ) -> bool {
        if self.closed {
            log::debug!("Ignoring descriptor {path} on closed {}", self.state.path());
            return false;
        }
        self.state.descriptors_mut().upsert(path, properties)
    }

    /// Discards all outstanding operations and releases descriptors.
    ///
    /// Later transport deliveries are dropped.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        let discarded = self.pending.discard_all();
        if discarded > 0 {
            log::debug!(
                "Discarded {discarded} pending operations on {}",
                self.state.path()
            );
        }
        self.state.descriptors_mut().clear();
        self.closed = true;
    }

    fn update_value(&mut self, value: Vec<u8>) {
        let changed = self.state.set_value(value);
        if changed || self.config.emit_unchanged_values {
            let value = self.state.value().to_vec();
            self.emit(CharacteristicEvent::ValueChanged { value });
        }
    }

    fn update_notifying(&mut self, notifying: bool) {
        if self.state.set_notifying(notifying) {
            self.emit(CharacteristicEvent::NotifyingChanged { notifying });
        }
    }

    fn emit(&self, event: CharacteristicEvent) {
        if let Err(err) = self.sender_tx.send(event) {
            log::error!("Error sending characteristic event: {:?}", err);
        }
    }
}

impl<T: CharacteristicTransport> Drop for CharacteristicClient<T> {
    fn drop(&mut self) {
        self.close();
    }
}
