use super::TransportEvent;
use crate::gatt::characteristic_event::CharacteristicEvent;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Capacity of the transport delivery channel feeding `run`.
    pub transport_capacity: usize,
    /// Announce `ValueChanged` even when a read or push carries the cached value.
    pub emit_unchanged_values: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            transport_capacity: 256,
            emit_unchanged_values: false,
        }
    }
}

impl ClientConfig {
    /// Outward events are unbounded so the owner never blocks on its own consumer.
    pub fn event_channel(
        &self,
    ) -> (
        mpsc::UnboundedSender<CharacteristicEvent>,
        mpsc::UnboundedReceiver<CharacteristicEvent>,
    ) {
        mpsc::unbounded_channel()
    }

    pub fn transport_channel(
        &self,
    ) -> (mpsc::Sender<TransportEvent>, mpsc::Receiver<TransportEvent>) {
        mpsc::channel(self.transport_capacity.max(1))
    }
}
