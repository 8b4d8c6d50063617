use std::{env, str::FromStr};
use tokio::{runtime::Builder, task::LocalSet};
use uuid::Uuid;

use bluez_gatt_client::{
    client::BluezTransport,
    gatt::characteristic_event::CharacteristicEvent,
    uuid::ShortUuid,
    CharacteristicClient, ClientConfig,
};

fn main() {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    LocalSet::new().block_on(&runtime, async {
        start_app().await;
    });
}

async fn start_app() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    if let Err(err) = pretty_env_logger::try_init() {
        eprintln!("WARNING: failed to initialize logging framework: {}", err);
    }

    let mut args = env::args().skip(1);
    let (Some(address), Some(char_uuid)) = (args.next(), args.next()) else {
        eprintln!("usage: notify_monitor <device address> <characteristic uuid>");
        return;
    };
    let address = bluer::Address::from_str(&address).expect("Invalid device address");
    let char_uuid = Uuid::from_string(&char_uuid).expect("Invalid characteristic UUID");

    let session = bluer::Session::new().await.unwrap();
    let adapter = session.default_adapter().await.unwrap();
    let device = adapter.device(address).unwrap();
    if !device.is_connected().await.unwrap() {
        device.connect().await.unwrap();
    }

    let mut remote = None;
    for service in device.services().await.unwrap() {
        for characteristic in service.characteristics().await.unwrap() {
            if characteristic.uuid().await.unwrap() == char_uuid {
                remote = Some(characteristic);
            }
        }
    }
    let Some(remote) = remote else {
        log::error!("Characteristic {char_uuid} not found on {address}");
        return;
    };

    let config = ClientConfig::default();
    let (transport_tx, mut transport_rx) = config.transport_channel();
    let (sender_tx, mut receiver_rx) = config.event_channel();

    let transport = BluezTransport::new(remote, transport_tx);
    let properties = transport.properties().await.unwrap();
    let path = transport.path().clone();
    if let Err(err) = transport.discover_descriptors().await {
        log::error!("Error discovering descriptors: {}", err);
    }

    let mut client = CharacteristicClient::new(path, &properties, transport, sender_tx, config);
    log::info!("{}", client.state());

    // Handle Updates
    tokio::spawn(async move {
        while let Some(event) = receiver_rx.recv().await {
            handle_updates(event);
        }
    });

    if client.state().flags().can_read() {
        client.read().unwrap();
    }
    if client.state().flags().can_subscribe() {
        client.start_notifications().unwrap();
    }

    client.run(&mut transport_rx).await;
}

/// Log every update from the characteristic
pub fn handle_updates(update: CharacteristicEvent) {
    match update {
        CharacteristicEvent::ValueChanged { value } => {
            log::info!("ValueChanged: {value:02x?}")
        }
        CharacteristicEvent::NotifyingChanged { notifying } => {
            log::info!("NotifyingChanged: {notifying}")
        }
        CharacteristicEvent::ReadingFinished { value, error } => {
            log::info!("ReadingFinished: {value:02x?} Error: {error:?}")
        }
        CharacteristicEvent::WritingFinished { value, error } => {
            log::info!("WritingFinished: {value:02x?} Error: {error:?}")
        }
        CharacteristicEvent::NotificationsToggled { enabled, error } => {
            log::info!("NotificationsToggled: {enabled} Error: {error:?}")
        }
    }
}
