pub mod client;
pub mod error;
pub mod gatt;
pub mod uuid;

pub use self::client::{CharacteristicClient, CharacteristicTransport, ClientConfig};
