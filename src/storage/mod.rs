//! Key-value persistence for the session: token, cached address, last order.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub mod file_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

pub const TOKEN_KEY: &str = "token";
pub const ADDRESS_KEY: &str = "address";
pub const LAST_ORDER_KEY: &str = "last_order";

/// Plain string values under string keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Reads a JSON value. Anything unreadable is logged and treated as absent.
pub fn read_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("Failed to read {} from storage due to: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed {} in storage due to: {}", key, e);
            None
        }
    }
}

pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> anyhow::Result<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
