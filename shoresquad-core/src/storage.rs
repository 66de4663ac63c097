//! Whole-collection JSON persistence on top of a [`KeyValueStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ShoreSquadError;
use crate::ports::{KeyValueStore, PortError};

/// Key holding the joined crew members.
pub const CREW_MEMBERS_KEY: &str = "shorequad_crew_members";
/// Key holding the event participations.
pub const PARTICIPATIONS_KEY: &str = "shorequad_participations";
/// Key holding events created through the form.
pub const EVENTS_KEY: &str = "shorequad_events";
/// Key holding contact form submissions.
pub const CONTACT_MESSAGES_KEY: &str = "shorequad_contact_messages";

/// Read the array stored under `key`.
///
/// Missing keys, unreadable stores, and malformed data all yield an empty
/// collection.
pub fn load_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let bytes = match store.read(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key, error = %err, "store unreadable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<T>>(&bytes) {
        Ok(items) => {
            debug!(key, count = items.len(), "loaded collection");
            items
        }
        Err(err) => {
            warn!(key, error = %err, "ignoring malformed collection");
            Vec::new()
        }
    }
}

/// Replace the array stored under `key` with `items`.
///
/// # Errors
///
/// Returns [`ShoreSquadError::PersistenceUnavailable`] when encoding or writing fails.
pub fn save_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), ShoreSquadError> {
    let bytes = serde_json::to_vec(items).map_err(PortError::from)?;
    store.write(key, &bytes)?;
    debug!(key, count = items.len(), "saved collection");
    Ok(())
}

/// Like [`save_collection`], but failures are only logged.
///
/// In-memory state stays authoritative when the store is unavailable.
pub fn persist_quietly<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    if let Err(err) = save_collection(store, key, items) {
        warn!(key, error = %err, "persistence unavailable, keeping in-memory state");
    }
}
