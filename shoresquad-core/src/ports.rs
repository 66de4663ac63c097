//! Traits describing the capabilities the core relies on, plus shared helper types.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::model::{Coordinate, Marker, WeatherReport};

#[derive(thiserror::Error, Debug)]
/// Errors reported by capability adapters.
pub enum PortError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored data could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The user or platform refused access.
    #[error("Permission denied: {0}")]
    Denied(String),
    /// The capability does not exist in this environment.
    #[error("Not supported")]
    Unsupported,
    /// Internal adapter error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Key-value byte store used for persistence.
///
/// Reads and writes are treated as synchronous local operations.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the bytes stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PortError>;

    /// Replace the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store cannot be written.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), PortError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), PortError>;

    /// Delete every key.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the store cannot be modified.
    fn clear(&self) -> Result<(), PortError>;
}

#[async_trait]
/// Source of the device position.
pub trait GeolocationPort: Send + Sync {
    /// Request the current position once. No automatic retry.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Denied`] or [`PortError::Unsupported`] when no position is available.
    async fn current_position(&self) -> Result<Coordinate, PortError>;
}

#[async_trait]
/// Source of current beach conditions.
pub trait WeatherPort: Send + Sync {
    /// Fetch conditions for a named location.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend fails.
    async fn current(&self, location: &str) -> Result<WeatherReport, PortError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Everything a map widget needs to draw itself.
pub struct MapState {
    /// View centre, set on initialization and moved by `pan_to`.
    pub center: Option<Coordinate>,
    /// Zoom level of the view.
    pub zoom: u8,
    /// Pins in insertion order.
    pub markers: Vec<Marker>,
}

#[async_trait]
/// Interactive map widget.
pub trait MapPort: Send + Sync {
    /// Resolves once the underlying map library is usable. May never resolve.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the library reports a load failure.
    async fn ready(&self) -> Result<(), PortError>;

    /// Centre the view and set the zoom level.
    fn set_view(&self, center: Coordinate, zoom: u8);

    /// Display a marker.
    fn add_marker(&self, marker: Marker);

    /// Move the view centre.
    fn pan_to(&self, center: Coordinate);

    /// Recompute layout after the drawing area changed size.
    fn invalidate_size(&self);

    /// Snapshot of what is currently displayed.
    fn state(&self) -> MapState;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in the user's time zone.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
/// Clock backed by the operating system.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
/// Clock frozen at one instant, for tests and replays.
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Freeze time at `now`; `today` is its UTC calendar day.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

#[derive(Debug, Default)]
/// Volatile store kept entirely in memory.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PortError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), PortError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), PortError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        Ok(())
    }
}
