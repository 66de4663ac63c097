//! Bundle of capability adapters handed to the application context at startup.

use std::sync::Arc;

use crate::ports::{
    Clock, GeolocationPort, KeyValueStore, MapPort, MemoryStore, SystemClock, WeatherPort,
};

/// Every external collaborator the application talks to.
#[derive(Clone)]
pub struct Capabilities {
    /// Persistence for crew data, created events, and contact messages.
    pub store: Arc<dyn KeyValueStore>,
    /// Device position for nearby ranking.
    pub geolocation: Arc<dyn GeolocationPort>,
    /// Current beach conditions.
    pub weather: Arc<dyn WeatherPort>,
    /// Map widget showing cleanup markers.
    pub map: Arc<dyn MapPort>,
    /// Time source for identifiers and date filters.
    pub clock: Arc<dyn Clock>,
}

impl Capabilities {
    /// Bundle the given adapters with an in-memory store and the system clock.
    #[must_use]
    pub fn new(
        geolocation: Arc<dyn GeolocationPort>,
        weather: Arc<dyn WeatherPort>,
        map: Arc<dyn MapPort>,
    ) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            geolocation,
            weather,
            map,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the persistence adapter.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
