//! Map setup: readiness with a bounded wait, initial view, and cleanup markers.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Capability, ShoreSquadError};
use crate::model::{Coordinate, Event, Marker};
use crate::ports::MapPort;

/// Initial view and readiness budget for the map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    /// View centre on startup.
    pub center: Coordinate,
    /// Zoom level on startup.
    pub zoom: u8,
    /// How long to wait for the map library before giving up.
    pub ready_timeout: Duration,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: Coordinate::new(33.9425, -118.4081),
            zoom: 9,
            ready_timeout: Duration::from_secs(5),
        }
    }
}

/// Wait for the map to become usable, bounded by `timeout`.
///
/// # Errors
///
/// Returns [`ShoreSquadError::CapabilityUnavailable`] when the map reports a
/// failure or is not ready in time.
pub async fn await_ready(map: &dyn MapPort, timeout: Duration) -> Result<(), ShoreSquadError> {
    match tokio::time::timeout(timeout, map.ready()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            warn!(error = %err, "map library failed to initialize");
            Err(ShoreSquadError::unavailable(Capability::Map, &err))
        }
        Err(_elapsed) => {
            warn!(?timeout, "map library failed to load in time");
            Err(ShoreSquadError::timed_out(Capability::Map, timeout))
        }
    }
}

/// Wait for the map, centre it, and add a marker per event.
///
/// # Errors
///
/// Returns [`ShoreSquadError::CapabilityUnavailable`] when the map never becomes ready.
pub async fn initialize(
    map: &dyn MapPort,
    settings: MapSettings,
    events: &[Event],
) -> Result<(), ShoreSquadError> {
    await_ready(map, settings.ready_timeout).await?;
    map.set_view(settings.center, settings.zoom);
    for event in events {
        map.add_marker(Marker::for_event(event));
    }
    debug!(markers = events.len(), "map initialized");
    Ok(())
}
