//! Simulated capability adapters: fixed weather, configured geolocation, and an in-process map.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use shoresquad_core::{
    capabilities::Capabilities,
    model::{Coordinate, Marker, WeatherReport},
    ports::{GeolocationPort, MapPort, MapState, PortError, WeatherPort},
};

/// Latency applied before simulated weather is returned.
pub const DEFAULT_WEATHER_LATENCY: Duration = Duration::from_millis(600);

/// Weather source that always reports a sunny beach day.
pub struct SimulatedWeather {
    latency: Duration,
}

impl SimulatedWeather {
    /// Create a source that answers after `latency`.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedWeather {
    fn default() -> Self {
        Self::new(DEFAULT_WEATHER_LATENCY)
    }
}

#[async_trait]
impl WeatherPort for SimulatedWeather {
    async fn current(&self, location: &str) -> Result<WeatherReport, PortError> {
        tokio::time::sleep(self.latency).await;
        debug!(location, "returning simulated weather");
        Ok(WeatherReport {
            temperature_c: 22,
            condition: String::from("Sunny"),
            humidity_pct: 65,
            wind_speed_knots: 12,
        })
    }
}

/// Geolocation that reports a configured position, or denies access when none is set.
pub struct FixedGeolocation {
    position: Option<Coordinate>,
}

impl FixedGeolocation {
    /// Always report `position`.
    #[must_use]
    pub fn at(position: Coordinate) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Behave like a user who declined the location prompt.
    #[must_use]
    pub fn denied() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl GeolocationPort for FixedGeolocation {
    async fn current_position(&self) -> Result<Coordinate, PortError> {
        self.position
            .ok_or_else(|| PortError::Denied("location access was not granted".into()))
    }
}

/// Map that keeps its state in memory for a renderer to draw.
pub struct SimulatedMap {
    loads: bool,
    state: Mutex<MapState>,
}

impl SimulatedMap {
    /// A map whose library is available immediately.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loads: true,
            state: Mutex::new(MapState::default()),
        }
    }

    /// A map whose library never finishes loading.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            loads: false,
            state: Mutex::new(MapState::default()),
        }
    }

    fn with_state<R>(&self, update: impl FnOnce(&mut MapState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut state)
    }
}

impl Default for SimulatedMap {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MapPort for SimulatedMap {
    async fn ready(&self) -> Result<(), PortError> {
        if self.loads {
            Ok(())
        } else {
            std::future::pending().await
        }
    }

    fn set_view(&self, center: Coordinate, zoom: u8) {
        self.with_state(|state| {
            state.center = Some(center);
            state.zoom = zoom;
        });
    }

    fn add_marker(&self, marker: Marker) {
        self.with_state(|state| state.markers.push(marker));
    }

    fn pan_to(&self, center: Coordinate) {
        self.with_state(|state| state.center = Some(center));
    }

    fn invalidate_size(&self) {
        debug!("map size invalidated");
    }

    fn state(&self) -> MapState {
        self.with_state(|state| state.clone())
    }
}

/// Settings for the simulated capability bundle.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSettings {
    /// Position reported by geolocation; `None` denies access.
    pub position: Option<Coordinate>,
    /// Whether the map library loads.
    pub map_available: bool,
    /// Delay before weather is returned.
    pub weather_latency: Duration,
}

impl Default for SimulatedSettings {
    fn default() -> Self {
        Self {
            position: None,
            map_available: true,
            weather_latency: DEFAULT_WEATHER_LATENCY,
        }
    }
}

/// Build a capability bundle backed entirely by simulated adapters.
#[must_use]
pub fn capabilities(settings: SimulatedSettings) -> Capabilities {
    let geolocation = Arc::new(match settings.position {
        Some(position) => FixedGeolocation::at(position),
        None => FixedGeolocation::denied(),
    });
    let weather = Arc::new(SimulatedWeather::new(settings.weather_latency));
    let map = Arc::new(if settings.map_available {
        SimulatedMap::new()
    } else {
        SimulatedMap::unavailable()
    });

    Capabilities::new(geolocation, weather, map)
}
