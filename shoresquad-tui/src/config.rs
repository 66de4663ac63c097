//! Configuration loading for the terminal front end.
//!
//! Values come from a TOML file when one is given or present in the working
//! directory, otherwise from built-in defaults. `SHORESQUAD_DATA_DIR`
//! overrides the storage directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shoresquad_core::{Coordinate, ServiceSettings, map::MapSettings};
use shoresquad_provider_simulated::SimulatedSettings;

/// File looked up in the working directory when no path is passed.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "shoresquad.toml";
/// Environment variable overriding `storage.data_dir`.
pub(crate) const DATA_DIR_ENV: &str = "SHORESQUAD_DATA_DIR";

/// Highest zoom level the map accepts.
const MAX_ZOOM: u8 = 19;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where crew data is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Map view and loading budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MapConfig {
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    /// Set to false to exercise the "map failed to load" fallback.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
}

/// Simulated device position. Leaving both fields unset denies access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct GeolocationConfig {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WeatherConfig {
    #[serde(default = "default_weather_location")]
    pub location: String,
    #[serde(default = "default_weather_latency_ms")]
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NotificationConfig {
    #[serde(default = "default_display_secs")]
    pub display_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file name inside the data directory.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".shoresquad")
}

fn default_center_latitude() -> f64 {
    33.9425
}

fn default_center_longitude() -> f64 {
    -118.4081
}

fn default_zoom() -> u8 {
    9
}

fn default_true() -> bool {
    true
}

fn default_ready_timeout_secs() -> u64 {
    5
}

fn default_weather_location() -> String {
    "Malibu".to_owned()
}

fn default_weather_latency_ms() -> u64 {
    600
}

fn default_display_secs() -> u64 {
    4
}

fn default_log_level() -> String {
    "shoresquad=info".to_owned()
}

fn default_log_file() -> String {
    "shoresquad.log".to_owned()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            zoom: default_zoom(),
            enabled: true,
            ready_timeout_secs: default_ready_timeout_secs(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            location: default_weather_location(),
            latency_ms: default_weather_latency_ms(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_secs: default_display_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, or defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.storage.data_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.storage.data_dir.as_os_str().is_empty() {
            anyhow::bail!("storage.data_dir cannot be empty");
        }

        if !(-90.0..=90.0).contains(&self.map.center_latitude) {
            anyhow::bail!("map.center_latitude must be within -90..=90");
        }
        if !(-180.0..=180.0).contains(&self.map.center_longitude) {
            anyhow::bail!("map.center_longitude must be within -180..=180");
        }
        if self.map.zoom > MAX_ZOOM {
            anyhow::bail!("map.zoom must be at most {MAX_ZOOM} (got {})", self.map.zoom);
        }
        if self.map.ready_timeout_secs == 0 {
            anyhow::bail!("map.ready_timeout_secs must be > 0");
        }

        match (self.geolocation.latitude, self.geolocation.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    anyhow::bail!("geolocation position is out of range");
                }
            }
            (None, None) => {}
            _ => anyhow::bail!("geolocation latitude and longitude must be set together"),
        }

        if self.weather.location.trim().is_empty() {
            anyhow::bail!("weather.location cannot be empty");
        }
        if self.notifications.display_secs == 0 {
            anyhow::bail!("notifications.display_secs must be > 0");
        }
        if self.logging.file.trim().is_empty() {
            anyhow::bail!("logging.file cannot be empty");
        }

        Ok(())
    }

    pub(crate) fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            map: MapSettings {
                center: Coordinate::new(self.map.center_latitude, self.map.center_longitude),
                zoom: self.map.zoom,
                ready_timeout: Duration::from_secs(self.map.ready_timeout_secs),
            },
            weather_location: self.weather.location.clone(),
        }
    }

    pub(crate) fn simulated_settings(&self) -> SimulatedSettings {
        let position = match (self.geolocation.latitude, self.geolocation.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        };
        SimulatedSettings {
            position,
            map_available: self.map.enabled,
            weather_latency: Duration::from_millis(self.weather.latency_ms),
        }
    }

    pub(crate) fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notifications.display_secs)
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.logging.file)
    }
}
