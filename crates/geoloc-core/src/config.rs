use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, ConfigError};

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Device location request settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Geocoding search settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Map rendering settings
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Ask the device for its most precise fix
    pub high_accuracy: bool,

    /// Give up on a location request after this many milliseconds
    pub timeout_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Base URL of a Nominatim-compatible service
    pub base_url: String,

    /// Maximum number of search candidates requested
    pub result_limit: u32,

    /// User-Agent sent with every request (Nominatim usage policy requires one)
    pub user_agent: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            result_limit: 5,
            user_agent: concat!("Geoloc/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tile server URL with `%z`, `%x` and `%y` placeholders, handed to the
    /// QtLocation OSM plugin as its custom host
    pub tile_url: String,

    /// Attribution text shown in the map corner
    pub attribution: String,

    /// Zoom level the map opens at
    pub initial_zoom: u8,

    /// Zoom level the camera flies to when its target changes
    pub fly_to_zoom: u8,

    /// Fly-to animation length in seconds
    pub fly_to_seconds: f64,

    /// Radius of the circle drawn around a clicked point, in meters
    pub click_radius_m: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: "https://a.basemaps.cartocdn.com/dark_all/%z/%x/%y.png".to_string(),
            attribution: "© CARTO".to_string(),
            initial_zoom: 13,
            fly_to_zoom: 14,
            fly_to_seconds: 2.0,
            click_radius_m: 50.0,
        }
    }
}

/// Highest zoom level the tile service serves.
pub const MAX_ZOOM: u8 = 19;

impl Config {
    /// Load configuration from the user config directory.
    ///
    /// A missing file is not an error: defaults are returned and nothing is
    /// written to disk.
    pub fn load() -> Result<Self, AppError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from an explicit path, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult), AppError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.location.timeout_ms == 0 {
            result.add_error("location.timeout_ms", "Timeout must be greater than 0");
        } else if self.location.timeout_ms > 120_000 {
            result.add_warning(
                "location.timeout_ms",
                "Location timeout is longer than two minutes",
            );
        }

        self.validate_url(&self.geocoding.base_url, "geocoding.base_url", &mut result);

        if self.geocoding.result_limit == 0 {
            result.add_error("geocoding.result_limit", "Result limit must be greater than 0");
        } else if self.geocoding.result_limit > 50 {
            result.add_warning(
                "geocoding.result_limit",
                "Nominatim caps search results at 50",
            );
        }

        if self.geocoding.user_agent.trim().is_empty() {
            result.add_error("geocoding.user_agent", "User-Agent must not be empty");
        }

        self.validate_url(&self.map.tile_url, "map.tile_url", &mut result);
        if !["%z", "%x", "%y"]
            .iter()
            .all(|placeholder| self.map.tile_url.contains(placeholder))
        {
            result.add_error(
                "map.tile_url",
                "Tile URL must contain %z, %x and %y placeholders",
            );
        }

        for (field, zoom) in [
            ("map.initial_zoom", self.map.initial_zoom),
            ("map.fly_to_zoom", self.map.fly_to_zoom),
        ] {
            if zoom > MAX_ZOOM {
                result.add_error(field, format!("Zoom must be between 0 and {}", MAX_ZOOM));
            }
        }

        if !(self.map.fly_to_seconds.is_finite() && self.map.fly_to_seconds >= 0.0) {
            result.add_error("map.fly_to_seconds", "Duration must be a non-negative number");
        }

        if !(self.map.click_radius_m.is_finite() && self.map.click_radius_m > 0.0) {
            result.add_error("map.click_radius_m", "Radius must be a positive number");
        }

        if self.map.attribution.trim().is_empty() {
            result.add_warning("map.attribution", "Tile attribution is empty");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geoloc").join("config.toml"))
    }
}
