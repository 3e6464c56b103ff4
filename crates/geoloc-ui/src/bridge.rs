use std::sync::{Arc, OnceLock};
use std::time::Duration;

use geoloc_core::Config;
use geoloc_geo::{Geocoder, LocationSource, PositionOptions, SearchBackend, SystemLocation};

use crate::page::MapSettings;

// Static tokio runtime that lives for the duration of the application
static RUNTIME: OnceLock<Option<tokio::runtime::Runtime>> = OnceLock::new();

// Location and geocoding services shared by every model
static SERVICES: OnceLock<Services> = OnceLock::new();

/// Everything a page needs to talk to the outside world.
#[derive(Clone)]
pub struct Services {
    pub config: Arc<Config>,
    pub location: Arc<dyn LocationSource>,
    pub search: Arc<dyn SearchBackend>,
}

impl Services {
    /// Build services from configuration, using the platform location source.
    pub fn from_config(config: Arc<Config>) -> Result<Self, geoloc_geo::GeocodeError> {
        let geocoder = Geocoder::new(&config.geocoding.base_url, &config.geocoding.user_agent)?;
        Ok(Self {
            config,
            location: Arc::new(SystemLocation::default()),
            search: Arc::new(geocoder),
        })
    }

    pub fn position_options(&self) -> PositionOptions {
        position_options(&self.config)
    }

    pub fn map_settings(&self) -> MapSettings {
        map_settings(&self.config)
    }
}

/// Initialize the tokio runtime (once) and return a handle to it
fn get_or_init_runtime() -> Option<tokio::runtime::Handle> {
    RUNTIME
        .get_or_init(|| {
            match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .thread_name("geoloc-tokio")
                .build()
            {
                Ok(rt) => Some(rt),
                Err(e) => {
                    tracing::error!("Failed to create tokio runtime: {}", e);
                    None
                }
            }
        })
        .as_ref()
        .map(|rt| rt.handle().clone())
}

/// Runtime handle for background services, created on first use
pub fn get_runtime() -> Option<tokio::runtime::Handle> {
    get_or_init_runtime()
}

/// Install the tracing subscriber if the host has not done so already
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Initialize location and search services.
/// Must be called before QML creates the first model.
pub fn initialize_services(services: Services) -> bool {
    init_tracing();

    if get_or_init_runtime().is_none() {
        return false;
    }

    if SERVICES.set(services).is_err() {
        tracing::warn!("Services already initialized");
        return false;
    }

    tracing::info!("Location services initialized successfully");
    true
}

/// Get the initialized services
pub fn get_services() -> Option<Services> {
    SERVICES.get().cloned()
}

/// Location request options from configuration
pub fn position_options(config: &Config) -> PositionOptions {
    PositionOptions {
        high_accuracy: config.location.high_accuracy,
        timeout: Duration::from_millis(config.location.timeout_ms),
    }
}

/// Map view settings from configuration
pub fn map_settings(config: &Config) -> MapSettings {
    MapSettings {
        tile_url: config.map.tile_url.clone(),
        attribution: config.map.attribution.clone(),
        initial_zoom: f64::from(config.map.initial_zoom),
        fly_to_zoom: f64::from(config.map.fly_to_zoom),
        fly_to_duration: Duration::from_secs_f64(config.map.fly_to_seconds.max(0.0)),
        click_radius_m: config.map.click_radius_m,
    }
}
