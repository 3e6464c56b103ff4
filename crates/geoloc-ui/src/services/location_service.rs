//! Location backend: one-shot device position reads.
//! The request runs off the UI thread; the result comes back via mpsc.

use std::sync::Arc;

use geoloc_geo::{LocationReading, LocationSource, PositionOptions};

use crate::bridge;

/// Error type for location operations
#[derive(Debug, Clone)]
pub enum LocationError {
    Unsupported,
    Denied,
    Timeout,
    Failed(String),
    NotInitialized,
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Unsupported => write!(f, "Location not supported on this host"),
            LocationError::Denied => write!(f, "Location permission denied"),
            LocationError::Timeout => write!(f, "Location request timed out"),
            LocationError::Failed(s) => write!(f, "Location error: {}", s),
            LocationError::NotInitialized => write!(f, "Location service not initialized"),
        }
    }
}

impl std::error::Error for LocationError {}

impl From<geoloc_geo::LocationError> for LocationError {
    fn from(e: geoloc_geo::LocationError) -> Self {
        match e {
            geoloc_geo::LocationError::Unsupported => LocationError::Unsupported,
            geoloc_geo::LocationError::PermissionDenied => LocationError::Denied,
            geoloc_geo::LocationError::Timeout => LocationError::Timeout,
            geoloc_geo::LocationError::Unavailable(s) => LocationError::Failed(s),
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum LocationServiceMessage {
    /// Result of a position request
    PositionDone(Result<LocationReading, LocationError>),
}

/// Request the current position asynchronously.
/// Sends `PositionDone` on the channel when complete. Overlapping requests
/// are not de-duplicated; each one reports back independently.
pub fn request_position(
    tx: &std::sync::mpsc::Sender<LocationServiceMessage>,
    source: Arc<dyn LocationSource>,
    options: PositionOptions,
) {
    let tx = tx.clone();
    let runtime = match bridge::get_runtime() {
        Some(r) => r,
        None => {
            let _ = tx.send(LocationServiceMessage::PositionDone(Err(
                LocationError::NotInitialized,
            )));
            return;
        }
    };

    runtime.spawn(async move {
        let result = geoloc_geo::locate(source.as_ref(), &options)
            .await
            .map_err(LocationError::from);

        match &result {
            Ok(reading) => tracing::info!(
                "Got location: {}, {} (±{} m)",
                reading.latitude,
                reading.longitude,
                reading.accuracy
            ),
            Err(e) => tracing::warn!("Location request failed: {}", e),
        }

        let _ = tx.send(LocationServiceMessage::PositionDone(result));
    });
}
