//! Device location capability.
//!
//! `LocationSource` is the seam between the page and whatever answers
//! "where am I": GeoClue on Linux, the WinRT geolocator on Windows, or a
//! fixed reading for tests and demos.

#[cfg(target_os = "linux")]
mod geoclue;
#[cfg(windows)]
mod winrt;

use std::future::Future;
use std::pin::Pin;

use crate::types::{LocationError, LocationReading, PositionOptions};

/// Boxed future returned by `LocationSource` implementations.
pub type LocationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<LocationReading, LocationError>> + Send + 'a>>;

/// Something that can answer a one-shot position request.
pub trait LocationSource: Send + Sync {
    /// Whether the capability exists on this host at all.
    ///
    /// When this is false callers must not issue a request.
    fn is_supported(&self) -> bool;

    /// Read the current position once.
    fn current_position<'a>(&'a self, options: &'a PositionOptions) -> LocationFuture<'a>;
}

/// Issue a one-shot request, enforcing the configured timeout.
pub async fn locate(
    source: &dyn LocationSource,
    options: &PositionOptions,
) -> Result<LocationReading, LocationError> {
    if !source.is_supported() {
        return Err(LocationError::Unsupported);
    }

    match tokio::time::timeout(options.timeout, source.current_position(options)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::debug!("Location request exceeded {:?}", options.timeout);
            Err(LocationError::Timeout)
        }
    }
}

/// The platform's own location service.
#[derive(Debug, Clone)]
pub struct SystemLocation {
    desktop_id: String,
}

impl SystemLocation {
    /// `desktop_id` identifies the application to the platform service
    /// (GeoClue refuses clients without one).
    pub fn new(desktop_id: impl Into<String>) -> Self {
        Self {
            desktop_id: desktop_id.into(),
        }
    }
}

impl Default for SystemLocation {
    fn default() -> Self {
        Self::new("geoloc")
    }
}

impl LocationSource for SystemLocation {
    fn is_supported(&self) -> bool {
        cfg!(any(target_os = "linux", windows))
    }

    fn current_position<'a>(&'a self, options: &'a PositionOptions) -> LocationFuture<'a> {
        Box::pin(async move {
            #[cfg(target_os = "linux")]
            {
                geoclue::current_position(&self.desktop_id, options).await
            }
            #[cfg(windows)]
            {
                let _ = &self.desktop_id;
                winrt::current_position(options).await
            }
            #[cfg(not(any(target_os = "linux", windows)))]
            {
                let _ = (&self.desktop_id, options);
                Err(LocationError::Unsupported)
            }
        })
    }
}

/// Always answers with the same reading. Used by tests and headless demos.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    reading: LocationReading,
}

impl FixedLocation {
    pub fn new(reading: LocationReading) -> Self {
        Self { reading }
    }
}

impl LocationSource for FixedLocation {
    fn is_supported(&self) -> bool {
        true
    }

    fn current_position<'a>(&'a self, _options: &'a PositionOptions) -> LocationFuture<'a> {
        let reading = self.reading.clone();
        Box::pin(async move { Ok(reading) })
    }
}

/// A host without any location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocation;

impl LocationSource for UnsupportedLocation {
    fn is_supported(&self) -> bool {
        false
    }

    fn current_position<'a>(&'a self, _options: &'a PositionOptions) -> LocationFuture<'a> {
        Box::pin(async { Err(LocationError::Unsupported) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sao_paulo() -> LocationReading {
        LocationReading {
            latitude: -23.55,
            longitude: -46.63,
            accuracy: 15.0,
            altitude: None,
            speed: None,
            heading: None,
            timestamp: 1_700_000_000_000,
        }
    }

    /// Never answers.
    struct StalledLocation;

    impl LocationSource for StalledLocation {
        fn is_supported(&self) -> bool {
            true
        }

        fn current_position<'a>(&'a self, _options: &'a PositionOptions) -> LocationFuture<'a> {
            Box::pin(std::future::pending::<Result<LocationReading, LocationError>>())
        }
    }

    #[tokio::test]
    async fn test_fixed_location_returns_reading() {
        let source = FixedLocation::new(sao_paulo());
        let reading = locate(&source, &PositionOptions::default()).await.unwrap();
        assert_eq!(reading, sao_paulo());
    }

    #[tokio::test]
    async fn test_unsupported_short_circuits() {
        let result = locate(&UnsupportedLocation, &PositionOptions::default()).await;
        assert!(matches!(result, Err(LocationError::Unsupported)));
    }

    #[tokio::test]
    async fn test_timeout_is_enforced() {
        let options = PositionOptions {
            high_accuracy: true,
            timeout: Duration::from_millis(20),
        };
        let result = locate(&StalledLocation, &options).await;
        assert!(matches!(result, Err(LocationError::Timeout)));
    }

    #[tokio::test]
    #[ignore] // Needs a running platform location service
    async fn test_system_location() {
        let result = locate(&SystemLocation::default(), &PositionOptions::default()).await;
        assert!(result.is_ok(), "{:?}", result);
    }
}
