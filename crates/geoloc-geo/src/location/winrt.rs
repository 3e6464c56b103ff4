//! Windows.Devices.Geolocation backend.

use windows::Devices::Geolocation::{GeolocationAccessStatus, Geolocator, PositionAccuracy};

use crate::types::{LocationError, LocationReading, PositionOptions};

/// 100ns ticks between 1601-01-01 and 1970-01-01.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;

pub(super) async fn current_position(
    options: &PositionOptions,
) -> Result<LocationReading, LocationError> {
    let high_accuracy = options.high_accuracy;
    // The WinRT async operations are awaited with blocking `get()`.
    tokio::task::spawn_blocking(move || read_position(high_accuracy))
        .await
        .map_err(|e| LocationError::Unavailable(e.to_string()))?
}

fn read_position(high_accuracy: bool) -> Result<LocationReading, LocationError> {
    let access = Geolocator::RequestAccessAsync()
        .and_then(|op| op.get())
        .map_err(winrt_error)?;
    if access != GeolocationAccessStatus::Allowed {
        return Err(LocationError::PermissionDenied);
    }

    let locator = Geolocator::new().map_err(winrt_error)?;
    locator
        .SetDesiredAccuracy(if high_accuracy {
            PositionAccuracy::High
        } else {
            PositionAccuracy::Default
        })
        .map_err(winrt_error)?;

    let position = locator
        .GetGeopositionAsync()
        .and_then(|op| op.get())
        .map_err(winrt_error)?;
    let coordinate = position.Coordinate().map_err(winrt_error)?;
    let point = coordinate
        .Point()
        .and_then(|p| p.Position())
        .map_err(winrt_error)?;
    let accuracy = coordinate.Accuracy().map_err(winrt_error)?;

    // Altitude is only meaningful when the device reports its accuracy.
    let altitude = coordinate
        .AltitudeAccuracy()
        .and_then(|r| r.Value())
        .ok()
        .map(|_| point.Altitude);
    let speed = coordinate.Speed().and_then(|r| r.Value()).ok();
    let heading = coordinate.Heading().and_then(|r| r.Value()).ok();
    let ticks = coordinate
        .Timestamp()
        .map_err(winrt_error)?
        .UniversalTime;

    Ok(LocationReading {
        latitude: point.Latitude,
        longitude: point.Longitude,
        accuracy,
        altitude,
        speed,
        heading,
        timestamp: (ticks - UNIX_EPOCH_TICKS) / 10_000,
    })
}

fn winrt_error(e: windows::core::Error) -> LocationError {
    LocationError::Unavailable(e.message().to_string())
}
