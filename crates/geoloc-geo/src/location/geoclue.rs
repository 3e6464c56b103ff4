//! GeoClue2 client over the system D-Bus.

use std::time::Duration;

use zbus::zvariant::OwnedObjectPath;
use zbus::{proxy, Connection};

use crate::types::{LocationError, LocationReading, PositionOptions};

// GClueAccuracyLevel values
const ACCURACY_CITY: u32 = 4;
const ACCURACY_EXACT: u32 = 8;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// GeoClue reports unknown altitude as -DBL_MAX.
const UNKNOWN_ALTITUDE_FLOOR: f64 = -1.0e300;

#[proxy(
    interface = "org.freedesktop.GeoClue2.Manager",
    default_service = "org.freedesktop.GeoClue2",
    default_path = "/org/freedesktop/GeoClue2/Manager",
    gen_blocking = false
)]
trait Manager {
    fn get_client(&self) -> zbus::Result<OwnedObjectPath>;
}

#[proxy(
    interface = "org.freedesktop.GeoClue2.Client",
    default_service = "org.freedesktop.GeoClue2",
    gen_blocking = false
)]
trait Client {
    fn start(&self) -> zbus::Result<()>;

    fn stop(&self) -> zbus::Result<()>;

    #[zbus(property(emits_changed_signal = "false"))]
    fn location(&self) -> zbus::Result<OwnedObjectPath>;

    #[zbus(property)]
    fn set_desktop_id(&self, id: &str) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_requested_accuracy_level(&self, level: u32) -> zbus::Result<()>;
}

#[proxy(
    interface = "org.freedesktop.GeoClue2.Location",
    default_service = "org.freedesktop.GeoClue2",
    gen_blocking = false
)]
trait Fix {
    #[zbus(property)]
    fn latitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn longitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn accuracy(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn altitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn speed(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn heading(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn timestamp(&self) -> zbus::Result<(u64, u64)>;
}

pub(super) async fn current_position(
    desktop_id: &str,
    options: &PositionOptions,
) -> Result<LocationReading, LocationError> {
    let conn = Connection::system().await.map_err(|e| {
        tracing::debug!("System bus unavailable: {}", e);
        LocationError::Unsupported
    })?;

    let manager = ManagerProxy::new(&conn).await.map_err(dbus_error)?;
    let client_path = manager.get_client().await.map_err(dbus_error)?;
    tracing::debug!("GeoClue client at {}", client_path.as_str());

    let client = ClientProxy::builder(&conn)
        .path(client_path)
        .map_err(dbus_error)?
        .build()
        .await
        .map_err(dbus_error)?;

    client.set_desktop_id(desktop_id).await.map_err(dbus_error)?;
    let level = if options.high_accuracy {
        ACCURACY_EXACT
    } else {
        ACCURACY_CITY
    };
    client
        .set_requested_accuracy_level(level)
        .await
        .map_err(dbus_error)?;
    client.start().await.map_err(dbus_error)?;

    let result = wait_for_fix(&conn, &client).await;

    if let Err(e) = client.stop().await {
        tracing::debug!("Failed to stop GeoClue client: {}", e);
    }

    result
}

/// Poll the client until GeoClue publishes a location object.
async fn wait_for_fix(
    conn: &Connection,
    client: &ClientProxy<'_>,
) -> Result<LocationReading, LocationError> {
    loop {
        let path = client.location().await.map_err(dbus_error)?;
        if path.as_str() != "/" {
            let fix = FixProxy::builder(conn)
                .path(path)
                .map_err(dbus_error)?
                .build()
                .await
                .map_err(dbus_error)?;
            return read_fix(&fix).await;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

async fn read_fix(fix: &FixProxy<'_>) -> Result<LocationReading, LocationError> {
    let latitude = fix.latitude().await.map_err(dbus_error)?;
    let longitude = fix.longitude().await.map_err(dbus_error)?;
    let accuracy = fix.accuracy().await.map_err(dbus_error)?;
    let altitude = fix
        .altitude()
        .await
        .ok()
        .filter(|a| *a > UNKNOWN_ALTITUDE_FLOOR);
    let speed = fix.speed().await.ok().filter(|s| *s >= 0.0);
    let heading = fix.heading().await.ok().filter(|h| *h >= 0.0);
    let (secs, micros) = fix.timestamp().await.map_err(dbus_error)?;

    Ok(LocationReading {
        latitude,
        longitude,
        accuracy,
        altitude,
        speed,
        heading,
        timestamp: secs as i64 * 1000 + micros as i64 / 1000,
    })
}

// Agent and authorization failures come back as D-Bus method errors; the
// error name is the only stable signal.
fn dbus_error(e: zbus::Error) -> LocationError {
    let text = e.to_string();
    if text.contains("AccessDenied") || text.contains("NotAuthorized") {
        LocationError::PermissionDenied
    } else if text.contains("ServiceUnknown") {
        LocationError::Unsupported
    } else {
        LocationError::Unavailable(text)
    }
}
