use std::time::Duration;

use anyhow::Result;
use cxx_qt_lib::{QGuiApplication, QQmlApplicationEngine, QUrl};
use geoloc_core::App;
use geoloc_geo::{Geocoder, LocationReading};
use geoloc_ui::format::format_heading;
use geoloc_ui::{bridge, PageController, PageState};

const MAIN_QML: &str = "qrc:/qt/qml/geoloc_ui/qml/Main.qml";

fn main() -> Result<()> {
    // Initialize core
    geoloc_core::init()?;

    // Create and initialize application
    let mut app = App::new()?;
    app.initialize()?;

    let services = bridge::Services::from_config(app.shared_config())?;
    if !bridge::initialize_services(services) {
        anyhow::bail!("Failed to initialize location services");
    }

    tracing::info!("Geoloc started");

    if std::env::args().any(|arg| arg == "--headless") {
        run_headless(&app)?;
    } else {
        run_window();
    }

    // Graceful shutdown
    app.shutdown()?;

    Ok(())
}

fn run_window() {
    let mut gui = QGuiApplication::new();
    let mut engine = QQmlApplicationEngine::new();

    if let Some(engine) = engine.as_mut() {
        engine.load(&QUrl::from(MAIN_QML));
    }

    if let Some(gui) = gui.as_mut() {
        gui.exec();
    }
}

/// One location request printed to the terminal.
fn run_headless(app: &App) -> Result<()> {
    let services = bridge::get_services()
        .ok_or_else(|| anyhow::anyhow!("Location services not available"))?;
    let mut page = PageController::from_services(&services);

    println!("Geolocalização");
    println!("{}...", page.cta_label());

    page.request_location();
    if page.is_loading() {
        let wait = Duration::from_millis(app.config().location.timeout_ms) + Duration::from_secs(1);
        if !page.wait_for_location(wait) {
            tracing::warn!("No location response within {:?}", wait);
        }
    }

    match page.state().clone() {
        PageState::Ready(reading) => {
            for card in page.info_cards() {
                println!("  {:<12} {}", card.label, card.value);
            }
            println!("  {:<12} {}", "Direção", format_heading(reading.heading));

            if let Some(place) = place_name(app, &reading) {
                println!("\n  {}", place);
            }
        }
        PageState::Failed(message) => println!("{}", message),
        PageState::Initial | PageState::Loading { .. } => {
            println!("{}", geoloc_core::MSG_LOCATION_FAILED);
        }
    }

    Ok(())
}

/// Best-effort reverse lookup of the place name for the reading.
fn place_name(app: &App, reading: &LocationReading) -> Option<String> {
    let config = &app.config().geocoding;
    let geocoder = match Geocoder::new(&config.base_url, &config.user_agent) {
        Ok(g) => g,
        Err(e) => {
            tracing::debug!("Reverse geocoder unavailable: {}", e);
            return None;
        }
    };
    let runtime = bridge::get_runtime()?;
    runtime.block_on(geocoder.reverse(reading.coordinate()))
}
