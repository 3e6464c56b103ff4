//! Map model for QML.
//!
//! Holds the marker and camera state of `MapView`; the QtLocation `Map` in
//! QML draws the tiles and plays every `fly_to` it is told about.

use core::pin::Pin;

use cxx_qt::CxxQtType;
use cxx_qt_lib::QString;
use geoloc_core::Config;
use geoloc_geo::Coordinate;

use crate::bridge;
use crate::page::{FlyTo, MapSettings, MapView, POPUP_CURRENT_POSITION, POPUP_SEARCHED_LOCATION};

#[cxx_qt::bridge]
pub mod qobject {
    unsafe extern "C++" {
        include!("cxx-qt-lib/qstring.h");
        type QString = cxx_qt_lib::QString;
    }

    extern "RustQt" {
        #[qobject]
        #[qml_element]
        #[qproperty(bool, has_position)]
        #[qproperty(f64, latitude)]
        #[qproperty(f64, longitude)]
        #[qproperty(bool, has_accuracy)]
        #[qproperty(f64, accuracy_radius)]
        #[qproperty(QString, current_popup)]
        // Click marker
        #[qproperty(bool, has_click)]
        #[qproperty(f64, click_latitude)]
        #[qproperty(f64, click_longitude)]
        #[qproperty(f64, click_radius)]
        #[qproperty(QString, click_popup)]
        // Search marker
        #[qproperty(bool, has_search)]
        #[qproperty(f64, search_latitude)]
        #[qproperty(f64, search_longitude)]
        #[qproperty(QString, search_popup)]
        // Tiles and camera
        #[qproperty(QString, tile_url)]
        #[qproperty(QString, attribution)]
        #[qproperty(f64, initial_zoom)]
        type MapModel = super::MapModelRust;

        #[qinvokable]
        fn set_position(self: Pin<&mut MapModel>, latitude: f64, longitude: f64, accuracy: f64);

        #[qinvokable]
        fn click(self: Pin<&mut MapModel>, latitude: f64, longitude: f64);

        #[qinvokable]
        fn show_search_result(self: Pin<&mut MapModel>, latitude: f64, longitude: f64);

        #[qsignal]
        fn fly_to(
            self: Pin<&mut MapModel>,
            latitude: f64,
            longitude: f64,
            zoom: f64,
            duration_ms: i32,
        );
    }
}

pub struct MapModelRust {
    has_position: bool,
    latitude: f64,
    longitude: f64,
    has_accuracy: bool,
    accuracy_radius: f64,
    current_popup: QString,
    has_click: bool,
    click_latitude: f64,
    click_longitude: f64,
    click_radius: f64,
    click_popup: QString,
    has_search: bool,
    search_latitude: f64,
    search_longitude: f64,
    search_popup: QString,
    tile_url: QString,
    attribution: QString,
    initial_zoom: f64,
    // Internal state
    view: Option<MapView>,
}

impl Default for MapModelRust {
    fn default() -> Self {
        Self {
            has_position: false,
            latitude: 0.0,
            longitude: 0.0,
            has_accuracy: false,
            accuracy_radius: 0.0,
            current_popup: QString::from(POPUP_CURRENT_POSITION),
            has_click: false,
            click_latitude: 0.0,
            click_longitude: 0.0,
            click_radius: 0.0,
            click_popup: QString::default(),
            has_search: false,
            search_latitude: 0.0,
            search_longitude: 0.0,
            search_popup: QString::from(POPUP_SEARCHED_LOCATION),
            tile_url: QString::default(),
            attribution: QString::default(),
            initial_zoom: 0.0,
            view: None,
        }
    }
}

fn settings() -> MapSettings {
    match bridge::get_services() {
        Some(services) => services.map_settings(),
        None => {
            tracing::warn!("MapModel using default map settings - global services not ready");
            bridge::map_settings(&Config::default())
        }
    }
}

impl qobject::MapModel {
    /// New authoritative position from the page. The first one opens the map.
    pub fn set_position(mut self: Pin<&mut Self>, latitude: f64, longitude: f64, accuracy: f64) {
        let position = Coordinate::new(latitude, longitude);
        if !position.is_valid() {
            tracing::warn!("Ignoring invalid position {}", position);
            return;
        }

        let flight = if self.rust().view.is_some() {
            self.as_mut()
                .rust_mut()
                .view
                .as_mut()
                .and_then(|view| view.set_position(position, Some(accuracy)))
        } else {
            let settings = settings();
            self.as_mut().set_tile_url(QString::from(settings.tile_url.as_str()));
            self.as_mut()
                .set_attribution(QString::from(settings.attribution.as_str()));
            self.as_mut().set_initial_zoom(settings.initial_zoom);
            self.as_mut().set_click_radius(settings.click_radius_m);

            let view = MapView::new(position, Some(accuracy), settings);
            let opening = view.opening_flight();
            self.as_mut().rust_mut().view = Some(view);
            Some(opening)
        };

        self.as_mut().set_latitude(latitude);
        self.as_mut().set_longitude(longitude);
        let radius = self.rust().view.as_ref().and_then(MapView::accuracy_radius);
        self.as_mut().set_has_accuracy(radius.is_some());
        self.as_mut().set_accuracy_radius(radius.unwrap_or(0.0));
        self.as_mut().set_has_position(true);

        if let Some(flight) = flight {
            self.emit_flight(flight);
        }
    }

    /// Drop a marker where the user clicked. The camera stays put.
    pub fn click(mut self: Pin<&mut Self>, latitude: f64, longitude: f64) {
        let at = Coordinate::new(latitude, longitude);
        if !at.is_valid() {
            return;
        }

        let popup = match self.as_mut().rust_mut().view.as_mut() {
            Some(view) => {
                view.click(at);
                view.click_popup().unwrap_or_default()
            }
            None => return,
        };

        self.as_mut().set_click_latitude(latitude);
        self.as_mut().set_click_longitude(longitude);
        self.as_mut().set_click_popup(QString::from(popup.as_str()));
        self.as_mut().set_has_click(true);
    }

    /// Mark a picked search result and fly there.
    pub fn show_search_result(mut self: Pin<&mut Self>, latitude: f64, longitude: f64) {
        let at = Coordinate::new(latitude, longitude);
        if !at.is_valid() {
            tracing::warn!("Ignoring invalid search result {}", at);
            return;
        }

        let flight = match self.as_mut().rust_mut().view.as_mut() {
            Some(view) => view.show_search_result(at),
            None => return,
        };

        self.as_mut().set_has_click(false);
        self.as_mut().set_search_latitude(latitude);
        self.as_mut().set_search_longitude(longitude);
        self.as_mut().set_has_search(true);

        if let Some(flight) = flight {
            self.emit_flight(flight);
        }
    }

    fn emit_flight(self: Pin<&mut Self>, flight: FlyTo) {
        let duration_ms = i32::try_from(flight.duration.as_millis()).unwrap_or(i32::MAX);
        self.fly_to(
            flight.target.latitude,
            flight.target.longitude,
            flight.zoom,
            duration_ms,
        );
    }
}
