//! Page model for QML.
//!
//! Wraps `PageController`: the call-to-action, the loading flag, the error
//! line and the info card grid. Location requests run on the shared runtime
//! and come back through `poll_channel`, called from a QML Timer.

use core::pin::Pin;

use cxx_qt::CxxQtType;
use cxx_qt_lib::QString;
use geoloc_core::AppError;
use geoloc_geo::LocationReading;

use crate::bridge;
use crate::page::{InfoCard, PageController, CTA_IDLE, REFRESH_LABEL};
use crate::services::LocationError;

#[cxx_qt::bridge]
pub mod qobject {
    unsafe extern "C++" {
        include!("cxx-qt-lib/qstring.h");
        type QString = cxx_qt_lib::QString;
    }

    extern "RustQt" {
        #[qobject]
        #[qml_element]
        #[qproperty(bool, loading)]
        #[qproperty(bool, has_reading)]
        #[qproperty(bool, show_cta)]
        #[qproperty(QString, cta_label)]
        #[qproperty(QString, refresh_label)]
        #[qproperty(QString, error_message)]
        // Authoritative position, handed to the map
        #[qproperty(f64, latitude)]
        #[qproperty(f64, longitude)]
        #[qproperty(f64, accuracy)]
        type PageModel = super::PageModelRust;

        #[qinvokable]
        fn request_location(self: Pin<&mut PageModel>);

        /// Poll for finished location requests. Call this from a QML Timer.
        #[qinvokable]
        fn poll_channel(self: Pin<&mut PageModel>);

        #[qinvokable]
        fn card_count(self: &PageModel) -> i32;

        #[qinvokable]
        fn card_icon(self: &PageModel, index: i32) -> QString;

        #[qinvokable]
        fn card_label(self: &PageModel, index: i32) -> QString;

        #[qinvokable]
        fn card_value(self: &PageModel, index: i32) -> QString;

        #[qinvokable]
        fn card_delay(self: &PageModel, index: i32) -> f64;

        #[qsignal]
        fn location_changed(self: Pin<&mut PageModel>);

        #[qsignal]
        fn cards_changed(self: Pin<&mut PageModel>);
    }
}

pub struct PageModelRust {
    loading: bool,
    has_reading: bool,
    show_cta: bool,
    cta_label: QString,
    refresh_label: QString,
    error_message: QString,
    latitude: f64,
    longitude: f64,
    accuracy: f64,
    // Internal state
    controller: Option<PageController>,
    cards: Vec<InfoCard>,
}

impl Default for PageModelRust {
    fn default() -> Self {
        Self {
            loading: false,
            has_reading: false,
            show_cta: true,
            cta_label: QString::from(CTA_IDLE),
            refresh_label: QString::from(REFRESH_LABEL),
            error_message: QString::default(),
            latitude: 0.0,
            longitude: 0.0,
            accuracy: 0.0,
            controller: None,
            cards: Vec::new(),
        }
    }
}

// Controller state copied out before the QObject setters run
struct Snapshot {
    loading: bool,
    show_cta: bool,
    cta_label: &'static str,
    error_message: String,
    reading: Option<LocationReading>,
    cards: Vec<InfoCard>,
}

impl PageModelRust {
    fn ensure_initialized(&mut self) {
        if self.controller.is_some() {
            return;
        }

        match bridge::get_services() {
            Some(services) => {
                self.controller = Some(PageController::from_services(&services));
                tracing::info!("PageModel auto-initialized from global services");
            }
            None => {
                tracing::error!("Cannot auto-initialize PageModel - global services not ready");
            }
        }
    }

    fn snapshot(&self) -> Option<Snapshot> {
        let controller = self.controller.as_ref()?;
        Some(Snapshot {
            loading: controller.is_loading(),
            show_cta: controller.show_cta(),
            cta_label: controller.cta_label(),
            error_message: controller.error_message().unwrap_or_default().to_string(),
            reading: controller.reading().cloned(),
            cards: controller.info_cards(),
        })
    }

    fn card(&self, index: i32) -> Option<&InfoCard> {
        usize::try_from(index).ok().and_then(|i| self.cards.get(i))
    }
}

impl qobject::PageModel {
    pub fn request_location(mut self: Pin<&mut Self>) {
        self.as_mut().rust_mut().ensure_initialized();

        if self.rust().controller.is_none() {
            let message = AppError::from(LocationError::NotInitialized).user_message();
            self.as_mut().set_error_message(QString::from(message));
            return;
        }

        if let Some(controller) = self.as_mut().rust_mut().controller.as_mut() {
            controller.request_location();
        }
        self.sync();
    }

    pub fn poll_channel(mut self: Pin<&mut Self>) {
        let changed = match self.as_mut().rust_mut().controller.as_mut() {
            Some(controller) => controller.poll(),
            None => false,
        };

        if changed {
            self.sync();
        }
    }

    pub fn card_count(&self) -> i32 {
        self.rust().cards.len() as i32
    }

    pub fn card_icon(&self, index: i32) -> QString {
        self.rust()
            .card(index)
            .map(|c| QString::from(c.icon.icon_name()))
            .unwrap_or_default()
    }

    pub fn card_label(&self, index: i32) -> QString {
        self.rust()
            .card(index)
            .map(|c| QString::from(c.label))
            .unwrap_or_default()
    }

    pub fn card_value(&self, index: i32) -> QString {
        self.rust()
            .card(index)
            .map(|c| QString::from(c.value.as_str()))
            .unwrap_or_default()
    }

    pub fn card_delay(&self, index: i32) -> f64 {
        self.rust()
            .card(index)
            .map(|c| f64::from(c.delay))
            .unwrap_or(0.0)
    }

    // Copy controller state into the properties QML binds to.
    fn sync(mut self: Pin<&mut Self>) {
        let Some(snapshot) = self.rust().snapshot() else {
            return;
        };

        self.as_mut().set_loading(snapshot.loading);
        self.as_mut().set_show_cta(snapshot.show_cta);
        self.as_mut().set_cta_label(QString::from(snapshot.cta_label));
        self.as_mut()
            .set_error_message(QString::from(snapshot.error_message.as_str()));
        self.as_mut().rust_mut().cards = snapshot.cards;
        self.as_mut().cards_changed();

        match snapshot.reading {
            Some(reading) => {
                let moved = {
                    let current = self.rust();
                    !current.has_reading
                        || current.latitude != reading.latitude
                        || current.longitude != reading.longitude
                        || current.accuracy != reading.accuracy
                };

                self.as_mut().set_latitude(reading.latitude);
                self.as_mut().set_longitude(reading.longitude);
                self.as_mut().set_accuracy(reading.accuracy);
                self.as_mut().set_has_reading(true);
                if moved {
                    self.as_mut().location_changed();
                }
            }
            None => self.as_mut().set_has_reading(false),
        }
    }
}
