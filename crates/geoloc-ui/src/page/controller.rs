//! Page controller: owns the location reading, the loading flag and the
//! error message, and derives the info cards from them.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use geoloc_core::{AppError, LocationFailure};
use geoloc_geo::{LocationReading, LocationSource, PositionOptions};

use super::info_card::{info_cards, InfoCard};
use crate::bridge::Services;
use crate::services::{request_position, LocationError, LocationServiceMessage};

pub const CTA_IDLE: &str = "Obter Minha Localização";
pub const CTA_LOADING: &str = "Localizando...";
pub const REFRESH_LABEL: &str = "Atualizar Localização";

/// What the page is showing. Exactly one applies at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// Nothing requested yet
    Initial,
    /// A request is in flight; a refresh keeps the previous reading on screen
    Loading { previous: Option<LocationReading> },
    Ready(LocationReading),
    /// The last request failed; no reading is shown
    Failed(String),
}

pub struct PageController {
    state: PageState,
    source: Arc<dyn LocationSource>,
    options: PositionOptions,
    tx: Sender<LocationServiceMessage>,
    rx: Receiver<LocationServiceMessage>,
}

impl PageController {
    pub fn new(source: Arc<dyn LocationSource>, options: PositionOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: PageState::Initial,
            source,
            options,
            tx,
            rx,
        }
    }

    pub fn from_services(services: &Services) -> Self {
        Self::new(services.location.clone(), services.position_options())
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PageState::Loading { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            PageState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The reading currently on screen, if any.
    pub fn reading(&self) -> Option<&LocationReading> {
        match &self.state {
            PageState::Ready(reading) => Some(reading),
            PageState::Loading { previous } => previous.as_ref(),
            PageState::Initial | PageState::Failed(_) => None,
        }
    }

    /// The big call-to-action button shows until there is a reading.
    pub fn show_cta(&self) -> bool {
        self.reading().is_none()
    }

    pub fn cta_label(&self) -> &'static str {
        if self.is_loading() {
            CTA_LOADING
        } else {
            CTA_IDLE
        }
    }

    /// Cards for the reading on screen, times in the host's local zone.
    pub fn info_cards(&self) -> Vec<InfoCard> {
        self.reading()
            .map(|reading| info_cards(reading, &Local))
            .unwrap_or_default()
    }

    /// Ask the device where it is. Overlapping requests are allowed; the
    /// last one to answer wins.
    pub fn request_location(&mut self) {
        if !self.source.is_supported() {
            tracing::warn!("Location capability not available on this host");
            self.fail(AppError::from(LocationFailure::Unsupported));
            return;
        }

        let previous = self.reading().cloned();
        self.state = PageState::Loading { previous };
        request_position(&self.tx, self.source.clone(), self.options);
    }

    /// Apply the outcome of a location request.
    pub fn apply_location_result(&mut self, result: Result<LocationReading, LocationError>) {
        match result {
            Ok(reading) => self.state = PageState::Ready(reading),
            Err(e) => {
                tracing::warn!("Location request failed: {}", e);
                self.fail(AppError::from(e));
            }
        }
    }

    /// Drain finished requests. Returns true if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(LocationServiceMessage::PositionDone(result)) = self.rx.try_recv() {
            self.apply_location_result(result);
            changed = true;
        }
        changed
    }

    /// Block until one location request finishes or `timeout` elapses.
    pub fn wait_for_location(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(LocationServiceMessage::PositionDone(result)) => {
                self.apply_location_result(result);
                true
            }
            Err(_) => false,
        }
    }

    fn fail(&mut self, error: AppError) {
        self.state = PageState::Failed(error.user_message().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sao_paulo_reading, ScriptedLocation};
    use geoloc_core::{MSG_LOCATION_FAILED, MSG_LOCATION_UNSUPPORTED};
    use geoloc_geo::{FixedLocation, UnsupportedLocation};

    fn page_with(reading: LocationReading) -> PageController {
        PageController::new(
            Arc::new(FixedLocation::new(reading)),
            PositionOptions::default(),
        )
    }

    fn rio_reading() -> LocationReading {
        LocationReading {
            latitude: -22.91,
            longitude: -43.17,
            ..sao_paulo_reading()
        }
    }

    #[test]
    fn test_initial_state() {
        let page = page_with(sao_paulo_reading());
        assert_eq!(page.state(), &PageState::Initial);
        assert!(page.show_cta());
        assert_eq!(page.cta_label(), "Obter Minha Localização");
        assert!(page.info_cards().is_empty());
    }

    #[test]
    fn test_unsupported_fails_immediately() {
        let mut page = PageController::new(
            Arc::new(UnsupportedLocation),
            PositionOptions::default(),
        );
        page.request_location();
        assert!(!page.is_loading());
        assert_eq!(page.error_message(), Some(MSG_LOCATION_UNSUPPORTED));
        assert!(!page.wait_for_location(Duration::from_millis(50)));
    }

    #[test]
    fn test_request_sets_loading_then_ready() {
        let mut page = page_with(sao_paulo_reading());
        page.request_location();
        assert!(page.is_loading());
        assert_eq!(page.cta_label(), "Localizando...");
        assert_eq!(page.error_message(), None);

        assert!(page.wait_for_location(Duration::from_secs(5)));
        assert_eq!(page.state(), &PageState::Ready(sao_paulo_reading()));
        assert!(!page.show_cta());
        assert_eq!(page.info_cards().len(), 6);
        assert_eq!(page.info_cards()[0].value, "23.550000° S");
    }

    #[test]
    fn test_denied_ends_in_error_without_reading() {
        let mut page = page_with(sao_paulo_reading());
        page.apply_location_result(Ok(sao_paulo_reading()));

        page.request_location();
        page.apply_location_result(Err(LocationError::Denied));
        assert!(!page.is_loading());
        assert_eq!(page.error_message(), Some(MSG_LOCATION_FAILED));
        assert!(page.reading().is_none());
        assert!(page.info_cards().is_empty());
    }

    #[test]
    fn test_timeout_uses_same_message_as_denied() {
        let mut page = page_with(sao_paulo_reading());
        page.apply_location_result(Err(LocationError::Timeout));
        assert_eq!(page.error_message(), Some(MSG_LOCATION_FAILED));
    }

    #[test]
    fn test_refresh_keeps_previous_reading_visible() {
        let mut page = page_with(sao_paulo_reading());
        page.apply_location_result(Ok(sao_paulo_reading()));

        page.request_location();
        assert!(page.is_loading());
        assert_eq!(page.reading(), Some(&sao_paulo_reading()));
        assert!(!page.show_cta());
    }

    #[test]
    fn test_error_cleared_by_next_success() {
        let mut page = page_with(sao_paulo_reading());
        page.apply_location_result(Err(LocationError::Failed("gps".into())));
        page.request_location();
        assert_eq!(page.error_message(), None);
        assert!(page.wait_for_location(Duration::from_secs(5)));
        assert!(page.reading().is_some());
    }

    #[test]
    fn test_overlapping_requests_last_reply_wins() {
        // First request answers slowly, the refresh answers at once
        let source = ScriptedLocation::new(vec![
            (Duration::from_millis(300), sao_paulo_reading()),
            (Duration::ZERO, rio_reading()),
        ]);
        let mut page = PageController::new(Arc::new(source), PositionOptions::default());

        page.request_location();
        page.request_location();

        assert!(page.wait_for_location(Duration::from_secs(5)));
        assert_eq!(page.reading(), Some(&rio_reading()));

        assert!(page.wait_for_location(Duration::from_secs(5)));
        assert_eq!(page.state(), &PageState::Ready(sao_paulo_reading()));
        assert!(!page.poll());
    }

    #[test]
    fn test_poll_applies_finished_request() {
        let mut page = page_with(sao_paulo_reading());
        page.request_location();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !page.poll() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(page.reading(), Some(&sao_paulo_reading()));
    }
}
