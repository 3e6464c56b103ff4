//! Address search control that lives inside the map view.
//!
//! Searches are never cancelled. Each reply replaces the result list, so
//! the last reply to arrive wins, and the control reports itself as
//! searching until every submitted query has answered.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use geoloc_core::AppError;
use geoloc_geo::{Coordinate, SearchBackend, SearchCandidate};

use crate::bridge::Services;
use crate::services::{request_search, SearchError, SearchServiceMessage};

pub struct SearchControl {
    query: String,
    results: Vec<SearchCandidate>,
    in_flight: usize,
    limit: u32,
    backend: Arc<dyn SearchBackend>,
    tx: Sender<SearchServiceMessage>,
    rx: Receiver<SearchServiceMessage>,
}

impl SearchControl {
    pub fn new(backend: Arc<dyn SearchBackend>, limit: u32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            query: String::new(),
            results: Vec::new(),
            in_flight: 0,
            limit,
            backend,
            tx,
            rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchCandidate] {
        &self.results
    }

    pub fn from_services(services: &Services) -> Self {
        Self::new(
            services.search.clone(),
            services.config.geocoding.result_limit,
        )
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight > 0
    }

    /// New input discards the previous result list.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.results.clear();
    }

    /// Submit the current query. Returns false (and does nothing) when the
    /// query is blank.
    pub fn submit(&mut self) -> bool {
        let query = self.query.trim();
        if query.is_empty() {
            return false;
        }

        tracing::debug!("Submitting search: {}", query);
        self.in_flight += 1;
        request_search(&self.tx, self.backend.clone(), query.to_string(), self.limit);
        true
    }

    /// Apply the outcome of a search. Failures empty the list silently.
    pub fn apply_results(&mut self, result: Result<Vec<SearchCandidate>, SearchError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(candidates) => {
                tracing::debug!("Search returned {} candidates", candidates.len());
                self.results = candidates;
            }
            Err(e) => {
                let app_err = AppError::from(e);
                tracing::debug!("Search failed ({}), clearing results", app_err);
                self.results.clear();
            }
        }
    }

    /// Drain finished searches. Returns true if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(SearchServiceMessage::SearchDone(result)) = self.rx.try_recv() {
            self.apply_results(result);
            changed = true;
        }
        changed
    }

    /// Block until one search finishes or `timeout` elapses.
    pub fn wait_for_results(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(SearchServiceMessage::SearchDone(result)) => {
                self.apply_results(result);
                true
            }
            Err(_) => false,
        }
    }

    /// Pick a candidate: clears the list, shortens the label into the
    /// query field and hands back its coordinate.
    pub fn select(&mut self, index: usize) -> Option<Coordinate> {
        let candidate = self.results.get(index)?.clone();
        self.results.clear();
        self.query = candidate.short_label();
        tracing::debug!("Selected search result {}", candidate.coordinate());
        Some(candidate.coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedBackend, StaticBackend};
    use std::sync::atomic::Ordering;

    fn paulista() -> SearchCandidate {
        SearchCandidate {
            label: "Avenida Paulista, Bela Vista, São Paulo, Brasil".into(),
            latitude: -23.5614,
            longitude: -46.6559,
        }
    }

    fn copacabana() -> SearchCandidate {
        SearchCandidate {
            label: "Copacabana, Rio de Janeiro, Brasil".into(),
            latitude: -22.9711,
            longitude: -43.1822,
        }
    }

    #[test]
    fn test_blank_query_is_noop() {
        let backend = Arc::new(StaticBackend::new(vec![paulista()]));
        let mut control = SearchControl::new(backend.clone(), 5);
        control.apply_results(Ok(vec![paulista()]));
        control.query = "   ".into();

        assert!(!control.submit());
        assert!(!control.is_searching());
        assert_eq!(control.results().len(), 1, "results must be left untouched");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_submit_fills_results() {
        let backend = Arc::new(StaticBackend::new(vec![paulista()]));
        let mut control = SearchControl::new(backend.clone(), 5);
        control.set_query("Paulista");
        assert!(control.submit());
        assert!(control.is_searching());

        assert!(control.wait_for_results(Duration::from_secs(5)));
        assert!(!control.is_searching());
        assert_eq!(control.results(), &[paulista()]);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_clears_results_silently() {
        let mut control = SearchControl::new(Arc::new(StaticBackend::failing()), 5);
        control.apply_results(Ok(vec![paulista()]));
        control.query = "Paulista".into();

        assert!(control.submit());
        assert!(control.wait_for_results(Duration::from_secs(5)));
        assert!(control.results().is_empty());
        assert!(!control.is_searching());
    }

    #[test]
    fn test_overlapping_searches_last_reply_wins() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            ("Paulista", Duration::from_millis(300), vec![paulista()]),
            ("Copacabana", Duration::ZERO, vec![copacabana()]),
        ]));
        let mut control = SearchControl::new(backend, 5);

        control.set_query("Paulista");
        assert!(control.submit());
        control.set_query("Copacabana");
        assert!(control.submit());

        // The quick reply lands first but the slow one is still pending
        assert!(control.wait_for_results(Duration::from_secs(5)));
        assert_eq!(control.results(), &[copacabana()]);
        assert!(control.is_searching());

        assert!(control.wait_for_results(Duration::from_secs(5)));
        assert_eq!(control.results(), &[paulista()]);
        assert!(!control.is_searching());
        assert!(!control.poll());
    }

    #[test]
    fn test_poll_drains_every_finished_search() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            ("Paulista", Duration::ZERO, vec![paulista()]),
            ("Copacabana", Duration::ZERO, vec![copacabana()]),
        ]));
        let mut control = SearchControl::new(backend, 5);
        control.set_query("Paulista");
        control.submit();
        control.set_query("Copacabana");
        control.submit();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while control.is_searching() && std::time::Instant::now() < deadline {
            control.poll();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!control.is_searching());
        assert_eq!(control.results().len(), 1);
    }

    #[test]
    fn test_new_input_discards_results() {
        let mut control = SearchControl::new(Arc::new(StaticBackend::new(vec![])), 5);
        control.apply_results(Ok(vec![paulista()]));
        control.set_query("Rio");
        assert!(control.results().is_empty());
    }

    #[test]
    fn test_select_shortens_label_and_clears() {
        let mut control = SearchControl::new(Arc::new(StaticBackend::new(vec![])), 5);
        control.apply_results(Ok(vec![paulista()]));

        let coordinate = control.select(0).unwrap();
        assert_eq!(coordinate, Coordinate::new(-23.5614, -46.6559));
        assert_eq!(control.query(), "Avenida Paulista, Bela Vista");
        assert!(control.results().is_empty());
    }

    #[test]
    fn test_select_out_of_range() {
        let mut control = SearchControl::new(Arc::new(StaticBackend::new(vec![])), 5);
        assert!(control.select(3).is_none());
    }
}
