//! Search backend: geocoding lookups for the map's search control.
//! Failures are reported back but never shown to the user.

use std::sync::Arc;

use geoloc_geo::{SearchBackend, SearchCandidate};

use crate::bridge;

/// Error type for search operations
#[derive(Debug, Clone)]
pub enum SearchError {
    Network(String),
    Parse(String),
    NotInitialized,
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Network(s) => write!(f, "Search error: {}", s),
            SearchError::Parse(s) => write!(f, "Search response error: {}", s),
            SearchError::NotInitialized => write!(f, "Search service not initialized"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<geoloc_geo::GeocodeError> for SearchError {
    fn from(e: geoloc_geo::GeocodeError) -> Self {
        match e {
            geoloc_geo::GeocodeError::Parse(s) => SearchError::Parse(s),
            other => SearchError::Network(other.to_string()),
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum SearchServiceMessage {
    /// Result of a geocoding search
    SearchDone(Result<Vec<SearchCandidate>, SearchError>),
}

/// Request a geocoding search asynchronously.
/// Sends `SearchDone` on the channel when complete.
pub fn request_search(
    tx: &std::sync::mpsc::Sender<SearchServiceMessage>,
    backend: Arc<dyn SearchBackend>,
    query: String,
    limit: u32,
) {
    let tx = tx.clone();
    let runtime = match bridge::get_runtime() {
        Some(r) => r,
        None => {
            let _ = tx.send(SearchServiceMessage::SearchDone(Err(
                SearchError::NotInitialized,
            )));
            return;
        }
    };

    runtime.spawn(async move {
        let result = backend
            .search(&query, limit)
            .await
            .map_err(SearchError::from);
        let _ = tx.send(SearchServiceMessage::SearchDone(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_error_display() {
        assert!(format!("{}", SearchError::Network("reset".into())).contains("reset"));
        assert!(format!("{}", SearchError::NotInitialized).contains("not initialized"));
    }

    #[test]
    fn search_error_from_geocode_parse() {
        let e = SearchError::from(geoloc_geo::GeocodeError::Parse("bad lat".into()));
        assert!(matches!(e, SearchError::Parse(_)));
        let e = SearchError::from(geoloc_geo::GeocodeError::Status(429));
        assert!(matches!(e, SearchError::Network(_)));
    }
}
