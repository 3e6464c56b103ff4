use crate::services::SearchError as UiSearchError;
use geoloc_core::{AppError, SearchFailure};

impl From<UiSearchError> for AppError {
    fn from(e: UiSearchError) -> Self {
        match e {
            UiSearchError::Network(s) => AppError::Search(SearchFailure::Network(s)),
            UiSearchError::Parse(s) => AppError::Search(SearchFailure::Parse(s)),
            UiSearchError::NotInitialized => {
                AppError::Search(SearchFailure::Network("Search service not initialized".into()))
            }
        }
    }
}
