use crate::services::LocationError as UiLocationError;
use geoloc_core::{AppError, LocationFailure};

impl From<UiLocationError> for AppError {
    fn from(e: UiLocationError) -> Self {
        match e {
            UiLocationError::Unsupported => AppError::Location(LocationFailure::Unsupported),
            other => AppError::Location(LocationFailure::Failed(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoloc_core::{MSG_LOCATION_FAILED, MSG_LOCATION_UNSUPPORTED};

    #[test]
    fn test_unsupported_keeps_its_own_message() {
        let err = AppError::from(UiLocationError::Unsupported);
        assert_eq!(err.user_message(), MSG_LOCATION_UNSUPPORTED);
    }

    #[test]
    fn test_every_other_failure_collapses() {
        for e in [
            UiLocationError::Denied,
            UiLocationError::Timeout,
            UiLocationError::Failed("no fix".into()),
            UiLocationError::NotInitialized,
        ] {
            let err = AppError::from(e);
            assert_eq!(err.user_message(), MSG_LOCATION_FAILED);
            assert!(err.is_user_visible());
        }
    }
}
