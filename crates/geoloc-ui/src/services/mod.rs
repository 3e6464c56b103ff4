pub mod location_service;
pub mod search_service;

pub use location_service::{
    request_position, LocationError, LocationServiceMessage,
};
pub use search_service::{request_search, SearchError, SearchServiceMessage};
