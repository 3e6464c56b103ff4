//! Location and geocoding plumbing for Geoloc
//!
//! Provides the device location capability (GeoClue / WinRT), Nominatim
//! search and reverse lookup.

pub mod geocode;
pub mod location;
pub mod types;

pub use geocode::{Geocoder, SearchBackend, SearchFuture};
pub use location::{
    locate, FixedLocation, LocationFuture, LocationSource, SystemLocation, UnsupportedLocation,
};
pub use types::*;
