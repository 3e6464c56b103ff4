//! Forward and reverse geocoding against Nominatim (OpenStreetMap).
//! Free, no API key required; a User-Agent is mandatory.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::types::{Coordinate, GeocodeError, SearchCandidate};

/// Reverse lookups are decoration; searches are left to run as long as they take.
const REVERSE_TIMEOUT_SECS: u64 = 10;

/// Boxed future returned by `SearchBackend` implementations.
pub type SearchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<SearchCandidate>, GeocodeError>> + Send + 'a>>;

/// Free-text place lookup used by the search control.
pub trait SearchBackend: Send + Sync {
    fn search<'a>(&'a self, query: &'a str, limit: u32) -> SearchFuture<'a>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    address: Option<NominatimAddress>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state_district: Option<String>,
    state: Option<String>,
    county: Option<String>,
    country: Option<String>,
}

/// Nominatim HTTP client.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: Url,
}

impl Geocoder {
    /// Create a geocoder for the given Nominatim-compatible base URL.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder().user_agent(user_agent).build()?;

        // Url::join drops the last path segment unless it ends with '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        Ok(Self { client, base_url })
    }

    /// Look up places matching `query`, at most `limit` of them.
    ///
    /// Blank queries return an empty list without touching the network.
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SearchCandidate>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());

        tracing::debug!("Geocoding search: {}", query);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let candidates = places
            .into_iter()
            .map(parse_place)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Geocoding search returned {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Reverse geocode a coordinate to a short place name (e.g. "Campinas, São Paulo").
    ///
    /// Returns `None` on any failure; callers fall back to raw coordinates.
    pub async fn reverse(&self, coordinate: Coordinate) -> Option<String> {
        let mut url = match self.base_url.join("reverse") {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Invalid reverse geocoding URL: {}", e);
                return None;
            }
        };
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &coordinate.latitude.to_string())
            .append_pair("lon", &coordinate.longitude.to_string())
            .append_pair("addressdetails", "1")
            .append_pair("zoom", "10");

        let request = self
            .client
            .get(url)
            .timeout(Duration::from_secs(REVERSE_TIMEOUT_SECS));
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimReverse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        let name = match body.address {
            Some(addr) => place_name(addr),
            None => body.display_name,
        };

        if let Some(n) = &name {
            tracing::info!("Reverse geocoded to: {}", n);
        }
        name
    }
}

impl SearchBackend for Geocoder {
    fn search<'a>(&'a self, query: &'a str, limit: u32) -> SearchFuture<'a> {
        Box::pin(Geocoder::search(self, query, limit))
    }
}

fn parse_place(place: NominatimPlace) -> Result<SearchCandidate, GeocodeError> {
    let latitude = parse_degrees(&place.lat)?;
    let longitude = parse_degrees(&place.lon)?;
    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        return Err(GeocodeError::Parse(format!(
            "coordinate out of range: {}",
            coordinate
        )));
    }

    Ok(SearchCandidate {
        label: place.display_name,
        latitude,
        longitude,
    })
}

fn parse_degrees(text: &str) -> Result<f64, GeocodeError> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| GeocodeError::Parse(format!("invalid degrees {:?}: {}", text, e)))
}

/// Prefer city > town > village > municipality, suffixed with the state
/// (or country) when that adds information.
fn place_name(addr: NominatimAddress) -> Option<String> {
    let state = addr.state.clone();
    let country = addr.country.clone();

    let place = addr
        .city
        .or(addr.town)
        .or(addr.village)
        .or(addr.municipality)
        .or(addr.state_district)
        .or(addr.county)
        .or(addr.state)
        .or(addr.country)?;

    let suffix = state
        .filter(|s| !s.is_empty() && *s != place)
        .or_else(|| country.filter(|c| !c.is_empty() && *c != place));

    Some(match suffix {
        Some(s) => format!("{}, {}", place, s),
        None => place,
    })
}
