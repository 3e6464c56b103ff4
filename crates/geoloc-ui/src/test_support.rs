//! Fakes shared by the model tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use geoloc_geo::{
    GeocodeError, LocationFuture, LocationReading, LocationSource, PositionOptions,
    SearchBackend, SearchCandidate, SearchFuture,
};

/// Answers every query with a fixed list (or a failure) and counts calls.
pub struct StaticBackend {
    pub candidates: Vec<SearchCandidate>,
    pub calls: AtomicUsize,
    fail: bool,
}

impl StaticBackend {
    pub fn new(candidates: Vec<SearchCandidate>) -> Self {
        Self {
            candidates,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

impl SearchBackend for StaticBackend {
    fn search<'a>(&'a self, _query: &'a str, limit: u32) -> SearchFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail {
            Err(GeocodeError::Status(500))
        } else {
            Ok(self
                .candidates
                .iter()
                .take(limit as usize)
                .cloned()
                .collect())
        };
        Box::pin(async move { result })
    }
}

/// Answers each known query after its own delay; unknown queries get nothing.
pub struct ScriptedBackend {
    replies: Vec<(&'static str, Duration, Vec<SearchCandidate>)>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<(&'static str, Duration, Vec<SearchCandidate>)>) -> Self {
        Self { replies }
    }
}

impl SearchBackend for ScriptedBackend {
    fn search<'a>(&'a self, query: &'a str, _limit: u32) -> SearchFuture<'a> {
        let (delay, candidates) = self
            .replies
            .iter()
            .find(|(q, _, _)| *q == query)
            .map(|(_, delay, candidates)| (*delay, candidates.clone()))
            .unwrap_or((Duration::ZERO, Vec::new()));
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(candidates)
        })
    }
}

/// Hands out readings in order, each after its own delay.
pub struct ScriptedLocation {
    replies: Vec<(Duration, LocationReading)>,
    next: AtomicUsize,
}

impl ScriptedLocation {
    pub fn new(replies: Vec<(Duration, LocationReading)>) -> Self {
        Self {
            replies,
            next: AtomicUsize::new(0),
        }
    }
}

impl LocationSource for ScriptedLocation {
    fn is_supported(&self) -> bool {
        true
    }

    fn current_position<'a>(&'a self, _options: &'a PositionOptions) -> LocationFuture<'a> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let (delay, reading) = self.replies[index % self.replies.len()].clone();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(reading)
        })
    }
}

/// The reading from the São Paulo walkthrough: no altitude, no speed.
pub fn sao_paulo_reading() -> LocationReading {
    LocationReading {
        latitude: -23.55,
        longitude: -46.63,
        accuracy: 15.0,
        altitude: None,
        speed: None,
        heading: None,
        timestamp: 1_700_000_000_000,
    }
}
