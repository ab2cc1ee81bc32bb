//! Scripted provider stubs for driving a `SearchSession` under paused time

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use geofinder::{
    AddressDetail, BoundaryCandidate, BoundaryGeometry, BoundingBox, GeoSearchClient,
    LookupError, PresentationEvent, ReverseLookupClient, SearchSession, SessionClients, Viewport,
    WeatherClient, WeatherSnapshot,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Delay used for any lookup without a scripted one
pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Candidate with a one-degree square outline around its centre
pub fn candidate(id: &str, name: &str, latitude: f64, longitude: f64) -> BoundaryCandidate {
    let half_side = 0.5;
    let (south, north) = (latitude - half_side, latitude + half_side);
    let (west, east) = (longitude - half_side, longitude + half_side);
    BoundaryCandidate {
        id: id.to_string(),
        display_name: name.to_string(),
        latitude,
        longitude,
        bounding_box: BoundingBox::new(south, north, west, east),
        geometry: Some(BoundaryGeometry::Polygon(vec![vec![
            [west, south],
            [east, south],
            [east, north],
            [west, north],
            [west, south],
        ]])),
    }
}

pub fn bavaria() -> BoundaryCandidate {
    candidate("101", "Bavaria, Germany", 48.9467, 11.4039)
}

pub fn tyrol() -> BoundaryCandidate {
    candidate("202", "Tyrol, Austria", 47.2537, 11.6015)
}

pub fn address_for(name: &str) -> AddressDetail {
    AddressDetail::new(format!("{name} District"), name, "Testland")
}

pub fn weather_at(latitude: f64, longitude: f64) -> WeatherSnapshot {
    WeatherSnapshot {
        location_name: "Somewhere".to_string(),
        temperature_c: 12.5,
        humidity_pct: 60.0,
        min_temp_c: 10.0,
        max_temp_c: 14.0,
        wind_speed_ms: 3.0,
        latitude,
        longitude,
        fetched_at: Utc::now(),
    }
}

fn coordinate_key(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.4},{longitude:.4}")
}

type Scripted<T> = (Duration, Result<T, LookupError>);

/// Forward search answering from a script keyed by query text.
/// Unknown queries resolve to no results.
#[derive(Default)]
pub struct StubGeo {
    script: HashMap<String, Scripted<Vec<BoundaryCandidate>>>,
    calls: Mutex<Vec<String>>,
}

impl StubGeo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        query: &str,
        delay: Duration,
        result: Result<Vec<BoundaryCandidate>, LookupError>,
    ) -> Self {
        self.script.insert(query.to_string(), (delay, result));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeoSearchClient for StubGeo {
    async fn search(&self, query: &str) -> Result<Vec<BoundaryCandidate>, LookupError> {
        self.calls.lock().unwrap().push(query.to_string());
        let (delay, result) = self
            .script
            .get(query)
            .cloned()
            .unwrap_or((DEFAULT_DELAY, Ok(Vec::new())));
        tokio::time::sleep(delay).await;
        result
    }
}

/// Reverse lookup keyed by coordinate; unscripted coordinates get a
/// generic address
#[derive(Default)]
pub struct StubReverse {
    script: HashMap<String, Scripted<AddressDetail>>,
}

impl StubReverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        latitude: f64,
        longitude: f64,
        delay: Duration,
        result: Result<AddressDetail, LookupError>,
    ) -> Self {
        self.script
            .insert(coordinate_key(latitude, longitude), (delay, result));
        self
    }
}

#[async_trait]
impl ReverseLookupClient for StubReverse {
    async fn reverse_lookup(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AddressDetail, LookupError> {
        let (delay, result) = self
            .script
            .get(&coordinate_key(latitude, longitude))
            .cloned()
            .unwrap_or_else(|| (DEFAULT_DELAY, Ok(address_for("Generic"))));
        tokio::time::sleep(delay).await;
        result
    }
}

/// Weather keyed by coordinate; unscripted coordinates get [`weather_at`]
#[derive(Default)]
pub struct StubWeather {
    script: HashMap<String, Scripted<WeatherSnapshot>>,
}

impl StubWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        latitude: f64,
        longitude: f64,
        delay: Duration,
        result: Result<WeatherSnapshot, LookupError>,
    ) -> Self {
        self.script
            .insert(coordinate_key(latitude, longitude), (delay, result));
        self
    }
}

#[async_trait]
impl WeatherClient for StubWeather {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, LookupError> {
        let (delay, result) = self
            .script
            .get(&coordinate_key(latitude, longitude))
            .cloned()
            .unwrap_or_else(|| (DEFAULT_DELAY, Ok(weather_at(latitude, longitude))));
        tokio::time::sleep(delay).await;
        result
    }
}

pub fn session_with(
    geo: StubGeo,
    reverse: StubReverse,
    weather: StubWeather,
) -> (SearchSession, mpsc::UnboundedReceiver<PresentationEvent>) {
    let clients = SessionClients {
        geo: Arc::new(geo),
        reverse: Arc::new(reverse),
        weather: Arc::new(weather),
    };
    SearchSession::new(clients, Viewport::new(800.0, 2.0))
}

/// Everything emitted so far
pub fn drain(events: &mut mpsc::UnboundedReceiver<PresentationEvent>) -> Vec<PresentationEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Display names of every selection event, in order
pub fn selected_names(events: &[PresentationEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            PresentationEvent::SelectionChanged { candidate, .. } => {
                Some(candidate.display_name.clone())
            }
            _ => None,
        })
        .collect()
}
