//! Forward and reverse geocoding against Nominatim (OpenStreetMap)
//!
//! Forward search returns administrative boundaries only; reverse lookup
//! decomposes an address into district/state/country with graceful handling
//! of absent fields.

use crate::config::GeocodingConfig;
use crate::http::{build_client, get_json};
use crate::models::{AddressDetail, BoundaryCandidate, BoundaryGeometry, BoundingBox};
use crate::LookupError;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Resolves free text to candidate administrative boundaries
#[async_trait]
pub trait GeoSearchClient: Send + Sync {
    /// Search for boundaries matching `query` (non-empty, already trimmed).
    ///
    /// An empty result is `Ok(vec![])`, not an error.
    async fn search(&self, query: &str) -> Result<Vec<BoundaryCandidate>, LookupError>;
}

/// Resolves a coordinate to structured address fields
#[async_trait]
pub trait ReverseLookupClient: Send + Sync {
    async fn reverse_lookup(&self, latitude: f64, longitude: f64)
    -> Result<AddressDetail, LookupError>;
}

/// Nominatim client implementing both lookup directions
pub struct NominatimClient {
    client: ClientWithMiddleware,
    base_url: String,
    result_limit: u32,
}

impl NominatimClient {
    /// Create a new Nominatim client
    pub fn new(config: &GeocodingConfig) -> Result<Self, LookupError> {
        let client = build_client(
            &config.user_agent,
            Duration::from_secs(config.timeout_seconds.into()),
        )?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            result_limit: config.result_limit,
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit={}&polygon_geojson=1&addressdetails=1&extratags=1",
            self.base_url,
            urlencoding::encode(query),
            self.result_limit
        )
    }

    fn reverse_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, latitude, longitude
        )
    }
}

#[async_trait]
impl GeoSearchClient for NominatimClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<BoundaryCandidate>, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Skipping search for blank query");
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        let places: Vec<nominatim::Place> = get_json(&self.client, &self.search_url(query)).await?;
        let total = places.len();

        let candidates = nominatim::administrative_boundaries(places)?;

        if candidates.is_empty() {
            warn!(
                "No administrative boundaries for '{}' ({} raw results)",
                query, total
            );
        } else {
            info!(
                "Found {} boundaries for '{}' in {:.3}s",
                candidates.len(),
                query,
                start_time.elapsed().as_secs_f64()
            );
            debug!(
                "Boundaries: {:?}",
                candidates
                    .iter()
                    .map(|c| format!("{} ({})", c.display_name, c.format_coordinates()))
                    .collect::<Vec<_>>()
            );
        }

        Ok(candidates)
    }
}

#[async_trait]
impl ReverseLookupClient for NominatimClient {
    #[instrument(skip(self))]
    async fn reverse_lookup(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AddressDetail, LookupError> {
        let start_time = Instant::now();
        let response: nominatim::ReverseResponse =
            get_json(&self.client, &self.reverse_url(latitude, longitude)).await?;

        let detail = AddressDetail::from(response);
        info!(
            "Reverse geocoded ({:.4}, {:.4}) in {:.3}s",
            latitude,
            longitude,
            start_time.elapsed().as_secs_f64()
        );
        Ok(detail)
    }
}

/// Nominatim response structures and conversion utilities
mod nominatim {
    use super::{AddressDetail, BoundaryCandidate, BoundaryGeometry, BoundingBox, LookupError};
    use serde::Deserialize;

    /// One `/search` result
    #[derive(Debug, Deserialize)]
    pub struct Place {
        pub place_id: u64,
        pub display_name: String,
        pub lat: String,
        pub lon: String,
        pub boundingbox: Vec<String>,
        #[serde(default)]
        pub class: String,
        #[serde(rename = "type", default)]
        pub place_type: String,
        pub geojson: Option<serde_json::Value>,
    }

    impl Place {
        pub fn is_administrative_boundary(&self) -> bool {
            self.class == "boundary" && self.place_type == "administrative"
        }
    }

    /// `/reverse` response; only the address block matters here
    #[derive(Debug, Deserialize)]
    pub struct ReverseResponse {
        pub address: Option<Address>,
    }

    #[derive(Debug, Deserialize, Default)]
    pub struct Address {
        pub state_district: Option<String>,
        pub county: Option<String>,
        pub state: Option<String>,
        pub country: Option<String>,
    }

    impl From<ReverseResponse> for AddressDetail {
        fn from(response: ReverseResponse) -> Self {
            let address = response.address.unwrap_or_default();
            AddressDetail {
                district: address
                    .state_district
                    .or(address.county)
                    .unwrap_or_default(),
                state: address.state.unwrap_or_default(),
                country: address.country.unwrap_or_default(),
            }
        }
    }

    fn parse_coordinate(field: &str, value: &str) -> Result<f64, LookupError> {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| LookupError::parse(format!("Invalid {field} '{value}'")))
    }

    impl TryFrom<Place> for BoundaryCandidate {
        type Error = LookupError;

        fn try_from(place: Place) -> Result<Self, Self::Error> {
            let [south, north, west, east] = place.boundingbox.as_slice() else {
                return Err(LookupError::parse(format!(
                    "Bounding box of '{}' has {} values, expected 4",
                    place.display_name,
                    place.boundingbox.len()
                )));
            };

            let bounding_box = BoundingBox::new(
                parse_coordinate("south", south)?,
                parse_coordinate("north", north)?,
                parse_coordinate("west", west)?,
                parse_coordinate("east", east)?,
            );

            Ok(BoundaryCandidate {
                id: place.place_id.to_string(),
                latitude: parse_coordinate("latitude", &place.lat)?,
                longitude: parse_coordinate("longitude", &place.lon)?,
                bounding_box,
                geometry: place.geojson.and_then(BoundaryGeometry::from_geojson),
                display_name: place.display_name,
            })
        }
    }

    /// Keep administrative boundaries, in provider order
    pub fn administrative_boundaries(
        places: Vec<Place>,
    ) -> Result<Vec<BoundaryCandidate>, LookupError> {
        places
            .into_iter()
            .filter(Place::is_administrative_boundary)
            .map(BoundaryCandidate::try_from)
            .collect()
    }
}
