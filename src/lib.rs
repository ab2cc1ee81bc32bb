//! `geofinder` - Administrative-region search with live map framing
//!
//! This library provides the search pipeline behind the geofinder prompt:
//! forward geocoding of administrative boundaries, stale-result suppression,
//! reverse geocoding and current weather for a selection, a recent-location
//! list and camera planning for the map view.

pub mod cache;
pub mod config;
pub mod console;
pub mod error;
pub mod geocoding;
pub mod http;
pub mod logging;
pub mod models;
pub mod session;
pub mod view_fit;
pub mod weather;

// Re-export core types for public API
pub use cache::{RecentEntry, RecentLocationCache};
pub use config::GeofinderConfig;
pub use console::{ConsoleSink, PromptCommand};
pub use error::{GeofinderError, LookupError};
pub use geocoding::{GeoSearchClient, NominatimClient, ReverseLookupClient};
pub use models::{AddressDetail, BoundaryCandidate, BoundaryGeometry, BoundingBox, WeatherSnapshot};
pub use session::{
    CommitTarget, PresentationEvent, QueryToken, SearchSession, SessionClients, SessionCommand,
    SessionHandle, SessionState,
};
pub use view_fit::{Projection, ViewFitPlan, Viewport, WebMercator};
pub use weather::{OpenWeatherMapClient, WeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GeofinderError>;
