//! Data models for geofinder
//!
//! - Boundary: administrative-boundary candidates and their geometry
//! - Address: reverse-geocoded address fields
//! - Weather: current weather snapshots

pub mod address;
pub mod boundary;
pub mod weather;

pub use address::AddressDetail;
pub use boundary::{BoundaryCandidate, BoundaryGeometry, BoundingBox};
pub use weather::WeatherSnapshot;
