//! Current weather snapshot model and display methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at one coordinate, in metric units
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Station or place name reported by the provider ("Unknown" when absent)
    pub location_name: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Relative humidity in percent
    pub humidity_pct: f64,
    /// Minimum temperature currently observed in the area, Celsius
    pub min_temp_c: f64,
    /// Maximum temperature currently observed in the area, Celsius
    pub max_temp_c: f64,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    /// Coordinate the snapshot was requested for
    pub latitude: f64,
    pub longitude: f64,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1} °C", self.temperature_c)
    }

    /// Format the min/max range with unit
    #[must_use]
    pub fn format_range(&self) -> String {
        format!("{:.1} °C / {:.1} °C", self.min_temp_c, self.max_temp_c)
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.1} m/s", self.wind_speed_ms)
    }

    /// Whether this snapshot belongs to the given coordinate
    #[must_use]
    pub fn is_for(&self, latitude: f64, longitude: f64) -> bool {
        (self.latitude - latitude).abs() < 1e-9 && (self.longitude - longitude).abs() < 1e-9
    }
}
