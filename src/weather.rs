//! Current weather lookups against OpenWeatherMap

use crate::config::WeatherConfig;
use crate::http::{build_client, get_json};
use crate::models::WeatherSnapshot;
use crate::LookupError;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Resolves a coordinate to current weather metrics
#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn fetch_weather(&self, latitude: f64, longitude: f64)
    -> Result<WeatherSnapshot, LookupError>;
}

/// OpenWeatherMap "current weather" client, metric units
pub struct OpenWeatherMapClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherMapClient {
    /// Create a new weather client
    pub fn new(config: &WeatherConfig, user_agent: &str) -> Result<Self, LookupError> {
        let client = build_client(
            user_agent,
            Duration::from_secs(config.timeout_seconds.into()),
        )?;

        if config.api_key.is_none() {
            warn!("No weather API key configured; weather lookups will be rejected by the provider");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn weather_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/weather?lat={}&lon={}&units=metric&appid={}",
            self.base_url,
            latitude,
            longitude,
            self.api_key.as_deref().unwrap_or_default()
        )
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherMapClient {
    #[instrument(skip(self))]
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, LookupError> {
        let start_time = Instant::now();
        let response: openweathermap::CurrentWeather =
            get_json(&self.client, &self.weather_url(latitude, longitude)).await?;

        let snapshot = response.into_snapshot(latitude, longitude);
        info!(
            "Retrieved current weather for ({:.4}, {:.4}) in {:.3}s: {}",
            latitude,
            longitude,
            start_time.elapsed().as_secs_f64(),
            snapshot.format_temperature()
        );
        Ok(snapshot)
    }
}

/// OpenWeatherMap API response structures and conversion utilities
mod openweathermap {
    use super::WeatherSnapshot;
    use chrono::Utc;
    use serde::Deserialize;

    /// `/weather` response
    #[derive(Debug, Deserialize)]
    pub struct CurrentWeather {
        pub name: Option<String>,
        pub main: MainBlock,
        pub wind: WindBlock,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainBlock {
        pub temp: f64,
        pub humidity: f64,
        pub temp_min: f64,
        pub temp_max: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct WindBlock {
        pub speed: f64,
    }

    impl CurrentWeather {
        pub fn into_snapshot(self, latitude: f64, longitude: f64) -> WeatherSnapshot {
            WeatherSnapshot {
                location_name: self
                    .name
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                temperature_c: self.main.temp,
                humidity_pct: self.main.humidity,
                min_temp_c: self.main.temp_min,
                max_temp_c: self.main.temp_max,
                wind_speed_ms: self.wind.speed,
                latitude,
                longitude,
                fetched_at: Utc::now(),
            }
        }
    }
}
