//! Current-weather lookup for the greeting banner.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default Open-Meteo API root.
pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";

/// Current conditions at a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    /// Degrees Celsius.
    pub temperature: f64,
    /// WMO weather interpretation code (0 = clear sky).
    pub condition_code: i64,
    pub is_day: bool,
}

impl CurrentWeather {
    /// Used whenever the lookup fails: 25 °C, clear sky, daytime.
    pub const FALLBACK: Self = Self {
        temperature: 25.0,
        condition_code: 0,
        is_day: true,
    };
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("weather service returned HTTP {0}")]
    Status(u16),

    #[error("could not decode weather response: {0}")]
    Decode(String),
}

/// A source of current weather conditions.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentWeather, WeatherError>;
}

// Compile-time assertion: WeatherSource must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn WeatherSource) {}
};

// ---------------------------------------------------------------------------
// Open-Meteo
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: ForecastCurrent,
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    temperature: f64,
    weathercode: i64,
    is_day: i64,
}

impl From<ForecastCurrent> for CurrentWeather {
    fn from(c: ForecastCurrent) -> Self {
        Self {
            temperature: c.temperature,
            condition_code: c.weathercode,
            is_day: c.is_day == 1,
        }
    }
}

/// [`WeatherSource`] backed by the Open-Meteo forecast API (no API key).
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_base_url(reqwest::Client::new(), OPEN_METEO_BASE_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url.trim_end_matches('/'))
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentWeather, WeatherError> {
        debug!(lat, lon, "requesting current weather");

        let response = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let forecast: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Decode(e.to_string()))?;
        Ok(forecast.current_weather.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_open_meteo_payload() {
        let body = r#"{
            "latitude": -23.5,
            "longitude": -46.625,
            "current_weather": {
                "time": "2025-03-01T14:00",
                "temperature": 28.4,
                "windspeed": 9.7,
                "winddirection": 120,
                "weathercode": 3,
                "is_day": 1
            }
        }"#;
        let forecast: ForecastResponse = serde_json::from_str(body).unwrap();
        let weather = CurrentWeather::from(forecast.current_weather);
        assert_eq!(
            weather,
            CurrentWeather {
                temperature: 28.4,
                condition_code: 3,
                is_day: true,
            }
        );
    }

    #[test]
    fn is_day_zero_is_night() {
        let current = ForecastCurrent {
            temperature: 12.0,
            weathercode: 0,
            is_day: 0,
        };
        assert!(!CurrentWeather::from(current).is_day);
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(CurrentWeather::FALLBACK).unwrap();
        assert_eq!(value["temperature"], 25.0);
        assert_eq!(value["conditionCode"], 0);
        assert_eq!(value["isDay"], true);
    }

    #[test]
    fn forecast_url_trims_trailing_slash() {
        let client = OpenMeteoClient::with_base_url(reqwest::Client::new(), "http://localhost:1/");
        assert_eq!(client.forecast_url(), "http://localhost:1/v1/forecast");
    }
}
