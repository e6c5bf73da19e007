//! Greeting banner: a motivational quote plus the local weather.
//!
//! Both lookups run concurrently and each degrades to its own fallback, so
//! [`dashboard_metadata`] never fails.

pub mod weather;

use serde::Serialize;
use tracing::warn;

use crate::model::TextModel;

pub use weather::{CurrentWeather, OpenMeteoClient, WeatherError, WeatherSource};

/// Prompt sent to the model for the daily quote.
pub const QUOTE_PROMPT: &str = "Write a short (at most 15 words), striking, stoic \
motivational sentence for a high-performing student. Return ONLY the sentence, \
without quotation marks.";

/// Quote shown when the model call fails or returns nothing.
pub const FALLBACK_QUOTE: &str = "Discipline is the bridge between goals and accomplishment.";

/// Everything the greeting banner displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetadata {
    pub quote: String,
    pub weather: CurrentWeather,
}

/// Fetch the quote and the weather concurrently.
pub async fn dashboard_metadata(
    model: &dyn TextModel,
    weather: &dyn WeatherSource,
    lat: f64,
    lon: f64,
) -> DashboardMetadata {
    let (quote, weather) = tokio::join!(fetch_quote(model), fetch_weather(weather, lat, lon));
    DashboardMetadata { quote, weather }
}

async fn fetch_quote(model: &dyn TextModel) -> String {
    match model.generate(QUOTE_PROMPT).await {
        Ok(text) => {
            let quote = text.trim();
            if quote.is_empty() {
                FALLBACK_QUOTE.to_string()
            } else {
                quote.to_string()
            }
        }
        Err(e) => {
            warn!(error = %e, "quote generation failed, using fallback");
            FALLBACK_QUOTE.to_string()
        }
    }
}

async fn fetch_weather(source: &dyn WeatherSource, lat: f64, lon: f64) -> CurrentWeather {
    match source.current(lat, lon).await {
        Ok(current) => current,
        Err(e) => {
            warn!(error = %e, lat, lon, "weather lookup failed, using fallback");
            CurrentWeather::FALLBACK
        }
    }
}
