//! `syllabus greeting --lat X --lon Y`: quote and weather banner.

use anyhow::Result;

use syllabus_core::TextModel;
use syllabus_core::greeting::{CurrentWeather, DashboardMetadata, WeatherSource, dashboard_metadata};

pub async fn run_greeting(
    model: &dyn TextModel,
    weather: &dyn WeatherSource,
    lat: f64,
    lon: f64,
    json: bool,
) -> Result<()> {
    let meta = dashboard_metadata(model, weather, lat, lon).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&meta)?);
    } else {
        print!("{}", render_banner(&meta));
    }
    Ok(())
}

/// Short text label for a WMO weather code.
pub fn condition_label(code: i64) -> &'static str {
    match code {
        0 => "clear sky",
        1..=3 => "partly cloudy",
        45 | 48 => "fog",
        51..=57 => "drizzle",
        61..=67 | 80..=82 => "rain",
        71..=77 | 85 | 86 => "snow",
        95..=99 => "thunderstorm",
        _ => "unknown conditions",
    }
}

fn render_banner(meta: &DashboardMetadata) -> String {
    let CurrentWeather {
        temperature,
        condition_code,
        is_day,
    } = meta.weather;
    format!(
        "\"{}\"\n{temperature:.0}°C, {} ({})\n",
        meta.quote,
        condition_label(condition_code),
        if is_day { "day" } else { "night" }
    )
}
