use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use workflow_bridge::WeatherReport;

use crate::weather::WeatherProvider;

const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,wind_gusts_10m,weather_code";

/// Errors raised while resolving weather through open-meteo.
#[derive(Debug, Error)]
pub enum MeteoError {
    /// Network request to the weather service failed.
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Geocoding returned no match for the requested place.
    #[error("location '{0}' not found")]
    LocationNotFound(String),
}

/// Direct weather source: geocode the location, then query the forecast API
/// for current conditions.
pub struct MeteoClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl MeteoClient {
    pub fn new() -> Result<Self, MeteoError> {
        Self::with_endpoints(DEFAULT_GEOCODING_URL, DEFAULT_FORECAST_URL)
    }

    pub fn with_endpoints(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
    ) -> Result<Self, MeteoError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
        })
    }

    async fn fetch_current(&self, location: &str) -> Result<WeatherReport, MeteoError> {
        let geocoding: GeocodingReply = self
            .http
            .get(&self.geocoding_url)
            .query(&[("name", location), ("count", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let place = geocoding
            .results
            .into_iter()
            .next()
            .ok_or_else(|| MeteoError::LocationNotFound(location.to_string()))?;
        debug!(
            location,
            latitude = place.latitude,
            longitude = place.longitude,
            "geocoded location"
        );

        let forecast: ForecastReply = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let current = forecast.current;
        Ok(WeatherReport {
            temperature: current.temperature_2m,
            feels_like: current.apparent_temperature,
            humidity: current.relative_humidity_2m,
            wind_speed: current.wind_speed_10m,
            wind_gust: current.wind_gusts_10m,
            conditions: describe_weather_code(current.weather_code).to_string(),
            location: place.name,
        })
    }
}

#[derive(Deserialize)]
struct GeocodingReply {
    #[serde(default)]
    results: Vec<GeocodingMatch>,
}

#[derive(Deserialize)]
struct GeocodingMatch {
    latitude: f64,
    longitude: f64,
    name: String,
}

#[derive(Deserialize)]
struct ForecastReply {
    current: CurrentConditions,
}

#[derive(Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    wind_gusts_10m: f64,
    weather_code: u16,
}

#[async_trait]
impl WeatherProvider for MeteoClient {
    async fn current_weather(&self, location: &str) -> Result<WeatherReport> {
        Ok(self.fetch_current(location).await?)
    }
}

/// Human-readable description for a WMO weather interpretation code.
pub fn describe_weather_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client(server: &mockito::Server) -> MeteoClient {
        MeteoClient::with_endpoints(
            format!("{}/v1/search", server.url()),
            format!("{}/v1/forecast", server.url()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn geocodes_then_reads_current_conditions() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/search")
            .match_query(mockito::Matcher::UrlEncoded("name".into(), "Lyon".into()))
            .with_status(200)
            .with_body(
                json!({
                    "results": [
                        { "latitude": 45.76, "longitude": 4.84, "name": "Lyon" }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/v1/forecast")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "current": {
                        "time": "2025-01-10T09:00",
                        "temperature_2m": 3.5,
                        "apparent_temperature": 1.0,
                        "relative_humidity_2m": 88,
                        "wind_speed_10m": 14.2,
                        "wind_gusts_10m": 27.0,
                        "weather_code": 71
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let report = test_client(&server).fetch_current("Lyon").await.unwrap();
        assert_eq!(report.temperature, 3.5);
        assert_eq!(report.feels_like, 1.0);
        assert_eq!(report.humidity, 88.0);
        assert_eq!(report.wind_speed, 14.2);
        assert_eq!(report.wind_gust, 27.0);
        assert_eq!(report.conditions, "Slight snow fall");
        assert_eq!(report.location, "Lyon");
    }

    #[tokio::test]
    async fn unknown_location_is_an_error_naming_the_place() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/search")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(json!({ "results": [] }).to_string())
            .create_async()
            .await;

        let err = test_client(&server)
            .fetch_current("Nowhereville")
            .await
            .unwrap_err();
        assert!(matches!(err, MeteoError::LocationNotFound(ref name) if name == "Nowhereville"));
        assert!(err.to_string().contains("Nowhereville"));
    }

    #[test]
    fn weather_codes_map_to_descriptions() {
        assert_eq!(describe_weather_code(0), "Clear sky");
        assert_eq!(describe_weather_code(2), "Partly cloudy");
        assert_eq!(describe_weather_code(95), "Thunderstorm");
        assert_eq!(describe_weather_code(42), "Unknown");
    }
}
