use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current conditions for one location, with every field guaranteed to be
/// populated. Produced fresh per request and handed straight to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub conditions: String,
    pub location: String,
}

// Alias tables, in resolution precedence order. External workflows deliver
// the same semantic attribute under any of these names.
const TEMPERATURE_ALIASES: &[&str] = &["temperature", "temp", "current_temp"];
const FEELS_LIKE_ALIASES: &[&str] = &["feelsLike", "apparent_temp", "feels_like"];
const HUMIDITY_ALIASES: &[&str] = &["humidity", "humidity_percent", "relative_humidity"];
const WIND_SPEED_ALIASES: &[&str] = &["windSpeed", "wind_kmh", "wind_speed"];
const WIND_GUST_ALIASES: &[&str] = &["windGust", "wind_gust", "gust_speed"];
const CONDITIONS_ALIASES: &[&str] = &["conditions", "weather_desc", "description"];
const LOCATION_ALIASES: &[&str] = &["location", "city_name", "city"];

const DEFAULT_CONDITIONS: &str = "Partly cloudy";

/// Coerce an arbitrarily-shaped payload into a [`WeatherReport`]. Each field
/// takes the first well-typed value among its aliases; a value of the wrong
/// JSON type counts as absent. Fields with no usable alias get defaults, and
/// `location` falls back to the caller-supplied string.
pub fn normalize_weather(payload: &Map<String, Value>, fallback_location: &str) -> WeatherReport {
    WeatherReport {
        temperature: number_field(payload, TEMPERATURE_ALIASES, 22.0),
        feels_like: number_field(payload, FEELS_LIKE_ALIASES, 24.0),
        humidity: number_field(payload, HUMIDITY_ALIASES, 65.0),
        wind_speed: number_field(payload, WIND_SPEED_ALIASES, 10.0),
        wind_gust: number_field(payload, WIND_GUST_ALIASES, 15.0),
        conditions: string_field(payload, CONDITIONS_ALIASES)
            .unwrap_or_else(|| DEFAULT_CONDITIONS.to_string()),
        location: string_field(payload, LOCATION_ALIASES)
            .unwrap_or_else(|| fallback_location.to_string()),
    }
}

fn number_field(payload: &Map<String, Value>, aliases: &[&str], default: f64) -> f64 {
    aliases
        .iter()
        .find_map(|alias| payload.get(*alias).and_then(Value::as_f64))
        .unwrap_or(default)
}

fn string_field(payload: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| payload.get(*alias).and_then(Value::as_str))
        .map(str::to_string)
}
