//! wttr.in API client
//!
//! One GET per search: `{base_url}/{city}?format=j1`. The response is checked
//! in a fixed order (status, content type, payload shape) and every failure is
//! classified into a [`FetchError`] whose `Display` is the user-facing message.

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::state::WeatherReport;

// ============================================================================
// Errors
// ============================================================================

/// Why a fetch did not produce a [`WeatherReport`]
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Provider answered with a non-success status
    #[error("'{city}' not found. Please check the spelling or try another location.")]
    NotFound { city: String },

    /// Body is not JSON (wrong content type, or unparseable)
    #[error("Received an unexpected response from the weather service.")]
    UnexpectedFormat,

    /// JSON without a usable `current_condition` section
    #[error("Weather data for this location is incomplete. Please try another city.")]
    IncompleteData,

    /// Request never completed (DNS, connect, reset, timeout)
    #[error("Could not connect to the weather service. Please check your internet connection.")]
    Network(#[source] reqwest::Error),

    /// Fetch task panicked or was aborted before producing an outcome
    #[error("The weather request was interrupted. Please try again.")]
    Interrupted,
}

// ============================================================================
// Wire format (format=j1), consumed fields only
// ============================================================================

#[derive(Debug, Deserialize)]
struct WttrResponse {
    #[serde(default)]
    current_condition: Option<Vec<WttrCondition>>,
    #[serde(default, deserialize_with = "lenient")]
    nearest_area: Option<Vec<WttrArea>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WttrCondition {
    #[serde(rename = "temp_C", deserialize_with = "lenient_string")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC", deserialize_with = "lenient_string")]
    feels_like_c: String,
    #[serde(rename = "windspeedKmph", deserialize_with = "lenient_string")]
    windspeed_kmph: String,
    #[serde(deserialize_with = "lenient_string")]
    humidity: String,
    #[serde(rename = "weatherDesc", deserialize_with = "lenient")]
    weather_desc: Vec<WttrValue>,
    #[serde(rename = "weatherCode", deserialize_with = "lenient_string")]
    weather_code: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WttrArea {
    #[serde(rename = "areaName", deserialize_with = "lenient")]
    area_name: Vec<WttrValue>,
    #[serde(deserialize_with = "lenient")]
    country: Vec<WttrValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WttrValue {
    #[serde(deserialize_with = "lenient_string")]
    value: String,
}

/// wttr.in sends numbers as strings; accept bare numbers and nulls as well.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Optional sections with the wrong shape decode as absent, so only
/// `current_condition` can reject a payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn first_value(values: &[WttrValue]) -> String {
    values.first().map(|v| v.value.clone()).unwrap_or_default()
}

/// Validate a decoded payload and flatten it into a [`WeatherReport`].
///
/// `city` names the place when the provider omits `nearest_area`.
pub fn parse_report(body: &[u8], city: &str) -> Result<WeatherReport, FetchError> {
    let data: WttrResponse = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "weather payload is not valid JSON");
        FetchError::UnexpectedFormat
    })?;

    let condition = data
        .current_condition
        .and_then(|conditions| conditions.into_iter().next())
        .ok_or(FetchError::IncompleteData)?;

    let area = data.nearest_area.and_then(|areas| areas.into_iter().next());
    let (area_name, country) = match area {
        Some(area) => (first_value(&area.area_name), first_value(&area.country)),
        None => (city.to_string(), String::new()),
    };
    let area_name = if area_name.is_empty() {
        city.to_string()
    } else {
        area_name
    };

    Ok(WeatherReport {
        area_name,
        country,
        temp_c: condition.temp_c,
        feels_like_c: condition.feels_like_c,
        windspeed_kmph: condition.windspeed_kmph,
        humidity: condition.humidity,
        description: first_value(&condition.weather_desc),
        weather_code: condition.weather_code,
    })
}

fn is_json_content_type(value: Option<&str>) -> bool {
    value.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for wttr.in; cheap to clone (shares the connection pool)
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl WeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request URL for `city`; the city is percent-encoded into one path segment
    pub fn request_url(&self, city: &str) -> String {
        format!(
            "{}/{}?format=j1",
            self.config.normalized_base_url(),
            urlencoding::encode(city)
        )
    }

    /// Fetch current conditions for an already-trimmed city name
    #[instrument(skip(self))]
    pub async fn fetch_current(&self, city: &str) -> Result<WeatherReport, FetchError> {
        let url = self.request_url(city);
        debug!(%url, "requesting weather");

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "weather request failed");
            FetchError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "provider rejected city");
            return Err(FetchError::NotFound {
                city: city.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        if !is_json_content_type(content_type) {
            warn!(?content_type, "unexpected content type");
            return Err(FetchError::UnexpectedFormat);
        }

        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, "reading weather body failed");
            FetchError::Network(e)
        })?;

        let report = parse_report(&body, city)?;
        debug!(area = %report.area_name, code = %report.weather_code, "weather loaded");
        Ok(report)
    }
}
