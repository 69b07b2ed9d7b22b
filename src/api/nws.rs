//! api.weather.gov client
//!
//! Coordinates are resolved through `/points/{lat},{lon}`, which names the
//! forecast office grid cell and its timezone. The raw forecast of that cell is
//! read from `/gridpoints/{office}/{x},{y}`, where every quantity is a list of
//! values each valid for an ISO-8601 interval such as
//! `2024-05-10T04:00:00+00:00/PT2H`.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::api::ForecastSource;
use crate::config::{MAX_RETRY_BACKOFF, NwsConfig};
use crate::models::{
    ForecastElement, ForecastPayload, ForecastValue, GridPoint, Location, Quantity,
    ValidTimeInterval,
};
use crate::{Result, WeatherBuilderError};

/// Responses slower than this are logged as slow
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// HTTP client for the National Weather Service API
pub struct NwsClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl NwsClient {
    /// Create a new client; the configured contact string is sent as `User-Agent`
    pub fn new(config: &NwsConfig) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            return Err(WeatherBuilderError::validation(
                "a contact string (user agent) is required by api.weather.gov",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WeatherBuilderError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), MAX_RETRY_BACKOFF)
            .build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(|e| WeatherBuilderError::api(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(WeatherBuilderError::api(format!(
                "{url} not found (HTTP 404), the location may be outside the NWS coverage area"
            )));
        }
        if !status.is_success() {
            return Err(WeatherBuilderError::api(format!(
                "GET {url} failed with status: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let body = response.json::<T>().await.map_err(|e| {
            error!("Failed to parse response of {}: {}", url, e);
            WeatherBuilderError::api(format!("Invalid response from {url}: {e}"))
        })?;

        let total_duration = start_time.elapsed();
        info!("GET {} took {:.3}s", path, total_duration.as_secs_f64());
        if total_duration > SLOW_RESPONSE {
            warn!("Slow API response detected: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(body)
    }
}

impl ForecastSource for NwsClient {
    #[instrument(skip(self, location), fields(location = %location.name))]
    async fn resolve_grid(&self, location: &Location) -> Result<GridPoint> {
        let coordinates = location.format_coordinates();
        let response: PointResponse = self.get_json(&format!("points/{coordinates}")).await?;
        let grid = response.into_grid_point();
        debug!(
            "Resolved {} to {} in {}",
            coordinates,
            grid.gridpoint_path(),
            grid.time_zone
        );
        Ok(grid)
    }

    #[instrument(skip(self, grid), fields(grid = %grid.gridpoint_path()))]
    async fn fetch_forecast(&self, grid: &GridPoint) -> Result<ForecastPayload> {
        let response: GridpointResponse = self.get_json(&grid.gridpoint_path()).await?;
        response.into_payload()
    }
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    grid_id: String,
    grid_x: u32,
    grid_y: u32,
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct GridpointResponse {
    properties: GridpointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridpointProperties {
    valid_times: Option<String>,
    temperature: Option<RawElement>,
    dewpoint: Option<RawElement>,
    sky_cover: Option<RawElement>,
    probability_of_precipitation: Option<RawElement>,
    wind_speed: Option<RawElement>,
    quantitative_precipitation: Option<RawElement>,
    snowfall_amount: Option<RawElement>,
}

impl GridpointProperties {
    fn take(&mut self, quantity: Quantity) -> Option<RawElement> {
        match quantity {
            Quantity::Temperature => self.temperature.take(),
            Quantity::Dewpoint => self.dewpoint.take(),
            Quantity::SkyCover => self.sky_cover.take(),
            Quantity::ProbabilityOfPrecipitation => self.probability_of_precipitation.take(),
            Quantity::WindSpeed => self.wind_speed.take(),
            Quantity::QuantitativePrecipitation => self.quantitative_precipitation.take(),
            Quantity::SnowfallAmount => self.snowfall_amount.take(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(default)]
    uom: String,
    values: Vec<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValue {
    valid_time: String,
    #[serde(default)]
    value: Value,
}

impl RawValue {
    fn into_value(self) -> Result<ForecastValue> {
        let text = match self.value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Ok(ForecastValue::new(text, self.valid_time.parse::<ValidTimeInterval>()?))
    }
}

impl PointResponse {
    fn into_grid_point(self) -> GridPoint {
        let properties = self.properties;
        GridPoint {
            grid_id: properties.grid_id,
            grid_x: properties.grid_x,
            grid_y: properties.grid_y,
            time_zone: properties.time_zone,
        }
    }
}

impl GridpointResponse {
    /// Quantities absent from the body are absent from the payload; the
    /// assembler decides whether that is fatal.
    fn into_payload(self) -> Result<ForecastPayload> {
        let mut properties = self.properties;

        let mut payload = ForecastPayload::new();
        payload.valid_times = properties
            .valid_times
            .as_deref()
            .map(str::parse::<ValidTimeInterval>)
            .transpose()?;

        for quantity in Quantity::ALL {
            let Some(raw) = properties.take(quantity) else {
                warn!("Element {} not found in gridpoint response", quantity);
                continue;
            };
            let values = raw
                .values
                .into_iter()
                .map(RawValue::into_value)
                .collect::<Result<Vec<_>>>()?;
            payload.insert(
                quantity,
                ForecastElement {
                    uom: raw.uom,
                    values,
                },
            );
        }

        Ok(payload)
    }
}

/// Parse a `/points` response body
pub fn parse_point(body: &str) -> Result<GridPoint> {
    let response: PointResponse = serde_json::from_str(body)
        .map_err(|e| WeatherBuilderError::api(format!("Invalid points response: {e}")))?;
    Ok(response.into_grid_point())
}

/// Parse a `/gridpoints` response body into the element streams the dataset tracks
pub fn parse_gridpoint(body: &str) -> Result<ForecastPayload> {
    let response: GridpointResponse = serde_json::from_str(body)
        .map_err(|e| WeatherBuilderError::api(format!("Invalid gridpoint response: {e}")))?;
    response.into_payload()
}
