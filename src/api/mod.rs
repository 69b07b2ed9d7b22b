//! Forecast sources consulted before normalization
//!
//! The grid lookup and the payload fetch are the only asynchronous steps of a
//! build. Both sit behind [`ForecastSource`] so the builder can be driven by the
//! api.weather.gov client or by an in-memory source in tests.

use crate::Result;
use crate::models::{ForecastPayload, GridPoint, Location};

pub mod nws;

pub use nws::NwsClient;

// Futures are not required to be `Send`
#[allow(async_fn_in_trait)]
pub trait ForecastSource {
    /// Resolve a location's coordinates to a forecast office grid cell and its timezone
    async fn resolve_grid(&self, location: &Location) -> Result<GridPoint>;

    /// Fetch the raw per-quantity interval streams of a grid cell
    async fn fetch_forecast(&self, grid: &GridPoint) -> Result<ForecastPayload>;
}
