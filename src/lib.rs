//! Weather builder - dense hourly forecasts from api.weather.gov
//!
//! This library turns the run-length-encoded gridpoint forecast of the National
//! Weather Service into a 121-hour series aligned to the location's local
//! midnight, ready to be charted.

pub mod api;
pub mod builder;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod weather;

// Re-export core types for public API
pub use api::{ForecastSource, NwsClient};
pub use builder::WeatherBuilder;
pub use config::WeatherBuilderConfig;
pub use error::WeatherBuilderError;
pub use models::{DataPoint, ForecastPayload, Location, Quantity, WeatherDataset};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherBuilderError>;
