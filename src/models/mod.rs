//! Data models for the weather builder
//!
//! This module contains the core domain models organized by concern:
//! - Location: configured places and their resolved forecast grid
//! - Forecast: raw per-quantity interval streams as delivered by the source
//! - Dataset: the dense hourly window and the trimmed caller-visible result

pub mod dataset;
pub mod forecast;
pub mod location;

// Re-export all public types for convenient access
pub use dataset::{DataPoint, LocationDataset, WeatherDataset, Window};
pub use forecast::{ForecastElement, ForecastPayload, ForecastValue, Quantity, ValidTimeInterval};
pub use location::{GridPoint, Location};
