//! Location model for configured places and their forecast grid

use serde::{Deserialize, Serialize};

use crate::{Result, WeatherBuilderError};

/// A place to build a forecast for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Short name, used in logs and reports
    pub name: String,
    /// Human-readable title, passed through to the rendering consumer
    #[serde(default)]
    pub title: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            latitude,
            longitude,
        }
    }

    /// Create location with a display title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Format location as the `lat,lon` path segment used by the points endpoint
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        let (lat, lon) = self.rounded_coordinates(4);
        format!("{lat},{lon}")
    }

    /// Round coordinates; the points endpoint redirects on more than four decimals
    #[must_use]
    pub fn rounded_coordinates(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Reject coordinates outside the valid latitude/longitude ranges
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(WeatherBuilderError::validation(format!(
                "latitude {} of '{}' is outside -90..=90",
                self.latitude, self.name
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(WeatherBuilderError::validation(format!(
                "longitude {} of '{}' is outside -180..=180",
                self.longitude, self.name
            )));
        }
        Ok(())
    }
}

/// Forecast office grid cell and timezone resolved for a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GridPoint {
    /// Forecast office identifier (e.g. `BOX`)
    pub grid_id: String,
    pub grid_x: u32,
    pub grid_y: u32,
    /// IANA timezone identifier (e.g. `America/New_York`)
    pub time_zone: String,
}

impl GridPoint {
    /// Path of the raw gridpoint forecast for this cell
    #[must_use]
    pub fn gridpoint_path(&self) -> String {
        format!("gridpoints/{}/{},{}", self.grid_id, self.grid_x, self.grid_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_format_coordinates() {
        let location = Location::new("Onset", 41.747_612, -70.667_649);
        assert_eq!(location.format_coordinates(), "41.7476,-70.6676");
    }

    #[test]
    fn test_location_rounded_coordinates() {
        let location = Location::new("Test", 46.818_234, 8.227_456);
        let (lat, lon) = location.rounded_coordinates(2);
        assert_eq!(lat, 46.82);
        assert_eq!(lon, 8.23);
    }

    #[test]
    fn test_location_validation() {
        assert!(Location::new("Nashua", 42.71, -71.46).validate().is_ok());
        assert!(Location::new("North", 90.5, 0.0).validate().is_err());
        assert!(Location::new("East", 0.0, 181.0).validate().is_err());
        assert!(Location::new("Nowhere", f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_gridpoint_path() {
        let grid = GridPoint {
            grid_id: "BOX".to_string(),
            grid_x: 55,
            grid_y: 102,
            time_zone: "America/New_York".to_string(),
        };
        assert_eq!(grid.gridpoint_path(), "gridpoints/BOX/55,102");
    }
}
