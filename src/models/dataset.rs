//! Hourly window and the trimmed dataset handed to renderers

use serde::{Deserialize, Serialize};

use crate::models::{Location, Quantity};

/// Slots in the internal window: local midnight yesterday through midnight six days out
pub const WINDOW_LEN: usize = 145;
/// Window slot holding local midnight of today
pub const TODAY_SLOT: usize = 24;
/// Data points in a returned dataset
pub const DATASET_LEN: usize = WINDOW_LEN - TODAY_SLOT;

/// Normalized values for one hour
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Hour offset from the first point of the series
    pub index: usize,
    /// Temperature in °F
    pub temperature: f64,
    /// Dew point in °F
    pub dewpoint: f64,
    /// Sky cover percentage (0-100)
    pub sky_cover: f64,
    /// Probability of precipitation percentage (0-100)
    pub probability_of_precipitation: f64,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Liquid precipitation in inches
    pub quantitative_precipitation: f64,
    /// Snowfall in inches
    pub snowfall_amount: f64,
}

impl DataPoint {
    #[must_use]
    pub fn get(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::Temperature => self.temperature,
            Quantity::Dewpoint => self.dewpoint,
            Quantity::SkyCover => self.sky_cover,
            Quantity::ProbabilityOfPrecipitation => self.probability_of_precipitation,
            Quantity::WindSpeed => self.wind_speed,
            Quantity::QuantitativePrecipitation => self.quantitative_precipitation,
            Quantity::SnowfallAmount => self.snowfall_amount,
        }
    }

    pub fn set(&mut self, quantity: Quantity, value: f64) {
        let field = match quantity {
            Quantity::Temperature => &mut self.temperature,
            Quantity::Dewpoint => &mut self.dewpoint,
            Quantity::SkyCover => &mut self.sky_cover,
            Quantity::ProbabilityOfPrecipitation => &mut self.probability_of_precipitation,
            Quantity::WindSpeed => &mut self.wind_speed,
            Quantity::QuantitativePrecipitation => &mut self.quantitative_precipitation,
            Quantity::SnowfallAmount => &mut self.snowfall_amount,
        };
        *field = value;
    }
}

/// Fixed 145-slot hourly buffer, slot 0 is local midnight of yesterday
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    slots: Vec<DataPoint>,
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Window {
    #[must_use]
    pub fn new() -> Self {
        let slots = (0..WINDOW_LEN)
            .map(|index| DataPoint {
                index,
                ..DataPoint::default()
            })
            .collect();
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[DataPoint] {
        &self.slots
    }

    /// Write `value` into up to `hours` slots starting at `start`.
    ///
    /// Writing stops at the end of the window; returns the number of slots written.
    pub fn fill(&mut self, quantity: Quantity, start: usize, hours: usize, value: f64) -> usize {
        let end = start.saturating_add(hours).min(WINDOW_LEN);
        if start >= end {
            return 0;
        }
        for slot in &mut self.slots[start..end] {
            slot.set(quantity, value);
        }
        end - start
    }

    /// Drop the yesterday band and re-index the remaining 121 slots from zero
    #[must_use]
    pub fn trim(self, time_zone: String, start_time: String, first_hour: u32) -> WeatherDataset {
        let data_points: Vec<DataPoint> = self
            .slots
            .into_iter()
            .skip(TODAY_SLOT)
            .enumerate()
            .map(|(index, point)| DataPoint { index, ..point })
            .collect();

        WeatherDataset {
            time_zone,
            start_time,
            first_hour,
            number_of_data_points: data_points.len(),
            data_points,
        }
    }
}

/// 121 hourly points starting at local midnight of today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherDataset {
    /// IANA timezone the series is aligned to
    pub time_zone: String,
    /// Local time of the first data point, `YYYY-MM-DDTHH:MM:SS`
    pub start_time: String,
    /// Local hour at which the forecast was issued (0-23)
    pub first_hour: u32,
    pub number_of_data_points: usize,
    pub data_points: Vec<DataPoint>,
}

impl WeatherDataset {
    /// The hourly series of a single quantity
    #[must_use]
    pub fn series(&self, quantity: Quantity) -> Vec<f64> {
        self.data_points.iter().map(|p| p.get(quantity)).collect()
    }
}

/// A built dataset together with the location it was built for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDataset {
    pub location: Location,
    pub dataset: WeatherDataset,
}
