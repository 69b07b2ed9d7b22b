//! Merges every element stream of a gridpoint forecast into one hourly window
//!
//! Each element is aligned independently: the first value's start instant picks
//! the starting slot, and every value then covers as many consecutive slots as
//! its duration has hours. Slots a stream never reaches keep their zero default.
//! Any structural problem aborts the whole build; no partial dataset is returned.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::models::dataset::WINDOW_LEN;
use crate::models::{ForecastElement, ForecastPayload, Quantity, WeatherDataset, Window};
use crate::weather::alignment::{local_today, parse_time_zone, resolve_start_slot};
use crate::{Result, WeatherBuilderError};

/// Builds a [`WeatherDataset`] for one timezone and reference instant
#[derive(Debug, Clone)]
pub struct DatasetAssembler {
    time_zone: String,
    tz: Tz,
    reference: DateTime<Utc>,
}

impl DatasetAssembler {
    /// `reference` fixes "now" for the yesterday/today boundary
    pub fn new(time_zone: &str, reference: DateTime<Utc>) -> Result<Self> {
        let tz = parse_time_zone(time_zone)?;
        Ok(Self {
            time_zone: time_zone.to_string(),
            tz,
            reference,
        })
    }

    pub fn assemble(&self, payload: &ForecastPayload) -> Result<WeatherDataset> {
        let mut window = Window::new();

        for quantity in Quantity::ALL {
            let element = payload
                .element(quantity)
                .ok_or_else(|| WeatherBuilderError::missing_quantity(quantity))?;
            let written = self.merge_element(&mut window, quantity, element)?;
            debug!(
                "Processed element {} ({} values, {} slots written)",
                quantity,
                element.values.len(),
                written
            );
        }

        let today = local_today(self.reference, self.tz);
        let start_time = today.format("%Y-%m-%dT00:00:00").to_string();

        Ok(window.trim(self.time_zone.clone(), start_time, self.first_hour(payload)))
    }

    fn merge_element(
        &self,
        window: &mut Window,
        quantity: Quantity,
        element: &ForecastElement,
    ) -> Result<usize> {
        let Some(first) = element.values.first() else {
            return Ok(0);
        };

        let unit = element.unit();
        let mut index = resolve_start_slot(first.valid_time.start, self.tz, self.reference)?;
        let start = index;

        for value in &element.values {
            if index >= WINDOW_LEN {
                break;
            }

            let hours = value.valid_time.hours()?;
            if hours <= 0 {
                return Err(WeatherBuilderError::decode(format!(
                    "element {quantity} has a non-positive period '{}'",
                    value.valid_time.duration
                )));
            }

            // f64 parsing also accepts "NaN" and "inf"
            let raw = value
                .value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|raw| raw.is_finite())
                .ok_or_else(|| {
                    WeatherBuilderError::decode(format!(
                        "element {quantity} has a non-numeric value '{}'",
                        value.value
                    ))
                })?;

            let slots = usize::try_from(hours).unwrap_or(usize::MAX);
            index += window.fill(quantity, index, slots, unit.convert(raw));
        }

        Ok(index - start)
    }

    /// Local hour the forecast was issued, when that falls on local today
    fn first_hour(&self, payload: &ForecastPayload) -> u32 {
        payload
            .valid_times
            .as_ref()
            .map(|valid| valid.start.with_timezone(&self.tz))
            .filter(|issued| issued.date_naive() == local_today(self.reference, self.tz))
            .map_or(0, |issued| issued.hour())
    }
}

/// Assemble `payload` into a dataset aligned to `time_zone` as of `reference`
pub fn assemble(
    payload: &ForecastPayload,
    time_zone: &str,
    reference: DateTime<Utc>,
) -> Result<WeatherDataset> {
    DatasetAssembler::new(time_zone, reference)?.assemble(payload)
}
