//! Placement of interval start instants in the local-time hourly window

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::models::dataset::TODAY_SLOT;
use crate::{Result, WeatherBuilderError};

/// Parse an IANA timezone identifier such as `America/New_York`
pub fn parse_time_zone(id: &str) -> Result<Tz> {
    id.parse::<Tz>()
        .map_err(|e| WeatherBuilderError::validation(format!("unknown time zone '{id}': {e}")))
}

/// Calendar date of `reference` in `tz`
#[must_use]
pub fn local_today(reference: DateTime<Utc>, tz: Tz) -> NaiveDate {
    reference.with_timezone(&tz).date_naive()
}

/// Window slot of the first hour of an interval starting at `start`.
///
/// Starts on an earlier local date than `reference` land in the yesterday band
/// (0-23), starts on the same date land at hour + 24. A start dated after today
/// is rejected.
pub fn resolve_start_slot(start: DateTime<Utc>, tz: Tz, reference: DateTime<Utc>) -> Result<usize> {
    let local = start.with_timezone(&tz);
    let today = local_today(reference, tz);
    let hour = local.hour() as usize;

    match local.date_naive().cmp(&today) {
        Ordering::Less => Ok(hour),
        Ordering::Equal => Ok(hour + TODAY_SLOT),
        Ordering::Greater => {
            warn!(
                "Interval starting {} is dated after local today {} in {}",
                local, today, tz
            );
            Err(WeatherBuilderError::alignment(format!(
                "interval starts on {} which is after local today {} in {}",
                local.date_naive(),
                today,
                tz
            )))
        }
    }
}
