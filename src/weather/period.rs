//! Decoding of ISO-8601 style `P[nD][T[nH]]` durations into whole hours

use crate::{Result, WeatherBuilderError};

/// Total hours encoded by a duration such as `PT2H`, `P1D` or `P2DT3H`.
///
/// Range checks are left to the caller; only integer parseability is enforced.
pub fn decode_period(period: &str) -> Result<i64> {
    let body = period
        .strip_prefix('P')
        .ok_or_else(|| WeatherBuilderError::decode(format!("period '{period}' must start with 'P'")))?;

    let (day_part, hour_part) = body.split_once('T').unwrap_or((body, ""));

    if day_part.is_empty() && hour_part.is_empty() {
        return Err(WeatherBuilderError::decode(format!(
            "period '{period}' has neither days nor hours"
        )));
    }

    let days = component(period, day_part, 'D')?;
    let hours = component(period, hour_part, 'H')?;

    days.checked_mul(24)
        .and_then(|h| h.checked_add(hours))
        .ok_or_else(|| WeatherBuilderError::decode(format!("period '{period}' overflows")))
}

fn component(period: &str, part: &str, designator: char) -> Result<i64> {
    if part.is_empty() {
        return Ok(0);
    }
    part.strip_suffix(designator)
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| {
            WeatherBuilderError::decode(format!(
                "period '{period}' has a bad component '{part}', expected <int>{designator}"
            ))
        })
}
