//! Raw forecast streams as delivered by the gridpoint source

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::weather::period::decode_period;
use crate::weather::units::Unit;
use crate::{Result, WeatherBuilderError};

/// Physical quantities tracked in every hourly data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Quantity {
    Temperature,
    Dewpoint,
    SkyCover,
    ProbabilityOfPrecipitation,
    WindSpeed,
    QuantitativePrecipitation,
    SnowfallAmount,
}

impl Quantity {
    /// Every quantity, in assembly order
    pub const ALL: [Quantity; 7] = [
        Quantity::Temperature,
        Quantity::Dewpoint,
        Quantity::SkyCover,
        Quantity::ProbabilityOfPrecipitation,
        Quantity::WindSpeed,
        Quantity::QuantitativePrecipitation,
        Quantity::SnowfallAmount,
    ];

    /// Property name of this quantity in the gridpoint payload
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Quantity::Temperature => "temperature",
            Quantity::Dewpoint => "dewpoint",
            Quantity::SkyCover => "skyCover",
            Quantity::ProbabilityOfPrecipitation => "probabilityOfPrecipitation",
            Quantity::WindSpeed => "windSpeed",
            Quantity::QuantitativePrecipitation => "quantitativePrecipitation",
            Quantity::SnowfallAmount => "snowfallAmount",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// UTC start instant plus an ISO-8601 duration, wire form `<rfc3339>/<duration>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTimeInterval {
    pub start: DateTime<Utc>,
    /// Duration as received, e.g. `PT2H` or `P1DT6H`
    pub duration: String,
}

impl ValidTimeInterval {
    #[must_use]
    pub fn new(start: DateTime<Utc>, duration: impl Into<String>) -> Self {
        Self {
            start,
            duration: duration.into(),
        }
    }

    /// Whole hours covered by this interval
    pub fn hours(&self) -> Result<i64> {
        decode_period(&self.duration)
    }
}

impl FromStr for ValidTimeInterval {
    type Err = WeatherBuilderError;

    fn from_str(s: &str) -> Result<Self> {
        let (start, duration) = s.split_once('/').ok_or_else(|| {
            WeatherBuilderError::decode(format!("valid time '{s}' has no '/' separator"))
        })?;
        let start = DateTime::parse_from_rfc3339(start)
            .map_err(|e| {
                WeatherBuilderError::decode(format!("valid time '{s}' has a bad start: {e}"))
            })?
            .with_timezone(&Utc);
        Ok(Self::new(start, duration))
    }
}

impl fmt::Display for ValidTimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start.to_rfc3339(), self.duration)
    }
}

/// One value of an element stream and the interval it holds for
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastValue {
    /// Raw value text; parsed as a number during assembly
    pub value: String,
    pub valid_time: ValidTimeInterval,
}

impl ForecastValue {
    #[must_use]
    pub fn new(value: impl Into<String>, valid_time: ValidTimeInterval) -> Self {
        Self {
            value: value.into(),
            valid_time,
        }
    }
}

/// A source-ordered stream of values for one quantity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastElement {
    /// Unit-of-measure tag, e.g. `wmoUnit:degC`
    pub uom: String,
    pub values: Vec<ForecastValue>,
}

impl ForecastElement {
    #[must_use]
    pub fn new(uom: impl Into<String>) -> Self {
        Self {
            uom: uom.into(),
            values: Vec::new(),
        }
    }

    /// Append a value, builder style
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>, valid_time: ValidTimeInterval) -> Self {
        self.values.push(ForecastValue::new(value, valid_time));
        self
    }

    #[must_use]
    pub fn unit(&self) -> Unit {
        Unit::from(self.uom.as_str())
    }
}

/// Every element stream of one gridpoint forecast
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastPayload {
    /// Span of the whole forecast; its start is the issue instant
    pub valid_times: Option<ValidTimeInterval>,
    pub elements: BTreeMap<Quantity, ForecastElement>,
}

impl ForecastPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quantity: Quantity, element: ForecastElement) {
        self.elements.insert(quantity, element);
    }

    #[must_use]
    pub fn element(&self, quantity: Quantity) -> Option<&ForecastElement> {
        self.elements.get(&quantity)
    }
}
