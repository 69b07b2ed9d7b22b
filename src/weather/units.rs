//! Conversion of raw gridpoint values into the units the dataset reports

/// Unit-of-measure tag attached to an element stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// `wmoUnit:degC`, reported in °F
    Celsius,
    /// `wmoUnit:km_h-1`, reported in mph
    KilometersPerHour,
    /// `wmoUnit:mm`, reported in inches
    Millimeters,
    /// Any other tag; values pass through unchanged
    Other(String),
}

impl From<&str> for Unit {
    fn from(tag: &str) -> Self {
        match tag {
            "wmoUnit:degC" => Unit::Celsius,
            "wmoUnit:km_h-1" => Unit::KilometersPerHour,
            "wmoUnit:mm" => Unit::Millimeters,
            other => Unit::Other(other.to_string()),
        }
    }
}

impl Unit {
    #[must_use]
    pub fn convert(&self, value: f64) -> f64 {
        match self {
            Unit::Celsius => celsius_to_fahrenheit(value),
            Unit::KilometersPerHour => kmh_to_mph(value),
            Unit::Millimeters => mm_to_inches(value),
            Unit::Other(_) => value,
        }
    }
}

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[must_use]
pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh / 1.60934
}

#[must_use]
pub fn mm_to_inches(mm: f64) -> f64 {
    mm * 0.0393701
}
