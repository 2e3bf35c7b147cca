use std::fmt::{self, Display};

use crate::ForecastError;

/// Temperature units of the report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Units {
    /// Fahrenheit with the Celsius value in parentheses.
    #[default]
    Fahrenheit,
    /// Celsius only.
    Celsius,
}

impl Units {
    /// Parses units leniently: matching is case-insensitive, and a missing
    /// or unknown value means [`Units::Fahrenheit`].
    pub fn parse_lenient(units: Option<&str>) -> Self {
        match units.map(|u| u.trim().to_lowercase()).as_deref() {
            Some("celsius") => Units::Celsius,
            _ => Units::Fahrenheit,
        }
    }
}

impl Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Fahrenheit => f.write_str("fahrenheit"),
            Units::Celsius => f.write_str("celsius"),
        }
    }
}

/// A forecast query for one coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastRequest {
    /// Decimal degrees, -90 to 90.
    pub latitude: f64,
    /// Decimal degrees, -180 to 180.
    pub longitude: f64,
    /// Elevation in meters, improves temperature accuracy.
    pub altitude: Option<i32>,
    /// Display name used in the report heading.
    pub location_name: Option<String>,
    /// Temperature units of the report.
    pub units: Units,
}

impl ForecastRequest {
    /// Creates a request for a coordinate with default options.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            location_name: None,
            units: Units::default(),
        }
    }

    /// Checks the coordinate ranges.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ForecastError::InvalidLatitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ForecastError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }

    /// Returns the name shown in the report heading.
    #[inline]
    pub fn display_name(&self) -> &str {
        match self.location_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "the location",
        }
    }
}
