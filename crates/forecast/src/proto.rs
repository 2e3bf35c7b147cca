//! Wire types of the location forecast document.
//!
//! Only the fields the report uses are modeled. Every level is optional so
//! that a sparse document degrades to missing report lines instead of a
//! parse failure.

use serde::Deserialize;

/// The root of a location forecast response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LocationForecast {
    /// Forecast payload.
    #[serde(default)]
    pub properties: Properties,
}

/// Forecast payload.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Properties {
    /// Time series in chronological order, hourly near the start.
    #[serde(default)]
    pub timeseries: Vec<TimeStep>,
}

/// One point of the time series.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TimeStep {
    /// ISO 8601 timestamp, e.g. `2026-06-01T12:00:00Z`.
    #[serde(default)]
    pub time: String,
    /// Observations and summaries for this point.
    #[serde(default)]
    pub data: StepData,
}

/// Observations and summaries for a point in time.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StepData {
    /// Instantaneous values.
    #[serde(default)]
    pub instant: Instant,
    /// Summary of the following hour.
    #[serde(default)]
    pub next_1_hours: Option<Period>,
    /// Summary of the following six hours.
    #[serde(default)]
    pub next_6_hours: Option<Period>,
}

impl StepData {
    /// Returns the shortest non-empty period summary.
    pub fn nearest_period(&self) -> Option<&Period> {
        [&self.next_1_hours, &self.next_6_hours]
            .into_iter()
            .flatten()
            .find(|period| !period.is_empty())
    }

    /// Returns the instant air temperature in Celsius.
    #[inline]
    pub fn air_temperature(&self) -> Option<f64> {
        self.instant.details.air_temperature
    }
}

/// Wrapper of instantaneous values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Instant {
    /// The values.
    #[serde(default)]
    pub details: InstantDetails,
}

/// Instantaneous values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct InstantDetails {
    /// Celsius.
    pub air_temperature: Option<f64>,
    /// Meters per second.
    pub wind_speed: Option<f64>,
    /// Degrees.
    pub wind_from_direction: Option<f64>,
    /// Percent.
    pub relative_humidity: Option<f64>,
}

/// Summary of a period following a time step.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Period {
    /// Symbolic summary.
    #[serde(default)]
    pub summary: Option<Summary>,
    /// Aggregated values.
    #[serde(default)]
    pub details: Option<PeriodDetails>,
}

impl Period {
    /// Returns whether the period carries neither summary nor details.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.details.is_none()
    }

    /// Returns the weather symbol, e.g. `partlycloudy_day`.
    #[inline]
    pub fn symbol_code(&self) -> Option<&str> {
        self.summary.as_ref()?.symbol_code.as_deref()
    }

    /// Returns the expected precipitation in millimeters.
    #[inline]
    pub fn precipitation_amount(&self) -> Option<f64> {
        self.details.as_ref()?.precipitation_amount
    }
}

/// Symbolic summary of a period.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Summary {
    /// Weather symbol.
    pub symbol_code: Option<String>,
}

/// Aggregated values of a period.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PeriodDetails {
    /// Millimeters.
    pub precipitation_amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sparse_document() {
        let doc: LocationForecast = serde_json::from_value(json!({
            "properties": {
                "timeseries": [
                    { "time": "2026-06-01T12:00:00Z", "data": {} },
                    {
                        "time": "2026-06-01T13:00:00Z",
                        "data": {
                            "instant": { "details": { "air_temperature": 21.5 } },
                            "next_1_hours": {},
                            "next_6_hours": {
                                "summary": { "symbol_code": "rain" },
                                "details": { "precipitation_amount": 1.2 }
                            }
                        }
                    }
                ]
            }
        }))
        .unwrap();

        let steps = &doc.properties.timeseries;
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].data.air_temperature(), None);
        assert!(steps[0].data.nearest_period().is_none());

        // An empty one-hour block falls through to the six-hour one.
        let period = steps[1].data.nearest_period().unwrap();
        assert_eq!(period.symbol_code(), Some("rain"));
        assert_eq!(period.precipitation_amount(), Some(1.2));
    }

    #[test]
    fn test_missing_properties() {
        let doc: LocationForecast =
            serde_json::from_value(json!({ "type": "Feature" })).unwrap();
        assert!(doc.properties.timeseries.is_empty());
    }
}
