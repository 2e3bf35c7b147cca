//! Turns a forecast document into the text report.

use std::fmt::Write as _;

use crate::proto::{LocationForecast, TimeStep};
use crate::request::{ForecastRequest, Units};
use crate::ForecastError;

/// Distance between sampled entries of the time series.
pub const SAMPLE_STRIDE: usize = 6;
/// Number of leading entries considered for the daily rows, three days at
/// hourly resolution.
pub const SAMPLE_HORIZON: usize = 72;
/// Distance between emitted rows within the sampled entries.
pub const DAY_STRIDE: usize = 4;
/// Maximum number of daily rows.
pub const MAX_DAYS: usize = 3;

const ATTRIBUTION: &str =
    "Data provided by yr.no / Norwegian Meteorological Institute";

/// One row of the multi-day section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailySample<'a> {
    /// The time step the row was taken from.
    pub time: &'a str,
    /// Celsius.
    pub air_temperature: f64,
    /// Six-hour weather symbol of that step.
    pub symbol_code: Option<&'a str>,
}

impl DailySample<'_> {
    /// Returns the date part of the timestamp.
    #[inline]
    pub fn date(&self) -> &str {
        self.time.get(..10).unwrap_or(self.time)
    }
}

/// Picks the rows of the multi-day section.
///
/// Every [`SAMPLE_STRIDE`]th entry among the first [`SAMPLE_HORIZON`] is
/// taken, entries without a temperature are dropped, and of what remains
/// every [`DAY_STRIDE`]th is kept, up to [`MAX_DAYS`] rows.
pub fn sample_days(timeseries: &[TimeStep]) -> Vec<DailySample<'_>> {
    let horizon = timeseries.len().min(SAMPLE_HORIZON);
    timeseries[..horizon]
        .iter()
        .step_by(SAMPLE_STRIDE)
        .filter_map(|step| {
            Some(DailySample {
                time: &step.time,
                air_temperature: step.data.air_temperature()?,
                symbol_code: step
                    .data
                    .next_6_hours
                    .as_ref()
                    .and_then(|period| period.symbol_code()),
            })
        })
        .step_by(DAY_STRIDE)
        .take(MAX_DAYS)
        .collect()
}

/// Formats a Celsius temperature in the requested units.
pub fn format_temperature(celsius: f64, units: Units) -> String {
    match units {
        Units::Celsius => format!("{celsius:.1}°C"),
        Units::Fahrenheit => {
            let fahrenheit = celsius * 9.0 / 5.0 + 32.0;
            format!("{fahrenheit:.1}°F ({celsius:.1}°C)")
        }
    }
}

/// Turns a symbol code such as `partlycloudy_day` into `Partlycloudy Day`.
pub fn describe_symbol(symbol_code: &str) -> String {
    let mut result = String::with_capacity(symbol_code.len());
    let mut prev_is_alpha = false;
    for c in symbol_code.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_alpha {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            result.push(c);
            prev_is_alpha = false;
        }
    }
    result
}

/// Renders the report for a forecast document.
pub fn format_report(
    forecast: &LocationForecast,
    request: &ForecastRequest,
) -> Result<String, ForecastError> {
    let timeseries = &forecast.properties.timeseries;
    let Some(current) = timeseries.first() else {
        return Err(ForecastError::NoData);
    };
    let units = request.units;
    let details = &current.data.instant.details;
    let period = current.data.nearest_period();

    let mut report = String::new();
    write_report(&mut report, |r| {
        writeln!(r, "**Weather Forecast for {}**", request.display_name())?;
        writeln!(r)?;

        writeln!(r, "**Current Conditions:**")?;
        if let Some(temperature) = details.air_temperature {
            writeln!(
                r,
                "- Temperature: {}",
                format_temperature(temperature, units)
            )?;
        }
        writeln!(
            r,
            "- Wind: {:.1} m/s from {:.0}°",
            details.wind_speed.unwrap_or(0.0),
            details.wind_from_direction.unwrap_or(0.0)
        )?;
        writeln!(
            r,
            "- Humidity: {:.0}%",
            details.relative_humidity.unwrap_or(0.0)
        )?;
        if let Some(amount) = period.and_then(|p| p.precipitation_amount()) {
            if amount > 0.0 {
                writeln!(r, "- Precipitation: {amount:.1} mm")?;
            }
        }
        if let Some(symbol_code) = period.and_then(|p| p.symbol_code()) {
            writeln!(r, "- Conditions: {}", describe_symbol(symbol_code))?;
        }

        writeln!(r)?;
        writeln!(r, "**3-Day Forecast:**")?;
        for day in sample_days(timeseries) {
            write!(
                r,
                "\n- {}: {}, {}",
                day.date(),
                format_temperature(day.air_temperature, units),
                describe_symbol(day.symbol_code.unwrap_or("unknown"))
            )?;
        }

        write!(r, "\n\n---\n")?;
        write!(
            r,
            "Coordinates: {:?}°, {:?}°",
            request.latitude, request.longitude
        )?;
        if let Some(altitude) = request.altitude.filter(|a| *a != 0) {
            write!(r, " at {altitude}m elevation")?;
        }
        write!(r, "\n{ATTRIBUTION}")
    });
    Ok(report)
}

#[inline]
fn write_report<F>(report: &mut String, f: F)
where
    F: FnOnce(&mut String) -> std::fmt::Result,
{
    // Writing into a `String` cannot fail.
    f(report).ok();
}
