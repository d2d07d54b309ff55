//! Delimited strings read by the legacy downstream client.
//!
//! Field order, separators and the `:FCAST:` marker are a wire format; keep
//! them byte-for-byte.

use crate::{
    error::ObservationError,
    index::{compute_humidex, compute_wind_chill},
    model::{CurrentObservation, ForecastContext, ForecastPeriod, parse_number},
};

const FIELD_SEP: &str = "__,.,__";

/// Observation attributes copied into the condition string, with their short keys.
const ATTRIBUTE_KEYS: [(&str, &str); 5] = [
    ("weather", "cond"),
    ("wind_dir", "wdir"),
    ("wind_mph", "speed"),
    ("relative_humidity", "humid"),
    ("observation_time", "obstime"),
];

const STATIC_PAIRS: [&str; 8] = [
    "gust:NA",
    "srise:na",
    "sset:na",
    "mrise:na",
    "mset:na",
    "hazard:NA",
    "hazardurl:NA",
    ":FCAST:",
];

/// `name:short__,.,__High:temp__,.,__detailed` per period, joined with `;`.
///
/// The High/Low label flips to "Low" on "with a low" and back to "High" on
/// "with a high", and otherwise carries over from the previous period.
pub fn build_forecast_string(periods: &[ForecastPeriod]) -> String {
    let mut high_or_low = "High";

    periods
        .iter()
        .map(|period| {
            let detailed = period.detailed_forecast.as_deref().unwrap_or_default();
            if detailed.contains("with a low") {
                high_or_low = "Low";
            } else if detailed.contains("with a high") {
                high_or_low = "High";
            }

            format!(
                "{name}:{short}{FIELD_SEP}{high_or_low}:{temp}{FIELD_SEP}{detailed}",
                name = period.name.as_deref().unwrap_or_default(),
                short = period.short_forecast.as_deref().unwrap_or_default(),
                temp = period.temp_as_int(),
            )
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Semicolon-joined summary of the current conditions with the forecast appended.
///
/// Fails when temperature or dew point cannot be read as numbers, or when
/// the humidity does not allow a humidex.
pub fn build_condition_string(
    obs: &CurrentObservation,
    context: &ForecastContext,
    periods: &[ForecastPeriod],
) -> Result<String, ObservationError> {
    let mut pairs = vec![
        format!("loc:{},{}", or_none(&context.city), or_none(&context.state)),
        format!("temp:{}", obs.temp_as_int()?),
        format!("dew:{}", obs.dew_point_as_int()?),
    ];

    for (attr, short_key) in ATTRIBUTE_KEYS {
        match obs.attribute(attr) {
            None => pairs.push(format!("{short_key}:NA")),
            Some(Some(value)) => pairs.push(format!("{short_key}:{value}")),
            Some(None) => {}
        }
    }

    let temp_f = number_or_zero("temp_f", obs.temp_f.as_deref())?;
    let wind_mph = number_or_zero("wind_mph", obs.wind_mph.as_deref())?;
    pairs.push(format!("chill:{}", compute_wind_chill(temp_f, wind_mph)));

    let temp_c = number_or_zero("temp_c", obs.temp_c.as_deref())?;
    let rel_humidity = number_or_zero("relative_humidity", obs.relative_humidity.as_deref())?;
    let humidex = compute_humidex(temp_c, rel_humidity)?;
    pairs.push(format!("humidx:{}", humidex as i64));

    pairs.extend(STATIC_PAIRS.iter().map(|p| p.to_string()));
    pairs.push(build_forecast_string(periods));

    Ok(pairs.join(";"))
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

/// Absent or empty text reads as zero.
fn number_or_zero(field: &'static str, value: Option<&str>) -> Result<f64, ObservationError> {
    let value = value.filter(|v| !v.is_empty());
    Ok(parse_number(field, value)?.unwrap_or(0.0))
}
