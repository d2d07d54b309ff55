use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ObservationError;

/// Latitude/longitude as returned by the geocoder, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub lat: String,
    pub lon: String,
}

/// Location metadata produced by grid resolution and read by every later step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastContext {
    pub city: Option<String>,
    pub state: Option<String>,
    pub forecast_zone_url: Option<String>,
    /// Last path segment of `forecast_zone_url`, e.g. `NYZ072`.
    pub forecast_zone: Option<String>,
}

impl ForecastContext {
    pub fn new(city: Option<String>, state: Option<String>, forecast_zone_url: Option<String>) -> Self {
        let forecast_zone = forecast_zone_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .and_then(|url| url.rsplit('/').next())
            .map(str::to_owned);

        Self { city, state, forecast_zone_url, forecast_zone }
    }
}

/// Result of resolving coordinates against the forecast grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPoint {
    pub forecast_url: Option<String>,
    pub context: ForecastContext,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub number: Option<u32>,
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_daytime: Option<bool>,
    pub temperature: f64,
    pub temperature_unit: Option<String>,
    pub temperature_trend: Option<String>,
    #[serde(rename = "probabilityOfPrecipitation", deserialize_with = "precip::deserialize", default)]
    pub precip_percent: Option<f64>,
    pub wind_speed: Option<String>,
    pub wind_direction: Option<String>,
    pub icon: Option<String>,
    pub short_forecast: Option<String>,
    pub detailed_forecast: Option<String>,
}

impl ForecastPeriod {
    pub fn temp_as_int(&self) -> i64 {
        self.temperature.trunc() as i64
    }
}

/// `probabilityOfPrecipitation` arrives as `{"unitCode": ..., "value": n}`.
mod precip {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    struct Quantity {
        #[serde(default)]
        value: Option<f64>,
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let q: Option<Quantity> = Option::deserialize(d)?;
        Ok(q.and_then(|q| q.value))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    pub update_time: Option<String>,
    pub periods: Vec<ForecastPeriod>,
}

/// Names of the observation fields, in document order.
pub const OBSERVATION_FIELDS: [&str; 25] = [
    "location",
    "station_id",
    "latitude",
    "longitude",
    "observation_time",
    "weather",
    "temperature_string",
    "temp_f",
    "temp_c",
    "relative_humidity",
    "wind_string",
    "wind_dir",
    "wind_degrees",
    "wind_mph",
    "wind_kt",
    "pressure_string",
    "pressure_mb",
    "pressure_in",
    "dewpoint_string",
    "dewpoint_f",
    "dewpoint_c",
    "visibility_mi",
    "icon_url_base",
    "icon_url_name",
    "ob_url",
];

/// A station's latest observation. Every field is optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentObservation {
    pub location: Option<String>,
    pub station_id: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub observation_time: Option<String>,
    pub weather: Option<String>,
    pub temperature_string: Option<String>,
    pub temp_f: Option<String>,
    pub temp_c: Option<String>,
    pub relative_humidity: Option<String>,
    pub wind_string: Option<String>,
    pub wind_dir: Option<String>,
    pub wind_degrees: Option<String>,
    pub wind_mph: Option<String>,
    pub wind_kt: Option<String>,
    pub pressure_string: Option<String>,
    pub pressure_mb: Option<String>,
    pub pressure_in: Option<String>,
    pub dewpoint_string: Option<String>,
    pub dewpoint_f: Option<String>,
    pub dewpoint_c: Option<String>,
    pub visibility_mi: Option<String>,
    pub icon_url_base: Option<String>,
    pub icon_url_name: Option<String>,
    pub ob_url: Option<String>,
}

impl CurrentObservation {
    /// Build from a flat element-name to text mapping. Unknown names are ignored.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |name: &str| fields.get(name).cloned();

        Self {
            location: get("location"),
            station_id: get("station_id"),
            latitude: get("latitude"),
            longitude: get("longitude"),
            observation_time: get("observation_time"),
            weather: get("weather"),
            temperature_string: get("temperature_string"),
            temp_f: get("temp_f"),
            temp_c: get("temp_c"),
            relative_humidity: get("relative_humidity"),
            wind_string: get("wind_string"),
            wind_dir: get("wind_dir"),
            wind_degrees: get("wind_degrees"),
            wind_mph: get("wind_mph"),
            wind_kt: get("wind_kt"),
            pressure_string: get("pressure_string"),
            pressure_mb: get("pressure_mb"),
            pressure_in: get("pressure_in"),
            dewpoint_string: get("dewpoint_string"),
            dewpoint_f: get("dewpoint_f"),
            dewpoint_c: get("dewpoint_c"),
            visibility_mi: get("visibility_mi"),
            icon_url_base: get("icon_url_base"),
            icon_url_name: get("icon_url_name"),
            ob_url: get("ob_url"),
        }
    }

    /// Look up a field by name.
    ///
    /// The outer `None` means the name is not an observation field at all;
    /// `Some(None)` means the field exists but the document omitted it.
    pub fn attribute(&self, name: &str) -> Option<Option<&str>> {
        let value = match name {
            "location" => &self.location,
            "station_id" => &self.station_id,
            "latitude" => &self.latitude,
            "longitude" => &self.longitude,
            "observation_time" => &self.observation_time,
            "weather" => &self.weather,
            "temperature_string" => &self.temperature_string,
            "temp_f" => &self.temp_f,
            "temp_c" => &self.temp_c,
            "relative_humidity" => &self.relative_humidity,
            "wind_string" => &self.wind_string,
            "wind_dir" => &self.wind_dir,
            "wind_degrees" => &self.wind_degrees,
            "wind_mph" => &self.wind_mph,
            "wind_kt" => &self.wind_kt,
            "pressure_string" => &self.pressure_string,
            "pressure_mb" => &self.pressure_mb,
            "pressure_in" => &self.pressure_in,
            "dewpoint_string" => &self.dewpoint_string,
            "dewpoint_f" => &self.dewpoint_f,
            "dewpoint_c" => &self.dewpoint_c,
            "visibility_mi" => &self.visibility_mi,
            "icon_url_base" => &self.icon_url_base,
            "icon_url_name" => &self.icon_url_name,
            "ob_url" => &self.ob_url,
            _ => return None,
        };
        Some(value.as_deref())
    }

    /// All fields as `(name, value)` pairs, in document order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        OBSERVATION_FIELDS
            .iter()
            .map(move |name| (*name, self.attribute(name).flatten()))
    }

    pub fn temp_as_int(&self) -> Result<i64, ObservationError> {
        truncated("temp_f", self.temp_f.as_deref())
    }

    pub fn dew_point_as_int(&self) -> Result<i64, ObservationError> {
        truncated("dewpoint_f", self.dewpoint_f.as_deref())
    }

    pub fn humidity_as_int(&self) -> Result<i64, ObservationError> {
        truncated("relative_humidity", self.relative_humidity.as_deref())
    }

    pub fn wind_speed_as_int(&self) -> Result<i64, ObservationError> {
        truncated("wind_mph", self.wind_mph.as_deref())
    }
}

/// Parse `value` as a float; `None` when the field is absent.
pub(crate) fn parse_number(field: &'static str, value: Option<&str>) -> Result<Option<f64>, ObservationError> {
    let Some(raw) = value else {
        return Ok(None);
    };

    raw.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ObservationError::NotNumeric { field, value: raw.to_owned() })
}

fn truncated(field: &'static str, value: Option<&str>) -> Result<i64, ObservationError> {
    let number = parse_number(field, value)?.ok_or(ObservationError::MissingField(field))?;

    if !number.is_finite() {
        return Err(ObservationError::NotNumeric { field, value: value.unwrap_or_default().to_owned() });
    }

    Ok(number.trunc() as i64)
}

/// One active alert from the alerts feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardAlert {
    pub id: Option<String>,
    pub event: Option<String>,
    pub headline: Option<String>,
    pub severity: Option<String>,
    pub urgency: Option<String>,
    pub certainty: Option<String>,
    pub area_desc: Option<String>,
    pub effective: Option<String>,
    pub expires: Option<String>,
    pub sender_name: Option<String>,
}

/// Urgency/severity/certainty values an alert must match to be reported.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HazardFilter {
    pub urgency: Vec<String>,
    pub severity: Vec<String>,
    pub certainty: Vec<String>,
}

impl Default for HazardFilter {
    fn default() -> Self {
        let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Self {
            urgency: owned(&["Immediate", "Expected", "Future"]),
            severity: owned(&["Extreme", "Severe", "Moderate"]),
            certainty: owned(&["Observed", "Likely"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(pairs: &[(&str, &str)]) -> CurrentObservation {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CurrentObservation::from_fields(&fields)
    }

    #[test]
    fn zone_code_is_last_path_segment() {
        let ctx = ForecastContext::new(
            Some("Springfield".into()),
            Some("IL".into()),
            Some("https://api.weather.gov/zones/forecast/ILZ051".into()),
        );
        assert_eq!(ctx.forecast_zone.as_deref(), Some("ILZ051"));
    }

    #[test]
    fn zone_code_absent_without_url() {
        let ctx = ForecastContext::new(None, None, None);
        assert_eq!(ctx.forecast_zone, None);
    }

    #[test]
    fn zone_code_absent_for_empty_url() {
        let ctx = ForecastContext::new(Some("Hoboken".into()), Some("NJ".into()), Some(String::new()));
        assert_eq!(ctx.forecast_zone_url.as_deref(), Some(""));
        assert_eq!(ctx.forecast_zone, None);
    }

    #[test]
    fn integer_accessors_truncate() {
        let obs = observation(&[
            ("temp_f", "72.9"),
            ("dewpoint_f", "-3.7"),
            ("relative_humidity", "55"),
            ("wind_mph", "12.99"),
        ]);
        assert_eq!(obs.temp_as_int(), Ok(72));
        assert_eq!(obs.dew_point_as_int(), Ok(-3));
        assert_eq!(obs.humidity_as_int(), Ok(55));
        assert_eq!(obs.wind_speed_as_int(), Ok(12));
    }

    #[test]
    fn integer_accessor_fails_on_missing_field() {
        let obs = observation(&[]);
        assert_eq!(obs.temp_as_int(), Err(ObservationError::MissingField("temp_f")));
    }

    #[test]
    fn integer_accessor_fails_on_text() {
        let obs = observation(&[("wind_mph", "Calm")]);
        assert_eq!(
            obs.wind_speed_as_int(),
            Err(ObservationError::NotNumeric { field: "wind_mph", value: "Calm".into() })
        );
    }

    #[test]
    fn attribute_distinguishes_unknown_from_absent() {
        let obs = observation(&[("weather", "Fair")]);
        assert_eq!(obs.attribute("weather"), Some(Some("Fair")));
        assert_eq!(obs.attribute("wind_dir"), Some(None));
        assert_eq!(obs.attribute("gust_mph"), None);
    }

    #[test]
    fn fields_follow_document_order() {
        let obs = observation(&[("ob_url", "u"), ("location", "l")]);
        let names: Vec<_> = obs.fields().map(|(n, _)| n).collect();
        assert_eq!(names.first(), Some(&"location"));
        assert_eq!(names.last(), Some(&"ob_url"));
        assert_eq!(names.len(), OBSERVATION_FIELDS.len());
    }

    #[test]
    fn period_unwraps_precipitation() {
        let period: ForecastPeriod = serde_json::from_value(serde_json::json!({
            "number": 1,
            "name": "Tonight",
            "temperature": 41,
            "probabilityOfPrecipitation": { "unitCode": "wmoUnit:percent", "value": 30 }
        }))
        .unwrap();
        assert_eq!(period.precip_percent, Some(30.0));
        assert_eq!(period.temp_as_int(), 41);
        assert_eq!(period.short_forecast, None);
    }

    #[test]
    fn period_precipitation_defaults_to_absent() {
        let missing: ForecastPeriod =
            serde_json::from_value(serde_json::json!({ "temperature": 50 })).unwrap();
        assert_eq!(missing.precip_percent, None);

        let null_value: ForecastPeriod = serde_json::from_value(serde_json::json!({
            "temperature": 50,
            "probabilityOfPrecipitation": { "value": null }
        }))
        .unwrap();
        assert_eq!(null_value.precip_percent, None);
    }

    #[test]
    fn default_hazard_filter() {
        let filter = HazardFilter::default();
        assert_eq!(filter.urgency.join(","), "Immediate,Expected,Future");
        assert_eq!(filter.severity.join(","), "Extreme,Severe,Moderate");
        assert_eq!(filter.certainty.join(","), "Observed,Likely");
    }
}
