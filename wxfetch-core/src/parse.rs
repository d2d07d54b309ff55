//! Turns raw response bodies into model types.
//!
//! Kept free of any transport so every shape can be exercised from a string.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Endpoint, FetchError};
use crate::model::{
    Coordinates, CurrentObservation, Forecast, ForecastContext, ForecastPeriod, GridPoint,
    HazardAlert,
};

/// First geocoding hit for a ZIP code search.
pub fn parse_geocode_json(body: &str) -> Result<Coordinates, FetchError> {
    let data: Value = serde_json::from_str(body).map_err(|e| FetchError::decode(Endpoint::Geocode, e))?;

    let first = data
        .as_array()
        .and_then(|results| results.first())
        .ok_or(FetchError::NoResults)?;

    match (coordinate(first, "lat"), coordinate(first, "lon")) {
        (Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
        _ => Err(FetchError::MissingCoordinates),
    }
}

fn coordinate(result: &Value, key: &str) -> Option<String> {
    match result.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: Option<PointsProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    forecast: Option<String>,
    forecast_zone: Option<String>,
    #[serde(default)]
    relative_location: Option<RelativeLocation>,
}

#[derive(Debug, Deserialize)]
struct RelativeLocation {
    #[serde(default)]
    properties: Option<RelativeLocationProperties>,
}

#[derive(Debug, Deserialize)]
struct RelativeLocationProperties {
    city: Option<String>,
    state: Option<String>,
}

/// Grid point metadata from `/points/{lat},{lon}`.
pub fn parse_points_json(body: &str) -> Result<GridPoint, FetchError> {
    let parsed: PointsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::decode(Endpoint::Points, e))?;

    let props = parsed.properties.ok_or(FetchError::MissingStructure {
        endpoint: Endpoint::Points,
        member: "properties",
    })?;

    let (city, state) = props
        .relative_location
        .and_then(|r| r.properties)
        .map(|p| (p.city, p.state))
        .unwrap_or_default();

    Ok(GridPoint {
        forecast_url: props.forecast,
        context: ForecastContext::new(city, state, props.forecast_zone),
    })
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: Option<ForecastProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastProperties {
    update_time: Option<String>,
    periods: Option<Vec<ForecastPeriod>>,
}

/// Update time and ordered periods from a gridpoint forecast.
pub fn parse_forecast_json(body: &str) -> Result<Forecast, FetchError> {
    let parsed: ForecastResponse =
        serde_json::from_str(body).map_err(|e| FetchError::decode(Endpoint::Forecast, e))?;

    let props = parsed.properties.ok_or(FetchError::MissingStructure {
        endpoint: Endpoint::Forecast,
        member: "properties",
    })?;

    let periods = props.periods.ok_or(FetchError::MissingStructure {
        endpoint: Endpoint::Forecast,
        member: "periods",
    })?;

    Ok(Forecast { update_time: props.update_time, periods })
}

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    features: Option<Vec<AlertFeature>>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    #[serde(default)]
    properties: HazardAlert,
}

/// Active alerts; `None` when the body carries no `features` list.
pub fn parse_alerts_json(body: &str) -> Result<Option<Vec<HazardAlert>>, FetchError> {
    let parsed: AlertsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::decode(Endpoint::Alerts, e))?;

    Ok(parsed
        .features
        .map(|features| features.into_iter().map(|f| f.properties).collect()))
}

/// Current observation from the `current_obs` XML document.
pub fn parse_observation_xml(body: &str) -> Result<CurrentObservation, FetchError> {
    let fields = flat_fields(body)?;
    Ok(CurrentObservation::from_fields(&fields))
}

/// Text of every direct child of the root element, keyed by element name.
///
/// Only the first occurrence of a name is kept and text inside grandchildren
/// is ignored. An empty child maps to an empty string.
pub fn flat_fields(xml: &str) -> Result<HashMap<String, String>, FetchError> {
    let mut reader = Reader::from_str(xml);
    let mut fields = HashMap::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    // name of the child currently being captured
    let mut capturing: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| FetchError::decode(Endpoint::Observation, e))?;

        match event {
            Event::Start(e) => {
                depth += 1;
                seen_root = true;
                if depth == 2 {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if !fields.contains_key(&name) {
                        fields.insert(name.clone(), String::new());
                        capturing = Some(name);
                    }
                }
            }
            Event::Empty(e) => {
                seen_root = true;
                if depth == 1 {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    fields.entry(name).or_default();
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    capturing = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) if depth == 2 => {
                if let Some(name) = &capturing {
                    let text = t
                        .unescape()
                        .map_err(|e| FetchError::decode(Endpoint::Observation, e))?;
                    if let Some(value) = fields.get_mut(name) {
                        value.push_str(&text);
                    }
                }
            }
            Event::CData(c) if depth == 2 => {
                if let Some(name) = &capturing {
                    let raw = c.into_inner();
                    if let Some(value) = fields.get_mut(name) {
                        value.push_str(&String::from_utf8_lossy(&raw));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(FetchError::decode(Endpoint::Observation, "document has no root element"));
    }

    Ok(fields)
}
