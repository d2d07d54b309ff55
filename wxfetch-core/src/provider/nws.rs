use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::Endpoints,
    error::{Endpoint, FetchError},
    model::{Coordinates, CurrentObservation, Forecast, GridPoint, HazardAlert, HazardFilter},
    parse::{parse_alerts_json, parse_forecast_json, parse_observation_xml, parse_points_json},
};

use super::{WeatherSource, fetch_body};

/// Upper bound on alerts returned by one query.
const ALERT_LIMIT: u32 = 500;

/// National Weather Service JSON API plus the legacy `current_obs` XML feed.
#[derive(Debug, Clone)]
pub struct NwsClient {
    api_base: String,
    current_obs_url: String,
    http: Client,
}

impl NwsClient {
    pub fn new(http: Client, endpoints: &Endpoints) -> Self {
        Self {
            api_base: endpoints.nws_api.trim_end_matches('/').to_string(),
            current_obs_url: endpoints.current_obs.clone(),
            http,
        }
    }

    fn points_url(&self, coords: &Coordinates) -> String {
        format!("{}/points/{},{}", self.api_base, coords.lat, coords.lon)
    }

    /// Alert filters are joined with literal commas, as the alerts API expects.
    fn alerts_url(&self, zone: &str, filter: &HazardFilter) -> String {
        format!(
            "{}/alerts/active?zone={}&urgency={}&severity={}&certainty={}&limit={}",
            self.api_base,
            zone,
            filter.urgency.join(","),
            filter.severity.join(","),
            filter.certainty.join(","),
            ALERT_LIMIT,
        )
    }
}

#[async_trait]
impl WeatherSource for NwsClient {
    async fn resolve_grid(&self, coords: &Coordinates) -> Result<GridPoint, FetchError> {
        let request = self.http.get(self.points_url(coords));
        let body = fetch_body(Endpoint::Points, request).await?;
        parse_points_json(&body)
    }

    async fn fetch_forecast(&self, forecast_url: &str) -> Result<Forecast, FetchError> {
        let request = self.http.get(forecast_url);
        let body = fetch_body(Endpoint::Forecast, request).await?;
        parse_forecast_json(&body)
    }

    async fn fetch_observation(&self, station_id: &str) -> Result<CurrentObservation, FetchError> {
        let request = self
            .http
            .get(&self.current_obs_url)
            .query(&[("stid", station_id)]);
        let body = fetch_body(Endpoint::Observation, request).await?;
        parse_observation_xml(&body)
    }

    async fn fetch_hazards(
        &self,
        zone: &str,
        filter: &HazardFilter,
    ) -> Result<Option<Vec<HazardAlert>>, FetchError> {
        let request = self.http.get(self.alerts_url(zone, filter));
        let body = fetch_body(Endpoint::Alerts, request).await?;
        parse_alerts_json(&body)
    }
}
