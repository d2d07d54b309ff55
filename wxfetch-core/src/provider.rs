use crate::{
    error::{Endpoint, FetchError},
    model::{Coordinates, CurrentObservation, Forecast, GridPoint, HazardAlert, HazardFilter},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::fmt::Debug;
use tracing::debug;

pub mod geocode;
pub mod nws;

pub use geocode::MapsCoGeocoder;
pub use nws::NwsClient;

/// Turns a ZIP code into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn geocode(&self, zip: &str) -> Result<Coordinates, FetchError>;
}

/// Forecast, observation and alert data for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn resolve_grid(&self, coords: &Coordinates) -> Result<GridPoint, FetchError>;

    async fn fetch_forecast(&self, forecast_url: &str) -> Result<Forecast, FetchError>;

    async fn fetch_observation(&self, station_id: &str) -> Result<CurrentObservation, FetchError>;

    /// Active alerts for a forecast zone; `Ok(None)` when the feed has no alert list.
    async fn fetch_hazards(
        &self,
        zone: &str,
        filter: &HazardFilter,
    ) -> Result<Option<Vec<HazardAlert>>, FetchError>;
}

/// HTTP client shared by every provider. The weather service rejects requests
/// without a `User-Agent`.
pub fn http_client(user_agent: &str) -> reqwest::Result<Client> {
    Client::builder().user_agent(user_agent).build()
}

/// Send `request` and return the body of a 200 response.
pub(crate) async fn fetch_body(endpoint: Endpoint, request: RequestBuilder) -> Result<String, FetchError> {
    let res = request
        .send()
        .await
        .map_err(|source| FetchError::Transport { endpoint, source })?;

    let status = res.status();
    debug!(?endpoint, url = %res.url(), %status, "response received");

    if status != StatusCode::OK {
        return Err(FetchError::Status { endpoint, status: status.as_u16() });
    }

    let body = res
        .text()
        .await
        .map_err(|source| FetchError::Transport { endpoint, source })?;
    debug!(?endpoint, bytes = body.len(), "body read");

    Ok(body)
}
