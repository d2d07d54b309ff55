use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{Endpoint, FetchError},
    model::Coordinates,
    parse::parse_geocode_json,
};

use super::{Geocoder, fetch_body};

/// geocode.maps.co search API.
#[derive(Debug, Clone)]
pub struct MapsCoGeocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

impl MapsCoGeocoder {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http,
        }
    }
}

#[async_trait]
impl Geocoder for MapsCoGeocoder {
    async fn geocode(&self, zip: &str) -> Result<Coordinates, FetchError> {
        let request = self
            .http
            .get(&self.base_url)
            .query(&[("q", zip), ("api_key", self.api_key.as_str())]);

        let body = fetch_body(Endpoint::Geocode, request).await?;
        parse_geocode_json(&body)
    }
}
