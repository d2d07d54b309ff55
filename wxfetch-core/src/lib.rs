//! Core library for the `wxfetch` CLI.
//!
//! This crate defines:
//! - Configuration & settings resolution
//! - Parsers for the geocoding, forecast, observation and alert responses
//! - Wind chill and humidex calculations
//! - The delimited condition/forecast strings read by the legacy client
//! - Fetchers for the remote services and the run pipeline tying them together
//!
//! It is used by `wxfetch-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod provider;

pub use config::{Config, Endpoints, Overrides, Settings};
pub use error::{ConfigError, Endpoint, FetchError, IndexError, ObservationError, PipelineError};
pub use format::{build_condition_string, build_forecast_string};
pub use index::{WindChill, compute_humidex, compute_wind_chill};
pub use model::{
    Coordinates, CurrentObservation, Forecast, ForecastContext, ForecastPeriod, GridPoint,
    HazardAlert, HazardFilter,
};
pub use pipeline::RunReport;
pub use provider::{Geocoder, MapsCoGeocoder, NwsClient, WeatherSource};
