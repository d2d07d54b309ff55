use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use wxfetch_core::{
    Config, MapsCoGeocoder, NwsClient, Overrides, Settings, pipeline, provider::http_client,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "wxfetch",
    version,
    about = "Fetch the 7-day forecast and current conditions from the National Weather Service"
)]
pub struct Cli {
    /// ZIP code of the location. Falls back to $ZIP.
    #[arg(long)]
    pub zip: Option<String>,

    /// API key for the maps.co geocoding API. Falls back to $GC_API_KEY.
    #[arg(long = "gc_api_key", alias = "gc-api-key", value_name = "KEY")]
    pub gc_api_key: Option<String>,

    /// Airport identifier for current conditions, e.g. KNYC. Falls back to $AIRPORT.
    #[arg(long)]
    pub airport: Option<String>,

    /// Only print hazards and the delimited strings.
    #[arg(long = "forecast_only", alias = "forecast-only")]
    pub forecast_only: bool,

    /// Config file to read instead of the platform default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let overrides = Overrides {
            zip: self.zip,
            gc_api_key: self.gc_api_key,
            airport: self.airport,
        };
        let settings = Settings::resolve(overrides, |name| std::env::var(name).ok(), config)?;
        debug!(zip = %settings.zip, airport = %settings.airport, "settings resolved");

        let http = http_client(&settings.user_agent).context("Failed to build HTTP client")?;
        let geocoder = MapsCoGeocoder::new(
            http.clone(),
            settings.endpoints.geocode.as_str(),
            settings.gc_api_key.as_str(),
        );
        let source = NwsClient::new(http, &settings.endpoints);

        let report = match pipeline::run(&geocoder, &source, &settings).await {
            Ok(report) => report,
            Err(err) => {
                for line in &err.diagnostics {
                    println!("{line}");
                }
                return Err(err.into());
            }
        };

        let stdout = io::stdout();
        output::render(&report, self.forecast_only, &mut stdout.lock())
    }
}
