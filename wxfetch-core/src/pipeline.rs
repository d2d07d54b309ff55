//! One run: geocode, resolve the grid, then fetch forecast, observation and alerts.

use tracing::{debug, info};

use crate::{
    config::Settings,
    error::{FetchError, PipelineError},
    model::{CurrentObservation, Forecast, ForecastContext, HazardAlert},
    provider::{Geocoder, WeatherSource},
};

/// Everything gathered during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Recoverable failures, in the order they happened.
    pub diagnostics: Vec<String>,
    /// Empty when grid resolution did not happen.
    pub context: ForecastContext,
    pub forecast: Option<Forecast>,
    pub observation: Option<CurrentObservation>,
    pub hazards: Option<Vec<HazardAlert>>,
}

impl RunReport {
    fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "recoverable failure");
        self.diagnostics.push(message);
    }

    /// A non-200 answer ends the run; anything else is noted and skipped.
    fn fatal_on_status<T>(&mut self, result: Result<T, FetchError>) -> Result<Option<T>, PipelineError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_status() => Err(PipelineError {
                error: err,
                diagnostics: std::mem::take(&mut self.diagnostics),
            }),
            Err(err) => {
                self.note(err.to_string());
                Ok(None)
            }
        }
    }
}

/// Run every fetch in sequence.
///
/// A non-200 status from the points, observation or alerts endpoint aborts
/// the run. Every other failure leaves the matching part of the report empty
/// and adds a diagnostic line.
pub async fn run(
    geocoder: &dyn Geocoder,
    source: &dyn WeatherSource,
    settings: &Settings,
) -> Result<RunReport, PipelineError> {
    let mut report = RunReport::default();

    match geocoder.geocode(&settings.zip).await {
        Ok(coords) => {
            info!(zip = %settings.zip, lat = %coords.lat, lon = %coords.lon, "geocoded");

            let grid = source.resolve_grid(&coords).await;
            if let Some(grid) = report.fatal_on_status(grid)? {
                report.context = grid.context;

                match grid.forecast_url {
                    Some(url) => match source.fetch_forecast(&url).await {
                        Ok(forecast) => report.forecast = Some(forecast),
                        Err(err) => report.note(err.to_string()),
                    },
                    None => report.note("No forecast URL found in the API response."),
                }
            }
        }
        Err(err) => {
            report.note(err.to_string());
            report.note("Unable to retrieve latitude and longitude.");
        }
    }

    let observation = source.fetch_observation(&settings.airport).await;
    report.observation = report.fatal_on_status(observation)?;

    match report.context.forecast_zone.clone() {
        Some(zone) => {
            let hazards = source.fetch_hazards(&zone, &settings.hazards).await;
            report.hazards = report.fatal_on_status(hazards)?.flatten();
        }
        None => debug!("no forecast zone resolved, skipping alerts"),
    }

    Ok(report)
}
