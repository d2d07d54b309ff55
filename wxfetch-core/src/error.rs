use thiserror::Error;

/// Remote endpoint a fetch failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Geocode,
    Points,
    Forecast,
    Observation,
    Alerts,
}

impl Endpoint {
    /// Noun used in user-facing diagnostics ("Error fetching {label} data").
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Geocode => "geolocation",
            Endpoint::Points | Endpoint::Forecast | Endpoint::Alerts => "weather",
            Endpoint::Observation => "current conditions",
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error fetching {} data: {source}", .endpoint.label())]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error fetching {} data. site returned: {status}", .endpoint.label())]
    Status { endpoint: Endpoint, status: u16 },

    #[error("Error fetching {} data: {message}", .endpoint.label())]
    Decode { endpoint: Endpoint, message: String },

    #[error("Invalid data structure returned from the API.")]
    MissingStructure { endpoint: Endpoint, member: &'static str },

    #[error("No results found for the ZIP code.")]
    NoResults,

    #[error("Latitude or longitude not found in geocoding response.")]
    MissingCoordinates,
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Transport { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Decode { endpoint, .. }
            | FetchError::MissingStructure { endpoint, .. } => *endpoint,
            FetchError::NoResults | FetchError::MissingCoordinates => Endpoint::Geocode,
        }
    }

    /// True when the server answered with something other than 200.
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }

    pub(crate) fn decode(endpoint: Endpoint, err: impl std::fmt::Display) -> Self {
        FetchError::Decode { endpoint, message: err.to_string() }
    }
}

/// Failures of the derived-index formulas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("relative humidity must be above zero to compute humidex, got {0}")]
    HumidityOutOfDomain(f64),

    #[error("humidex is undefined for {temp_c}C at {rel_humidity}% RH")]
    Undefined { temp_c: f64, rel_humidity: f64 },
}

/// Failures reading numbers out of a current observation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationError {
    #[error("observation field '{0}' is missing")]
    MissingField(&'static str),

    #[error("observation field '{field}' is not numeric: '{value}'")]
    NotNumeric { field: &'static str, value: String },

    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} not found in command line or environment variables.")]
    Missing(&'static str),
}

/// A fetch failure that ends the run.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PipelineError {
    pub error: FetchError,
    /// Diagnostics collected before the failure, in order.
    pub diagnostics: Vec<String>,
}
