use thiserror::Error;

/// Coarse classification of a [`WeatherError`], used to pick an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCode,
    NotFound,
    Configuration,
    Provider,
    Internal,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("invalid zipcode")]
    InvalidZipCode,

    #[error("can not find zipcode")]
    ZipCodeNotFound,

    #[error("{provider} api key not found")]
    MissingApiKey { provider: &'static str },

    #[error("failed to send request to {provider}: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to parse {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WeatherError {
    /// Wraps a request failure without its URL, which may carry an API key
    /// in the query string.
    pub fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        WeatherError::Transport { provider, source: source.without_url() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::InvalidZipCode => ErrorKind::InvalidCode,
            WeatherError::ZipCodeNotFound => ErrorKind::NotFound,
            WeatherError::MissingApiKey { .. } => ErrorKind::Configuration,
            WeatherError::Transport { .. }
            | WeatherError::Status { .. }
            | WeatherError::Decode { .. } => ErrorKind::Provider,
            WeatherError::Serialization(_) => ErrorKind::Internal,
        }
    }
}
