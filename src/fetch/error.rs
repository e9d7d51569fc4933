use thiserror::Error;

/// Failure to obtain one location's temperature. Always scoped to a single
/// location; the refresher skips that location for the current tick.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for '{0}'")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for '{location}' with status {status}")]
    HttpStatus {
        location: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse weather response for '{0}'")]
    JsonParse(String, #[source] serde_json::Error),

    #[error("Weather response for '{0}' holds a non-finite temperature ({1})")]
    NonFinite(String, f64),
}
