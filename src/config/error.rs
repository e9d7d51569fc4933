use std::path::PathBuf;
use thiserror::Error;

/// Problems with the startup configuration. All of them are fatal: neither the
/// refresher nor the renderer is started.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Refresh period must be a positive number of minutes")]
    ZeroPeriod,

    #[error("Refresh period of {0} minutes is too long to represent")]
    PeriodOverflow(u64),

    #[error("Location catalog is empty")]
    EmptyCatalog,

    #[error("Location '{0}' appears more than once in the catalog")]
    DuplicateLocation(String),

    #[error("No OpenWeatherMap API key given")]
    MissingApiKey,

    #[error("Failed to read API key from '{0}'")]
    TokenFile(PathBuf, #[source] std::io::Error),

    #[error("At least one request must be allowed in flight")]
    ZeroConcurrency,
}
