//! Runtime settings shared by the refresher and the renderer.

pub mod error;

use crate::config::error::ConfigError;
use bon::Builder;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SNAPSHOT_FILE_NAME: &str = "last.json";
const DATA_DIR_NAME: &str = "citytemp";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How often both the refresher and the renderer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshPeriod(Duration);

impl RefreshPeriod {
    /// # Examples
    ///
    /// ```
    /// use citytemp::RefreshPeriod;
    /// use std::time::Duration;
    ///
    /// let period = RefreshPeriod::from_minutes(15).unwrap();
    /// assert_eq!(period.as_duration(), Duration::from_secs(900));
    /// assert!(RefreshPeriod::from_minutes(0).is_err());
    /// ```
    pub fn from_minutes(minutes: u64) -> Result<Self, ConfigError> {
        if minutes == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        let secs = minutes
            .checked_mul(60)
            .ok_or(ConfigError::PeriodOverflow(minutes))?;
        Ok(Self(Duration::from_secs(secs)))
    }

    /// Sub-minute periods are not reachable from the command line but are handy
    /// for tests and demos.
    pub fn from_duration(period: Duration) -> Result<Self, ConfigError> {
        if period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(Self(period))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for RefreshPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        if secs % 60 == 0 {
            write!(f, "{} min", secs / 60)
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

/// Everything [`Board`](crate::Board) needs to run.
///
/// # Examples
///
/// ```
/// use citytemp::{RefreshPeriod, Settings};
///
/// let settings = Settings::builder()
///     .period(RefreshPeriod::from_minutes(5).unwrap())
///     .snapshot_path("/tmp/last.json")
///     .api_key("secret")
///     .build();
/// assert_eq!(settings.max_in_flight, 1);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Builder)]
pub struct Settings {
    pub period: RefreshPeriod,
    #[builder(into)]
    pub snapshot_path: PathBuf,
    #[builder(into)]
    pub api_key: String,
    /// Upper bound on concurrent fetches per tick; 1 fetches sequentially.
    #[builder(default = 1)]
    pub max_in_flight: usize,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}

/// `last.json` in the platform data directory, or in the working directory if the
/// platform has none.
pub fn default_snapshot_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(DATA_DIR_NAME).join(SNAPSHOT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(SNAPSHOT_FILE_NAME))
}

/// Reads an API key from a plain text file, ignoring surrounding whitespace.
pub fn read_api_key(path: &Path) -> Result<String, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::TokenFile(path.to_path_buf(), e))?;
    let key = raw.trim();
    if key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    Ok(key.to_string())
}
