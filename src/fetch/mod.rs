//! Where temperatures come from.

pub mod error;
pub mod openweather;

use crate::fetch::error::FetchError;
use std::future::Future;

const KELVIN_OFFSET: f64 = 273.15;

/// Current temperature of a location, looked up by its catalog fetch key.
///
/// The refresher calls this once per location per tick and tolerates failures,
/// so implementations should simply report them.
pub trait TemperatureSource: Send + Sync {
    /// Temperature in Kelvin.
    fn kelvin(&self, fetch_key: &str) -> impl Future<Output = Result<f64, FetchError>> + Send;
}

/// Whole degrees Celsius, rounding halves to the nearest even number.
///
/// # Examples
///
/// ```
/// use citytemp::kelvin_to_celsius;
///
/// assert_eq!(kelvin_to_celsius(293.15), 20);
/// assert_eq!(kelvin_to_celsius(255.0), -18);
/// ```
pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    (kelvin - KELVIN_OFFSET).round_ties_even() as i32
}
