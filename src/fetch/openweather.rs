use crate::fetch::error::FetchError;
use crate::fetch::TemperatureSource;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// [`TemperatureSource`] backed by the OpenWeatherMap current weather endpoint.
///
/// Fetch keys are city names as OpenWeatherMap understands them (`Kiev`, `Lviv`, …).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            url: WEATHER_URL.to_string(),
        })
    }

    /// Points the client at another endpoint speaking the same protocol.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    async fn fetch(&self, fetch_key: &str) -> Result<f64, FetchError> {
        debug!("Requesting current weather for {}", fetch_key);

        // Errors are stripped of their URL: it carries the API key.
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", fetch_key), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(fetch_key.to_string(), e.without_url()))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                let e = e.without_url();
                warn!("HTTP error for {}: {}", fetch_key, e);
                return Err(match e.status() {
                    Some(status) => FetchError::HttpStatus {
                        location: fetch_key.to_string(),
                        status,
                        source: e,
                    },
                    None => FetchError::NetworkRequest(fetch_key.to_string(), e),
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest(fetch_key.to_string(), e.without_url()))?;
        let parsed: WeatherResponse = serde_json::from_slice(&body)
            .map_err(|e| FetchError::JsonParse(fetch_key.to_string(), e))?;

        let kelvin = parsed.main.temp;
        if !kelvin.is_finite() {
            return Err(FetchError::NonFinite(fetch_key.to_string(), kelvin));
        }
        Ok(kelvin)
    }
}

impl TemperatureSource for OpenWeatherClient {
    async fn kelvin(&self, fetch_key: &str) -> Result<f64, FetchError> {
        self.fetch(fetch_key).await
    }
}
