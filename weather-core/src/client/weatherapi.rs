use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{Config, FetchError, WeatherRecord};

use super::WeatherClient;

/// Client for the WeatherAPI.com `current.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    endpoint: String,
    api_key: String,
    delay: Duration,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            delay: Duration::ZERO,
            http: Client::new(),
        }
    }

    /// Construct a client from config, failing if no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(config.endpoint.clone(), api_key).with_delay(config.request_delay()))
    }

    /// Pause before every request so callers can show a loading state.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        tracing::debug!(endpoint = %self.endpoint, city, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let err = FetchError::from_response(status.as_u16(), &body);
            tracing::warn!(city, status = status.as_u16(), error = %err, "weather lookup failed");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode { message: e.to_string() })
    }
}
