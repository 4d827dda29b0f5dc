use crate::{FetchError, WeatherRecord};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Source of current conditions for a city.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// One lookup, one outbound request. No retries.
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError>;
}
