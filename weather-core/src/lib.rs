//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client behind the [`WeatherClient`] trait
//! - The search controller with its recent-search history and unit preference
//! - Pluggable key-value persistence for those preferences
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod model;
pub mod storage;

pub use client::{WeatherApiClient, WeatherClient};
pub use config::Config;
pub use controller::{PendingFetch, RequestState, SearchController, SkipReason, SubmitOutcome};
pub use error::FetchError;
pub use history::SearchHistory;
pub use model::{Condition, Current, Location, TemperatureUnit, WeatherRecord};
pub use storage::{FileStore, MemoryStore, PreferenceStore};
