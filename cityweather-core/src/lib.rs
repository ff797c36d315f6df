//! Core library for the `cityweather` lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers
//! - The forecast report model shared with the CLI
//! - The offline backup store
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod advice;
pub mod backup;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use backup::{BackupStore, OfflineProvider};
pub use config::{Config, ProviderConfig};
pub use error::LookupError;
pub use model::{Condition, DayForecast, ForecastEntry, WeatherQuery, WeatherReport};
pub use provider::{
    ProviderId, WeatherProvider, default_provider_from_config, provider_from_config,
};
