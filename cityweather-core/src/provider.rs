use crate::{
    Config, WeatherQuery, WeatherReport,
    backup::{BackupStore, OfflineProvider},
    error::LookupError,
    provider::{openweather::OpenWeatherProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod openweather;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi."
            )),
        }
    }
}

/// A source of city forecasts.
///
/// Implementations make exactly one outbound call per invocation and pass
/// the city along exactly as given; validation happens in the caller.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_details(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError>;
}

/// Construct a provider from config and explicit ProviderId.
///
/// When the config says `offline`, lookups come from the backup store no
/// matter which id was asked for.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    if config.offline {
        return offline_provider(config);
    }

    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `cityweather configure {id}` and enter your API key."
        )
    })?;

    let days = config.forecast_days();

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(api_key.to_owned(), days)),
        ProviderId::WeatherApi => Box::new(WeatherApiProvider::new(api_key.to_owned(), days)),
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    if config.offline {
        return offline_provider(config);
    }

    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

fn offline_provider(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let store = BackupStore::load(config.backup_file_path()?);
    Ok(Box::new(OfflineProvider::new(store)))
}
