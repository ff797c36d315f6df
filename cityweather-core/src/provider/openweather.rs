use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::LookupError,
    model::{Condition, Observation, WeatherQuery, WeatherReport},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const PROVIDER_NAME: &str = "openweather";

/// The forecast endpoint serves one entry per 3 hours.
const SLOTS_PER_DAY: u8 = 8;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    forecast_days: u8,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, forecast_days: u8) -> Self {
        Self {
            api_key,
            forecast_days,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_details(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        let cnt = (u32::from(self.forecast_days) * u32::from(SLOTS_PER_DAY)).to_string();

        tracing::debug!(
            city = %query.city,
            days = self.forecast_days,
            "requesting openweather forecast"
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.city.as_str()),
                ("cnt", cnt.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|source| LookupError::Transport { provider: PROVIDER_NAME, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Transport { provider: PROVIDER_NAME, source })?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        parse_forecast(&query.city, &body)
    }
}

/// OpenWeather error payloads look like `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

fn error_from_body(status: StatusCode, body: &str) -> LookupError {
    if status.is_client_error() {
        if let Ok(parsed) = serde_json::from_str::<OwErrorBody>(body) {
            return LookupError::Provider { message: parsed.message };
        }
    }

    LookupError::Status { provider: PROVIDER_NAME, status, body: truncate_body(body) }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
    /// Shift from UTC in seconds.
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn parse_forecast(requested_city: &str, body: &str) -> Result<WeatherReport, LookupError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)
        .map_err(|source| LookupError::Decode { provider: PROVIDER_NAME, source })?;

    let offset = FixedOffset::east_opt(parsed.city.timezone).unwrap_or(Utc.fix());

    let mut observations = Vec::with_capacity(parsed.list.len());
    for entry in &parsed.list {
        let Some(utc) = DateTime::from_timestamp(entry.dt, 0) else {
            continue; // out-of-range timestamp, nothing sensible to show
        };

        let conditions = entry
            .weather
            .iter()
            .map(|w| Condition { status: w.main.clone(), description: w.description.clone() })
            .collect();

        observations.push(Observation {
            local_time: utc.with_timezone(&offset).naive_local(),
            temperature_c: entry.main.temp,
            wind_speed_mps: entry.wind.speed,
            conditions,
        });
    }

    if observations.is_empty() {
        return Err(LookupError::Provider {
            message: format!("No weather data available for {}.", requested_city.trim()),
        });
    }

    let city = format!("{}, {}", parsed.city.name, parsed.city.country);

    Ok(WeatherReport::from_observations(PROVIDER_NAME, city, observations))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
