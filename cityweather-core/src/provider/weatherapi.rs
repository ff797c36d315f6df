use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::LookupError,
    model::{Condition, Observation, WeatherQuery, WeatherReport},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";
const PROVIDER_NAME: &str = "weatherapi";

/// Format of the `hour.time` field, already in the city's local time.
const HOUR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    forecast_days: u8,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
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
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_details(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError> {
        let url = format!("{}/v1/forecast.json", self.base_url);
        let days = self.forecast_days.to_string();

        tracing::debug!(
            city = %query.city,
            days = self.forecast_days,
            "requesting weatherapi forecast"
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query.city.as_str()),
                ("days", days.as_str()),
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

/// WeatherAPI error payloads look like
/// `{"error":{"code":1006,"message":"No matching location found."}}`.
#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

fn error_from_body(status: StatusCode, body: &str) -> LookupError {
    if status.is_client_error() {
        if let Ok(parsed) = serde_json::from_str::<WaErrorBody>(body) {
            return LookupError::Provider { message: parsed.error.message };
        }
    }

    LookupError::Status { provider: PROVIDER_NAME, status, body: truncate_body(body) }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    forecast: WaForecast,
}

fn parse_forecast(requested_city: &str, body: &str) -> Result<WeatherReport, LookupError> {
    let parsed: WaForecastResponse = serde_json::from_str(body)
        .map_err(|source| LookupError::Decode { provider: PROVIDER_NAME, source })?;

    let mut observations = Vec::new();
    for day in &parsed.forecast.forecastday {
        for hour in &day.hour {
            let Ok(local_time) = NaiveDateTime::parse_from_str(&hour.time, HOUR_TIME_FORMAT)
            else {
                tracing::debug!(time = %hour.time, "skipping hour with unreadable time");
                continue;
            };

            observations.push(Observation {
                local_time,
                temperature_c: hour.temp_c,
                wind_speed_mps: hour.wind_kph / 3.6,
                conditions: vec![Condition {
                    status: hour.condition.text.clone(),
                    description: hour.condition.text.clone(),
                }],
            });
        }
    }

    if observations.is_empty() {
        return Err(LookupError::Provider {
            message: format!("No weather data available for {}.", requested_city.trim()),
        });
    }

    let city = format!("{}, {}", parsed.location.name, parsed.location.country);

    Ok(WeatherReport::from_observations(PROVIDER_NAME, city, observations))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FORECAST_BODY: &str = r#"{
        "location": {"name": "London", "country": "United Kingdom"},
        "current": {"temp_c": 7.0},
        "forecast": {
            "forecastday": [
                {
                    "date": "2024-01-01",
                    "hour": [
                        {"time": "2024-01-01 12:00", "temp_c": 7.0, "wind_kph": 18.0,
                         "condition": {"text": "Light rain"}},
                        {"time": "2024-01-01 15:00", "temp_c": 8.5, "wind_kph": 54.0,
                         "condition": {"text": "Sunny"}}
                    ]
                },
                {
                    "date": "2024-01-02",
                    "hour": [
                        {"time": "2024-01-02 09:00", "temp_c": 3.0, "wind_kph": 10.0,
                         "condition": {"text": "Snow"}}
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn parses_forecast_into_daily_groups() {
        let report = parse_forecast("London", FORECAST_BODY).expect("fixture must parse");

        assert_eq!(report.provider, "weatherapi");
        assert_eq!(report.city, "London, United Kingdom");

        assert_eq!(report.days.len(), 2);
        assert_eq!(report.days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(report.days[0].entries.len(), 2);
        assert_eq!(report.days[1].entries.len(), 1);
    }

    #[test]
    fn wind_speed_converts_from_kph_before_advice() {
        let report = parse_forecast("London", FORECAST_BODY).expect("fixture must parse");

        // 54 kph is 15 m/s, over the windy threshold; 18 kph is 5 m/s, under it.
        assert_eq!(report.days[0].entries[0].advice, "Carry an umbrella.");
        assert_eq!(report.days[0].entries[1].advice, "It's too windy, watch out!");
    }

    #[test]
    fn empty_forecast_is_a_provider_error() {
        let body = r#"{
            "location": {"name": "Nowhere", "country": "XX"},
            "forecast": {"forecastday": []}
        }"#;

        let err = parse_forecast("Nowhere", body).unwrap_err();
        assert_eq!(err.provider_message(), Some("No weather data available for Nowhere."));
    }

    #[test]
    fn client_error_body_surfaces_the_provider_message() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"code": 1006, "message": "No matching location found."}}"#,
        );

        assert_eq!(err.provider_message(), Some("No matching location found."));
    }

    #[test]
    fn server_error_stays_unexplained() {
        let err = error_from_body(StatusCode::SERVICE_UNAVAILABLE, "down for maintenance");

        assert_eq!(err.provider_message(), None);
    }

    #[tokio::test]
    async fn fetch_details_calls_the_forecast_endpoint_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast.json"))
            .and(query_param("key", "test-key"))
            .and(query_param("q", "London"))
            .and(query_param("days", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FORECAST_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            WeatherApiProvider::new("test-key".to_string(), 5).with_base_url(server.uri());
        let report = provider
            .fetch_details(&WeatherQuery::new("London"))
            .await
            .expect("lookup must succeed");

        assert_eq!(report.city, "London, United Kingdom");
    }

    #[tokio::test]
    async fn fetch_details_maps_unknown_location_to_a_provider_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast.json"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"error": {"code": 1006, "message": "No matching location found."}}"#,
            ))
            .mount(&server)
            .await;

        let provider =
            WeatherApiProvider::new("test-key".to_string(), 5).with_base_url(server.uri());
        let err = provider.fetch_details(&WeatherQuery::new("Atlantis")).await.unwrap_err();

        assert_eq!(err.provider_message(), Some("No matching location found."));
    }
}
