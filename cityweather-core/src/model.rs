use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::advice;

/// A single lookup: the city string exactly as the user typed it.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into() }
    }
}

/// One weather condition reported for a forecast slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Short group name, e.g. "Rain".
    pub status: String,
    /// Longer human-readable text, e.g. "light rain".
    pub description: String,
}

/// A provider-neutral forecast sample, already shifted to the city's local time.
///
/// Wind speed is kept here so advice can be derived from it; it does not
/// appear in the rendered table.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub local_time: NaiveDateTime,
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
    pub conditions: Vec<Condition>,
}

/// One row of the rendered forecast table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: NaiveTime,
    pub temperature_c: f64,
    pub conditions: Vec<Condition>,
    pub advice: String,
}

/// All forecast entries that fall on one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub entries: Vec<ForecastEntry>,
}

/// The payload a successful lookup hands to the display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub provider: String,
    pub city: String,
    pub fetched_at: DateTime<Utc>,
    pub days: Vec<DayForecast>,
}

impl WeatherReport {
    /// Assemble a report from chronological observations.
    pub fn from_observations(
        provider: impl Into<String>,
        city: impl Into<String>,
        observations: Vec<Observation>,
    ) -> Self {
        Self {
            provider: provider.into(),
            city: city.into(),
            fetched_at: Utc::now(),
            days: build_days(observations),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Group observations by local date, keeping their order, and attach advice.
///
/// Observations are expected in chronological order; a new day starts
/// whenever the local date changes.
pub fn build_days(observations: Vec<Observation>) -> Vec<DayForecast> {
    let mut days: Vec<DayForecast> = Vec::new();

    for obs in observations {
        let date = obs.local_time.date();
        let entry = ForecastEntry {
            time: obs.local_time.time(),
            temperature_c: obs.temperature_c,
            advice: advice::advice_for(obs.temperature_c, obs.wind_speed_mps, &obs.conditions),
            conditions: obs.conditions,
        };

        match days.last_mut() {
            Some(day) if day.date == date => day.entries.push(entry),
            _ => days.push(DayForecast { date, entries: vec![entry] }),
        }
    }

    days
}
