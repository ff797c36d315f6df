//! The search form: input validation and the lookup state machine.

use cityweather_core::{LookupError, WeatherProvider, WeatherQuery, WeatherReport};

/// Shown when the form is submitted with an empty city.
pub const EMPTY_CITY_MESSAGE: &str = "City name cannot be empty.";
/// Shown when a lookup fails and the provider did not explain itself.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Form status: ready for input, or carrying an inline error line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Error(String),
}

impl SearchStatus {
    pub fn error(&self) -> Option<&str> {
        match self {
            SearchStatus::Idle => None,
            SearchStatus::Error(message) => Some(message),
        }
    }
}

/// Owns the city input and its inline error; drives lookups on submit.
///
/// The shared result slot is passed in by the owner, so the form is the
/// only writer but never the holder of the displayed data.
#[derive(Debug, Default)]
pub struct SearchForm {
    city: String,
    status: SearchStatus,
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// Run one search against the provider and update the shared result.
    ///
    /// A city that is empty after trimming never reaches the provider and
    /// leaves the shared slot untouched; otherwise the provider receives
    /// the city exactly as typed. On success the slot holds the new report
    /// and any previous error clears. On failure the slot empties and the
    /// error line is set: verbatim when the provider explained the
    /// rejection, a generic line otherwise (the cause only goes to the log).
    pub async fn submit(
        &mut self,
        provider: &dyn WeatherProvider,
        weather_data: &mut Option<WeatherReport>,
    ) {
        if self.city.trim().is_empty() {
            self.status = SearchStatus::Error(EMPTY_CITY_MESSAGE.to_string());
            return;
        }

        let query = WeatherQuery::new(self.city.clone());

        match provider.fetch_details(&query).await {
            Ok(report) => {
                *weather_data = Some(report);
                self.status = SearchStatus::Idle;
            }
            Err(LookupError::Provider { message }) => {
                *weather_data = None;
                self.status = SearchStatus::Error(message);
            }
            Err(error) => {
                tracing::error!(city = %self.city, error = ?error, "weather lookup failed");
                *weather_data = None;
                self.status = SearchStatus::Error(UNEXPECTED_ERROR_MESSAGE.to_string());
            }
        }
    }
}
