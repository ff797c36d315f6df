//! Interactive lookup session: wires the prompt, the search form and the
//! display together, and keeps the backup store fresh.

use anyhow::Result;
use inquire::{InquireError, Text};

use cityweather_core::{BackupStore, Config, WeatherProvider, WeatherReport};

use crate::display;
use crate::search::SearchForm;

/// Owns the shared weather slot for the lifetime of the session. The form
/// writes to it on submit; the display only reads it.
pub struct Session {
    weather_data: Option<WeatherReport>,
    form: SearchForm,
    backup: Option<BackupStore>,
}

impl Session {
    /// Build a session. Online sessions record every successful lookup in
    /// the backup store; offline sessions already read from it, so they
    /// never write.
    pub fn new(config: &Config) -> Result<Self> {
        let backup =
            if config.offline { None } else { Some(BackupStore::load(config.backup_file_path()?)) };

        Ok(Self { weather_data: None, form: SearchForm::new(), backup })
    }

    pub async fn run(&mut self, provider: &dyn WeatherProvider) -> Result<()> {
        println!("cityweather: weather lookup by city");
        println!("Press Esc or Ctrl-C to quit.");

        loop {
            println!();
            println!("{}", display::render(self.weather_data.as_ref()));

            let city = match Text::new("City name:")
                .with_placeholder(display::EMPTY_STATE_PROMPT)
                .prompt()
            {
                Ok(city) => city,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(error) => return Err(error.into()),
            };

            self.form.set_city(city);
            if !self.form.city().trim().is_empty() {
                println!("Looking up weather for {}...", self.form.city().trim());
            }

            self.form.submit(provider, &mut self.weather_data).await;

            if let Some(message) = self.form.status().error() {
                println!("{message}");
            } else {
                self.record_success();
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn record_success(&mut self) {
        let (Some(report), Some(backup)) = (&self.weather_data, &mut self.backup) else {
            return;
        };

        backup.record(self.form.city(), report.clone());
        if let Err(error) = backup.save() {
            tracing::warn!(%error, "failed to update backup file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::Path;

    fn config_with_backup(path: &Path, offline: bool) -> Config {
        Config { offline, backup_file: Some(path.to_path_buf()), ..Config::default() }
    }

    fn report_for(city: &str) -> WeatherReport {
        WeatherReport {
            provider: "openweather".to_string(),
            city: city.to_string(),
            fetched_at: Utc::now(),
            days: vec![],
        }
    }

    #[test]
    fn online_success_is_recorded_under_the_trimmed_city() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut session = Session::new(&config_with_backup(&path, false)).unwrap();
        session.form.set_city("  Kyiv  ");
        session.weather_data = Some(report_for("Kyiv, UA"));

        session.record_success();

        let reloaded = BackupStore::load(&path);
        assert_eq!(reloaded.get("Kyiv").map(|r| r.city.as_str()), Some("Kyiv, UA"));
    }

    #[test]
    fn offline_sessions_never_write_the_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut session = Session::new(&config_with_backup(&path, true)).unwrap();
        session.form.set_city("Kyiv");
        session.weather_data = Some(report_for("Kyiv, UA"));

        session.record_success();

        assert!(!path.exists());
    }

    #[test]
    fn nothing_is_recorded_without_a_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut session = Session::new(&config_with_backup(&path, false)).unwrap();
        session.form.set_city("Kyiv");

        session.record_success();

        assert!(!path.exists());
    }
}
