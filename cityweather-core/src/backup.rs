//! File-backed store of the last successful report per city.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::LookupError,
    model::{WeatherQuery, WeatherReport},
    provider::WeatherProvider,
};

/// City-keyed reports persisted as one JSON document. Keys are trimmed
/// city strings as the user typed them.
#[derive(Debug)]
pub struct BackupStore {
    path: PathBuf,
    reports: HashMap<String, WeatherReport>,
}

impl BackupStore {
    /// Load the store; a missing or unreadable file starts it empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let reports = read_reports(&path);
        Self { path, reports }
    }

    pub fn get(&self, city: &str) -> Option<&WeatherReport> {
        self.reports.get(city.trim())
    }

    /// Remember the latest successful report for a city.
    pub fn record(&mut self, city: &str, report: WeatherReport) {
        self.reports.insert(city.trim().to_string(), report);
    }

    /// Write all reports back to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create backup directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&self.reports)
            .context("Failed to serialize backup data")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write backup file: {}", self.path.display()))?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

fn read_reports(path: &Path) -> HashMap<String, WeatherReport> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no backup file yet, starting empty");
        return HashMap::new();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to read backup file");
            return HashMap::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(reports) => reports,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to parse backup file");
            HashMap::new()
        }
    }
}

/// Serves lookups from the backup store when the tool runs offline.
#[derive(Debug)]
pub struct OfflineProvider {
    store: BackupStore,
}

impl OfflineProvider {
    pub fn new(store: BackupStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WeatherProvider for OfflineProvider {
    async fn fetch_details(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError> {
        let city = query.city.trim();

        self.store.get(city).cloned().ok_or_else(|| LookupError::Provider {
            message: format!("No data available currently for {city}."),
        })
    }
}
