//! Interactive provider configuration.

use anyhow::{Context, Result, bail};
use inquire::{Confirm, Password, PasswordDisplayMode, Select};

use cityweather_core::{Config, ProviderId};

pub fn run(provider: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;

    let id = match provider {
        Some(name) => ProviderId::try_from(name)?,
        None => pick_provider()?,
    };

    if config.is_provider_configured(id) {
        let replace = Confirm::new(&format!("An API key for '{id}' already exists. Replace it?"))
            .with_default(false)
            .prompt()?;

        if !replace {
            println!("Keeping the existing key for '{id}'.");
            return Ok(());
        }
    }

    let api_key = Password::new(&format!("API key for '{id}':"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    if api_key.trim().is_empty() {
        bail!("API key cannot be empty.");
    }

    config.upsert_provider_api_key(id, api_key.trim().to_string());

    if config.default_provider_id().ok() != Some(id) {
        let make_default = Confirm::new(&format!("Use '{id}' as the default provider?"))
            .with_default(true)
            .prompt()?;

        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    println!("Saved configuration to {}.", Config::config_file_path()?.display());

    Ok(())
}

fn pick_provider() -> Result<ProviderId> {
    Select::new("Which provider do you want to configure?", ProviderId::all().to_vec())
        .prompt()
        .context("Provider selection was cancelled")
}
