use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use cityweather_core::{
    Config, ProviderId, WeatherProvider, default_provider_from_config, provider_from_config,
};

use crate::search::{SearchForm, SearchStatus};
use crate::session::Session;
use crate::{configure, display};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City weather lookup")]
pub struct Cli {
    /// Provider short name, e.g. "openweather"; defaults to the configured one.
    #[arg(long, short)]
    pub provider: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: Option<String>,
    },

    /// Look up weather for a city once and exit.
    Lookup {
        /// City name, passed to the provider as-is.
        city: String,

        /// Provider short name; defaults to the configured one.
        #[arg(long, short)]
        provider: Option<String>,
    },

    /// List known providers and their configuration state.
    Providers,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure { provider }) => configure::run(provider.as_deref()),
            Some(Command::Lookup { city, provider }) => {
                let config = Config::load()?;
                let requested = requested_provider(provider, self.provider);
                let provider = resolve_provider(requested.as_deref(), &config)?;
                lookup_once(&city, provider.as_ref()).await
            }
            Some(Command::Providers) => {
                let config = Config::load()?;
                print_providers(&config);
                Ok(())
            }
            None => {
                let config = Config::load()?;
                let provider = resolve_provider(self.provider.as_deref(), &config)?;
                let mut session = Session::new(&config)?;
                session.run(provider.as_ref()).await
            }
        }
    }
}

/// The subcommand's own flag wins over the top-level one.
fn requested_provider(subcommand: Option<String>, top_level: Option<String>) -> Option<String> {
    subcommand.or(top_level)
}

fn resolve_provider(
    requested: Option<&str>,
    config: &Config,
) -> Result<Box<dyn WeatherProvider>> {
    match requested {
        Some(name) => provider_from_config(ProviderId::try_from(name)?, config),
        None => default_provider_from_config(config),
    }
}

/// One-shot lookup, sharing the interactive path's form semantics.
async fn lookup_once(city: &str, provider: &dyn WeatherProvider) -> Result<()> {
    let mut weather_data = None;
    let mut form = SearchForm::new();

    form.set_city(city);
    form.submit(provider, &mut weather_data).await;

    match form.status() {
        SearchStatus::Idle => {
            println!("{}", display::render(weather_data.as_ref()));
            Ok(())
        }
        SearchStatus::Error(message) => bail!("{message}"),
    }
}

fn print_providers(config: &Config) {
    let default = config.default_provider_id().ok();

    for id in ProviderId::all() {
        let configured =
            if config.is_provider_configured(*id) { "configured" } else { "not configured" };
        let marker = if default == Some(*id) { " (default)" } else { "" };

        println!("{:<12} {configured}{marker}", id.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lookup_falls_back_to_the_top_level_provider_flag() {
        let cli = Cli::try_parse_from(["cityweather", "-p", "weatherapi", "lookup", "Kyiv"])
            .expect("args must parse");

        let Some(Command::Lookup { city, provider }) = cli.command else {
            panic!("expected the lookup subcommand");
        };

        assert_eq!(city, "Kyiv");
        assert_eq!(requested_provider(provider, cli.provider).as_deref(), Some("weatherapi"));
    }

    #[test]
    fn the_lookup_provider_flag_wins_over_the_top_level_one() {
        let cli = Cli::try_parse_from([
            "cityweather",
            "-p",
            "weatherapi",
            "lookup",
            "Kyiv",
            "--provider",
            "openweather",
        ])
        .expect("args must parse");

        let Some(Command::Lookup { provider, .. }) = cli.command else {
            panic!("expected the lookup subcommand");
        };

        assert_eq!(requested_provider(provider, cli.provider).as_deref(), Some("openweather"));
    }
}
