use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, Text};
use weather_core::{
    Config, FileStore, PreferenceStore, SearchController, SearchHistory, SkipReason,
    SubmitOutcome, TemperatureUnit, WeatherApiClient,
    storage::{RECENT_SEARCHES_KEY, TEMPERATURE_UNIT_KEY},
};

use crate::{interactive, render};

pub type Controller = SearchController<WeatherApiClient, FileStore>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather by city, with recent searches")]
pub struct Cli {
    /// API key to use instead of the configured one.
    #[arg(long, global = true, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Skip the pause before each request.
    #[arg(long, global = true)]
    pub no_delay: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and request settings.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name; several words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// List recent searches, or look one up again.
    Recent {
        /// 1-based position in the list, newest first.
        index: Option<usize>,
    },

    /// Show the temperature unit, or switch it.
    Unit {
        #[arg(long)]
        toggle: bool,
    },

    /// Search repeatedly from a menu.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let overrides = Overrides { api_key: self.api_key, no_delay: self.no_delay };

        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let mut ctl = overrides.controller()?;
                ctl.set_query(city.join(" "));
                eprintln!("Loading...");
                let outcome = ctl.submit_query().await;
                report(&ctl, outcome)
            }
            Command::Recent { index: None } => {
                let store = open_store()?;
                let history = store
                    .load(RECENT_SEARCHES_KEY)
                    .map(|v| SearchHistory::from_stored(&v))
                    .unwrap_or_default();
                print!("{}", render::HistoryList(&history));
                Ok(())
            }
            Command::Recent { index: Some(index) } => {
                let position = index
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("Recent searches are numbered from 1"))?;
                let mut ctl = overrides.controller()?;
                eprintln!("Loading...");
                let outcome = ctl.select_recent_index(position).await;
                report(&ctl, outcome)
            }
            Command::Unit { toggle: false } => {
                let unit = open_store()?
                    .load(TEMPERATURE_UNIT_KEY)
                    .and_then(|v| TemperatureUnit::from_stored(&v))
                    .unwrap_or_default();
                println!("Temperature unit: {unit}");
                Ok(())
            }
            Command::Unit { toggle: true } => {
                let mut ctl = overrides.controller()?;
                let unit = ctl.toggle_unit();
                println!("Temperature unit: {unit}");
                Ok(())
            }
            Command::Interactive => {
                let mut ctl = overrides.controller()?;
                interactive::run(&mut ctl).await
            }
        }
    }
}

/// Flag values that take precedence over the config file.
#[derive(Debug)]
struct Overrides {
    api_key: Option<String>,
    no_delay: bool,
}

impl Overrides {
    fn controller(self) -> Result<Controller> {
        let mut config = Config::load()?;
        if let Some(key) = self.api_key {
            config.set_api_key(key);
        }
        if self.no_delay {
            config.request_delay_ms = 0;
        }

        tracing::debug!(
            endpoint = %config.endpoint,
            delay_ms = config.request_delay_ms,
            "loaded configuration"
        );

        let client = WeatherApiClient::from_config(&config)?;
        Ok(SearchController::new(client, open_store()?))
    }
}

fn open_store() -> Result<FileStore> {
    Ok(FileStore::open(Config::preferences_file_path()?))
}

/// Print the result panel for a one-shot lookup, failing if the lookup did.
fn report(ctl: &Controller, outcome: SubmitOutcome) -> Result<()> {
    if let Some(message) = unapplied_message(outcome) {
        bail!("{message}");
    }
    if let Some(message) = ctl.error() {
        bail!("{message}");
    }
    if let Some(record) = ctl.record() {
        print!("{}", render::RecordPanel::new(record, ctl.unit()));
    }
    Ok(())
}

/// Why no lookup result was applied, for outcomes that carry none.
fn unapplied_message(outcome: SubmitOutcome) -> Option<&'static str> {
    match outcome {
        SubmitOutcome::Succeeded | SubmitOutcome::Failed => None,
        SubmitOutcome::Skipped(SkipReason::EmptyQuery) => Some("City name must not be empty"),
        SubmitOutcome::Skipped(SkipReason::NoSuchRecent) => {
            Some("No such recent search; run `weather recent` to list them")
        }
        SubmitOutcome::Skipped(SkipReason::AlreadyLoading) => {
            Some("Another lookup is already running")
        }
        SubmitOutcome::Discarded => Some("Lookup result did not match the current search and was dropped"),
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let endpoint = Text::new("Endpoint:")
        .with_default(&config.endpoint)
        .prompt()
        .context("Failed to read endpoint")?;
    config.endpoint = endpoint;

    config.request_delay_ms = CustomType::<u64>::new("Delay before each request (ms):")
        .with_default(config.request_delay_ms)
        .prompt()
        .context("Failed to read request delay")?;

    config.save()?;
    let path = Config::config_file_path()?;
    tracing::info!(path = %path.display(), "saved configuration");
    println!("Saved configuration to {}", path.display());

    Ok(())
}
