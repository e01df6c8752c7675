use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::debug;
use weatherview_core::{
    Config, FetchOrchestrator, FetchState, KNOWN_PLACES, ProviderId, describe,
    provider::{default_provider_from_config, metno::DEFAULT_USER_AGENT, provider_from_config},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherview", version, about = "Current weather at a glance")]
pub struct Cli {
    /// Log more (-v for info, -vv for debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "metno".
        provider: String,
    },

    /// Show current weather once. Without a location the default one is used.
    Show {
        /// City name, or a known place for coordinate-based providers.
        location: Option<String>,

        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        /// Print the weather record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Look up locations interactively until a blank answer, Esc or Ctrl-C.
    Search {
        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,
    },

    /// List the places known to coordinate-based providers.
    Locations,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { location, provider, json } => {
                show(location.as_deref(), provider.as_deref(), json).await
            }
            Command::Search { provider } => search(provider.as_deref()).await,
            Command::Locations => {
                for place in KNOWN_PLACES {
                    println!("{:<26}{:>9.4} {:>9.4}", place.name, place.lat, place.lon);
                }
                Ok(())
            }
        }
    }
}

struct Session {
    config: Config,
    id: ProviderId,
    orchestrator: FetchOrchestrator,
}

impl Session {
    fn open(provider: Option<&str>) -> Result<Self> {
        let config = Config::load()?;
        let provider = match provider {
            Some(name) => provider_from_config(ProviderId::try_from(name)?, &config),
            None => default_provider_from_config(&config)?,
        };
        let id = provider.id();
        debug!(provider = %id, "using weather provider");

        let orchestrator = FetchOrchestrator::new(provider);
        Ok(Self { config, id, orchestrator })
    }

    fn is_demo(&self) -> bool {
        self.orchestrator.provider().is_demo()
    }

    async fn start(&self) {
        let location = self.config.default_location(self.id);
        self.orchestrator.initialize(location).await;
    }
}

async fn show(location: Option<&str>, provider: Option<&str>, json: bool) -> Result<()> {
    let session = Session::open(provider)?;

    match location {
        Some(input) => {
            session.orchestrator.submit_input(input).await;
        }
        None => session.start().await,
    }

    let record = match session.orchestrator.state() {
        FetchState::Success(record) => record,
        FetchState::Failure(message) => bail!(message),
        other => bail!("Weather request did not complete (state: {other:?})"),
    };

    if json {
        let view = serde_json::json!({
            "provider": session.id.as_str(),
            "demo": session.is_demo(),
            "record": record,
            "presentation": describe(&record),
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_record(&record));
        if session.is_demo() {
            eprintln!("\n{}", render::DEMO_NOTICE);
        }
    }

    Ok(())
}

async fn search(provider: Option<&str>) -> Result<()> {
    let session = Session::open(provider)?;
    let resolver = session.orchestrator.provider().resolver();

    println!("Weather from {}", session.id.display_name());
    session.start().await;
    println!("{}", render::render_state(&session.orchestrator.state()));
    if session.is_demo() {
        println!("{}\n", render::DEMO_NOTICE);
    }

    loop {
        let answer = match resolver.choices() {
            Some(choices) => Select::new("Location:", choices).prompt().map(str::to_string),
            None => Text::new("City:").with_placeholder("Enter city name...").prompt(),
        };

        let input = match answer {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read location"),
        };
        if ends_search(&input) {
            break;
        }

        session.orchestrator.submit_input(&input).await;
        println!("{}", render::render_state(&session.orchestrator.state()));
    }

    Ok(())
}

fn configure(provider: &str) -> Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    match id {
        ProviderId::OpenWeather => {
            let key = Password::new("OpenWeather API key:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .with_help_message("Get a free key at https://openweathermap.org/api")
                .prompt()?;
            config.upsert_provider_api_key(id, key.trim().to_string());
        }
        ProviderId::MetNo => {
            let agent = Text::new("User-Agent for api.met.no:")
                .with_default(DEFAULT_USER_AGENT)
                .with_help_message("MET Norway asks for an app name and a way to contact you")
                .prompt()?;
            config.upsert_provider_user_agent(id, agent.trim().to_string());
        }
    }

    if config.default_provider_id()? != id {
        let make_default = Confirm::new(&format!("Use {} by default?", id.display_name()))
            .with_default(true)
            .prompt()?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    let path = config.save()?;
    println!("Configured {} ({})", id.display_name(), path.display());
    Ok(())
}

/// A blank answer leaves the search loop.
fn ends_search(input: &str) -> bool {
    input.trim().is_empty()
}
