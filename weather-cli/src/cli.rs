use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use weather_core::{Action, Config, Runtime};

use crate::render;

const NEW_SEARCH: &str = "New search";
const QUIT: &str = "Quit";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "Paris, FR".
        city: String,

        /// Display temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Search interactively with city suggestions.
    Search {
        /// Start with temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure().await,
            Command::Show { city, fahrenheit } => show(city, fahrenheit).await,
            Command::Search { fahrenheit } => search(fahrenheit).await,
        }
    }
}

/// Runs a blocking inquire prompt off the async workers.
/// `None` means the user backed out (Esc / Ctrl-C).
async fn prompt<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
    T: Send + 'static,
{
    let res = tokio::task::spawn_blocking(f)
        .await
        .context("Prompt task failed")?;

    match res {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Prompt failed"),
    }
}

fn runtime(fahrenheit: bool) -> Result<Runtime> {
    let config = Config::load()?;
    tracing::debug!(
        weather_url = %config.endpoints.weather_url,
        debounce_ms = config.search.debounce_ms,
        "configuration loaded"
    );
    let mut runtime = Runtime::from_config(&config)?;
    if fahrenheit {
        runtime.dispatch(Action::ToggleUnit);
    }
    Ok(runtime)
}

async fn configure() -> Result<()> {
    // Read the file directly so environment overrides are not persisted.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let key = prompt(|| {
        Password::new("OpenWeather API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
    })
    .await?;

    let Some(key) = key.filter(|k| !k.trim().is_empty()) else {
        println!("No key entered, configuration unchanged.");
        return Ok(());
    };

    config.set_api_key(key);
    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(city: String, fahrenheit: bool) -> Result<()> {
    let mut runtime = runtime(fahrenheit)?;

    runtime.dispatch(Action::QueryChanged(city));
    runtime.dispatch(Action::Submit);
    runtime.run_until_settled().await;

    let state = runtime.state();
    if let Some(message) = state.error() {
        return Err(anyhow!("{message}"));
    }
    if let Some(view) = state.view(Utc::now()) {
        render::weather(&view);
    }
    Ok(())
}

async fn search(fahrenheit: bool) -> Result<()> {
    let mut runtime = runtime(fahrenheit)?;

    loop {
        if let Some(view) = runtime.state().view(Utc::now()) {
            render::weather(&view);

            let options = vec![view.unit_toggle.clone(), NEW_SEARCH.to_string(), QUIT.to_string()];
            let choice = prompt(move || Select::new("Next:", options).prompt()).await?;
            match choice.as_deref() {
                None | Some(QUIT) => return Ok(()),
                Some(NEW_SEARCH) => runtime.dispatch(Action::NewSearch),
                Some(_) => runtime.dispatch(Action::ToggleUnit),
            };
            continue;
        }

        if let Some(message) = runtime.state().error() {
            render::error(message);
        }

        let initial = runtime.state().query().to_string();
        let text = prompt(move || {
            Text::new("City:")
                .with_initial_value(&initial)
                .with_placeholder("min 3 letters")
                .prompt()
        })
        .await?;
        let Some(text) = text else {
            return Ok(());
        };

        runtime.dispatch(Action::QueryChanged(text.clone()));
        // Lets the debounced suggestion lookup fire and land.
        runtime.run_until_settled().await;

        let mut options: Vec<String> = runtime
            .state()
            .suggestions()
            .iter()
            .map(|c| c.display_name())
            .collect();

        if options.is_empty() {
            runtime.dispatch(Action::Submit);
        } else {
            let count = options.len();
            options.push(format!("Search \"{}\" as typed", text.trim()));

            let choice = prompt(move || Select::new("Did you mean:", options).raw_prompt()).await?;
            let Some(choice) = choice else {
                return Ok(());
            };

            if choice.index < count {
                runtime.dispatch(Action::SelectSuggestion(choice.index));
            } else {
                runtime.dispatch(Action::Submit);
            }
        }

        if runtime.state().is_loading() {
            render::loading();
        }
        runtime.run_until_settled().await;
    }
}
