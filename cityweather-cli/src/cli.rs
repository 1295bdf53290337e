use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cityweather_core::{
    App, Config, FileStore, OutputFormat, TerminalRenderer, display, provider_from_config,
};
use inquire::{Password, PasswordDisplayMode};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and air quality by city")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print HTML fragments instead of plain text.
    #[arg(long, global = true)]
    pub html: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather credential and provider settings.
    Configure {
        /// API key; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,

        /// Provider host, e.g. for a local mock.
        #[arg(long)]
        base_url: Option<String>,

        /// Language for condition descriptions, e.g. "ru".
        #[arg(long)]
        lang: Option<String>,
    },

    /// Show weather and air quality for a city.
    ///
    /// Without CITY, the last successfully searched city is shown again.
    Show {
        /// City name; casing is normalized before the lookup.
        city: Option<String>,
    },

    /// Show the built-in reading, or one saved from the provider.
    Sample {
        /// Current-weather JSON body to display instead of the built-in one.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn output_format(&self) -> OutputFormat {
        if self.html { OutputFormat::Html } else { OutputFormat::Text }
    }

    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let format = self.output_format();

        match self.command {
            Command::Configure { api_key, base_url, lang } => {
                configure(api_key, base_url, lang)?;
            }
            Command::Show { city } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let store = FileStore::open_default()?;
                let mut app = App::new(provider, store, TerminalRenderer::stdio(format));

                let outcome = match city {
                    Some(city) => {
                        app.set_input(city);
                        app.on_search().await
                    }
                    None => match app.on_load().await {
                        Some(outcome) => outcome,
                        None => bail!(
                            "No city given and none remembered from a previous search.\n\
                             Hint: run `cityweather show <CITY>`."
                        ),
                    },
                };

                // The failure has already been shown as an alert.
                if outcome.is_err() {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Command::Sample { file } => {
                let payload = match file {
                    Some(path) => display::load_payload(&path)?,
                    None => display::sample_payload(),
                };
                display::display_weather(&payload, &mut TerminalRenderer::stdio(format));
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn configure(
    api_key: Option<String>,
    base_url: Option<String>,
    lang: Option<String>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?,
    };

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }
    config.api_key = Some(api_key.to_string());

    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    if lang.is_some() {
        config.lang = lang;
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_city() {
        let cli = Cli::try_parse_from(["cityweather", "show", "mOsCOW", "--html"]).unwrap();
        assert!(cli.html);
        assert!(matches!(cli.command, Command::Show { city: Some(ref c) } if c == "mOsCOW"));
    }

    #[test]
    fn show_without_city_restores_last_search() {
        let cli = Cli::try_parse_from(["cityweather", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: None }));
        assert_eq!(cli.output_format(), OutputFormat::Text);
    }

    #[test]
    fn verbosity_maps_to_filter() {
        let cli = Cli::try_parse_from(["cityweather", "-vv", "sample"]).unwrap();
        assert_eq!(cli.log_filter(), "debug");

        let cli = Cli::try_parse_from(["cityweather", "sample"]).unwrap();
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn configure_accepts_flags() {
        let cli = Cli::try_parse_from([
            "cityweather",
            "configure",
            "--api-key",
            "KEY",
            "--lang",
            "ru",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Command::Configure { api_key: Some(_), base_url: None, lang: Some(_) }
        ));
    }
}
