#![forbid(unsafe_code)]

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use duocount_i18n::Language;

use crate::app::StaleContentPolicy;
use crate::config::AppConfig;
use crate::logging;
use crate::session::Session;

#[derive(Debug, Parser)]
#[command(
    name = "duocount",
    about = "Headless bilingual counter driven by a line script on stdin",
    version
)]
pub struct Cli {
    /// Configuration file (`.toml` or `.json`).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Viewport width in cells.
    #[arg(long)]
    pub width: Option<u16>,

    /// Viewport height in cells.
    #[arg(long)]
    pub height: Option<u16>,

    /// Initial language code (`en`, `pt`).
    #[arg(long, value_parser = parse_language)]
    pub language: Option<Language>,

    /// Simulated content fetch delay in milliseconds.
    #[arg(long = "delay-ms", value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Handling of fetch results superseded by a language change.
    #[arg(long, value_enum)]
    pub stale: Option<StaleArg>,

    /// Print a frame after the script finishes.
    #[arg(long)]
    pub print_final: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StaleArg {
    Discard,
    Overwrite,
}

impl From<StaleArg> for StaleContentPolicy {
    fn from(arg: StaleArg) -> Self {
        match arg {
            StaleArg::Discard => Self::Discard,
            StaleArg::Overwrite => Self::Overwrite,
        }
    }
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse().map_err(|e: duocount_i18n::LanguageParseError| e.to_string())
}

impl Cli {
    /// Load the config file if given, then apply flag overrides.
    pub fn resolve_config(&self) -> Result<AppConfig, Box<dyn std::error::Error + Send + Sync>> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(width) = self.width {
            config.viewport.width = width;
        }
        if let Some(height) = self.height {
            config.viewport.height = height;
        }
        if let Some(language) = self.language {
            config.initial_language = language;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.fetch_delay_ms = delay_ms;
        }
        if let Some(stale) = self.stale {
            config.stale_content = stale.into();
        }
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(crate::config::ConfigError::Validation(errors).into());
        }
        Ok(config)
    }
}

pub fn run_from_env() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = cli.resolve_config()?;
    logging::init(&config.log_filter)?;
    tracing::info!(
        target: "duocount.app",
        language = %config.initial_language,
        width = config.viewport.width,
        height = config.viewport.height,
        "starting headless session"
    );

    let mut session = Session::new(&config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let summary = session.run(stdin.lock(), &mut stdout)?;
    if cli.print_final {
        session.apply(crate::script::ScriptCommand::Print, &mut stdout)?;
    }
    tracing::info!(
        target: "duocount.app",
        commands = summary.commands,
        frames = summary.frames,
        elapsed_ms = summary.elapsed_ms,
        counter = summary.counter,
        "session finished"
    );
    Ok(())
}
