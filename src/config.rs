// Configuration loading.
// TOML config file with command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::paths;
use crate::sdk::sandbox::DEFAULT_LATENCY;
use crate::state::SelectionMode;

/// Command-line arguments.
#[derive(Debug, Default, Parser)]
#[command(
    name = "cardpin",
    version,
    about = "Log in to a card-management SDK, pick a card, and reveal its PIN"
)]
pub struct Cli {
    /// Config file (defaults to config.toml in the platform config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// How a card is chosen after the fetch.
    #[arg(long, value_enum)]
    pub mode: Option<SelectionMode>,

    /// Sandbox fixture JSON with sessions, cards and PIN tokens.
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Timeout for card and PIN requests, in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Simulated sandbox latency, in milliseconds.
    #[arg(long)]
    pub latency_ms: Option<u64>,
}

/// Sandbox backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxConfig {
    pub fixture: Option<PathBuf>,
    pub latency_ms: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            fixture: None,
            latency_ms: DEFAULT_LATENCY.as_millis() as u64,
        }
    }
}

/// Look of SDK-rendered components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignConfig {
    pub pin_color: String,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            pin_color: "blue".to_string(),
        }
    }
}

impl DesignConfig {
    /// Parsed PIN color, falling back to blue.
    pub fn pin_color(&self) -> Color {
        Color::from_str(&self.pin_color).unwrap_or_else(|_| {
            tracing::warn!(color = %self.pin_color, "unknown pin_color, using blue");
            Color::Blue
        })
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mode: SelectionMode,
    pub request_timeout_secs: Option<u64>,
    pub sandbox: SandboxConfig,
    pub design: DesignConfig,
}

impl Config {
    /// Load from an explicit path, or from the default location if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match paths::config_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                default => {
                    tracing::debug!(path = ?default, "no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                AppError::Io(e)
            }
        })?;
        Self::parse_toml(&content, path)
    }

    /// Parse TOML, reporting the line and column of any error.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e
                .span()
                .map(|span| {
                    let before = &content[..span.start];
                    let line = before.matches('\n').count() + 1;
                    let column = span.start - before.rfind('\n').map(|p| p + 1).unwrap_or(0) + 1;
                    (line, column)
                })
                .unwrap_or((0, 0));
            AppError::ConfigParse {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }

    /// Command-line flags win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(fixture) = &cli.fixture {
            self.sandbox.fixture = Some(fixture.clone());
        }
        if let Some(timeout) = cli.timeout {
            self.request_timeout_secs = Some(timeout);
        }
        if let Some(latency) = cli.latency_ms {
            self.sandbox.latency_ms = latency;
        }
    }

    /// Timeout for SDK calls; zero disables it.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.sandbox.latency_ms)
    }
}
