// cardpin entry point.
// Loads config, starts logging and the async runtime, then hands the terminal to the app.

mod app;
mod config;
mod error;
mod logging;
mod paths;
mod sdk;
mod state;
mod ui;

use std::io::{self, stdout};
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::{CrosstermBackend, Terminal};
use tokio::runtime::Runtime;

use crate::app::App;
use crate::config::{Cli, Config};
use crate::error::Result;
use crate::sdk::{SandboxCardManager, SandboxFixture};
use crate::state::{SessionController, ui_channel};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    let log_path = logging::init(None)?;
    tracing::info!(log = %log_path.display(), mode = ?config.mode, "starting cardpin");

    let fixture = match &config.sandbox.fixture {
        Some(path) => SandboxFixture::load(path)?,
        None => SandboxFixture::demo(),
    };
    let sdk = SandboxCardManager::new(fixture)
        .with_latency(config.latency())
        .with_pin_color(config.design.pin_color());

    // SDK calls run here; the UI thread only drains their completions.
    let runtime = Runtime::new()?;
    let (ui, inbox) = ui_channel(runtime.handle().clone());
    let controller = SessionController::new(Arc::new(sdk), ui)
        .with_strategy(config.mode)
        .with_request_timeout(config.request_timeout());
    let mut app = App::new(controller, inbox);

    setup_terminal()?;
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .and_then(|mut terminal| app.run(&mut terminal));
    restore_terminal()?;
    result?;

    tracing::info!("exiting");
    Ok(())
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}
