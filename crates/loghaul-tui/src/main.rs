//! loghaul - merged, filterable terminal view of remote structured logs.
//!
//! Fetches every configured origin once, then hands the merged snapshot to the
//! dashboard.

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use loghaul_core::Aggregator;
use loghaul_tui::app::App;
use loghaul_tui::config::Cli;
use loghaul_tui::events::{AppEvent, EventHandler, handle_key};
use loghaul_tui::ui;
use ratatui::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values from .env must be in the environment before clap reads it.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("loghaul=info")))
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) => debug!(error = %e, "no environment file loaded"),
    }

    let config = cli.into_config()?;
    info!(host = %config.host, user = %config.user, "acquiring logs");

    let origins = config.origins();
    let aggregation = Aggregator::new(config.options).aggregate(&origins).await;
    let summary = aggregation.report.summary();
    if aggregation.records.is_empty() {
        warn!(%summary, "no records acquired");
    } else {
        info!(records = aggregation.records.len(), %summary, "acquisition finished");
    }

    let app = App::new(aggregation.records, config.origin_tags(), summary);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> anyhow::Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while app.running {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        match events.next().await {
            Some(AppEvent::Key(key)) => handle_key(&mut app, key),
            Some(AppEvent::Resize(..) | AppEvent::Tick) => {}
            None => break,
        }
    }

    Ok(())
}
