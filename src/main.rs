//! seriestui - terminal client for a TV series tracker
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! seriestui
//! seriestui --open /show/42
//!
//! # CLI mode (for automation)
//! seriestui shows --all
//! seriestui search 42 "Breaking Bad S01"
//! seriestui grab 42 abc --json
//! ```

use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seriestui::api::BackendClient;
use seriestui::app::{App, AppEvent, Route};
use seriestui::cli::{Cli, Command, ExitCode, Output};
use seriestui::commands;
use seriestui::config::Config;
use seriestui::runtime::Dispatcher;
use seriestui::ui::render_app;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let client = BackendClient::new(config.backend_url(cli.backend_url.as_deref()));

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        init_cli_logging();
        let exit_code = run_cli(cli, &client).await;
        std::process::exit(exit_code.into());
    }

    let Some(route) = Route::from_path(&cli.open) else {
        let output = Output::new(&cli);
        let code = output.error(
            format!("Unknown route '{}' (expected /, /show/{{id}}, /logs or /tasks)", cli.open),
            ExitCode::InvalidArgs,
        );
        std::process::exit(code.into());
    };

    init_tui_logging(&config.log_path());
    run_tui(client, &config, cli.config.as_deref(), route).await
}

// =============================================================================
// Logging
// =============================================================================

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// CLI mode logs warnings to stderr
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(env_filter("seriestui=warn"))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// TUI mode logs to a file so the terminal stays clean
fn init_tui_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let layer = tracing_subscriber::fmt::layer().with_ansi(false);
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => tracing_subscriber::registry()
            .with(env_filter("seriestui=info"))
            .with(layer.with_writer(Mutex::new(file)))
            .init(),
        Err(_) => tracing_subscriber::registry()
            .with(env_filter("seriestui=info"))
            .with(layer.with_writer(std::io::sink))
            .init(),
    }
}

// =============================================================================
// CLI Mode
// =============================================================================

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, client: &BackendClient) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::Shows(cmd)) => commands::shows_cmd(cmd, client, &output).await,
        Some(Command::Show(cmd)) => commands::show_cmd(cmd, client, &output).await,
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, client, &output).await,
        Some(Command::Grab(cmd)) => commands::grab_cmd(cmd, client, &output).await,
        Some(Command::Logs(cmd)) => commands::logs_cmd(cmd, client, &output).await,
        Some(Command::Sync(cmd)) => commands::sync_cmd(cmd, client, &output).await,
        // Handled by the is_cli_mode check
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(
    client: BackendClient,
    config: &Config,
    config_path: Option<&Path>,
    route: Route,
) -> Result<()> {
    info!(backend = client.base_url(), route = %route, "starting tui");

    let (dispatcher, rx) = Dispatcher::new(client);
    let mut app = App::new(config.lock_policy, config.only_missing);
    app.start(route);

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &dispatcher, rx).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    if let Err(e) = config.persist_only_missing(app.series.only_missing, config_path) {
        warn!(error = %e, "failed to save series filter");
    }

    result
}

/// Main event loop - dispatches effects, renders, handles input, applies results
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    dispatcher: &Dispatcher,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        dispatcher.dispatch_all(app.take_effects());

        terminal.draw(|frame| render_app(frame, app))?;

        // Poll for events with timeout so completions are picked up
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.apply(event);
        }
    }

    Ok(())
}
