//! CLI - Command Line Interface for seriestui
//!
//! Every acquisition action the TUI offers is scriptable. Output is
//! JSON-parseable with `--json` or when stdout is not a terminal.
//!
//! # Examples
//!
//! ```bash
//! # Shows with missing seasons
//! seriestui shows
//!
//! # Search and grab
//! seriestui search 42 "Breaking Bad S01"
//! seriestui grab 42 abc
//!
//! # Backend housekeeping
//! seriestui logs --limit 20
//! seriestui sync --yes
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::GatewayError;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// General error (including undecodable backend responses)
    Error = 1,
    InvalidArgs = 2,
    /// Backend unreachable
    NetworkError = 3,
    /// Show does not exist
    NotFound = 4,
    /// Backend answered with a non-success status
    Rejected = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<&GatewayError> for ExitCode {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Network(_) => ExitCode::NetworkError,
            GatewayError::NotFound => ExitCode::NotFound,
            GatewayError::RequestRejected(_) => ExitCode::Rejected,
            GatewayError::Decode(_) => ExitCode::Error,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// seriestui - terminal client for a TV series tracker
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "seriestui",
    version,
    about = "Terminal client for a TV series tracker backend",
    long_about = "Browse tracked shows, search indexers for releases and grab them.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  seriestui                          Launch interactive TUI\n\
                  seriestui --open /show/42          Open the TUI on one show\n\
                  seriestui search 42 \"Dark S02\"     Search releases for show 42\n\
                  seriestui grab 42 abc              Grab release abc"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Tracker backend base URL
    #[arg(long, short = 'b', global = true)]
    pub backend_url: Option<String>,

    /// Route the TUI opens on (/, /show/{id}, /logs, /tasks)
    #[arg(long, default_value = "/")]
    pub open: String,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tracked shows
    #[command(visible_alias = "ls")]
    Shows(ShowsCmd),

    /// Show details for one show
    #[command(visible_alias = "i")]
    Show(ShowCmd),

    /// Run an indexer search for a show and print the results
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Grab one release from a show's search results
    #[command(visible_alias = "g")]
    Grab(GrabCmd),

    /// Print recent backend log records
    Logs(LogsCmd),

    /// Trigger the backend's "sync all" task
    Sync(SyncCmd),
}

#[derive(Args, Debug)]
pub struct ShowsCmd {
    /// Include shows with no missing seasons
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ShowCmd {
    /// Show id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Show id
    pub id: String,

    /// Search query (defaults to the last search term or the title)
    pub query: Option<String>,
}

#[derive(Args, Debug)]
pub struct GrabCmd {
    /// Show id
    pub id: String,

    /// Primary key of the search result to grab
    pub release_pk: String,
}

#[derive(Args, Debug)]
pub struct LogsCmd {
    /// Maximum number of records to print
    #[arg(long, short = 'n', default_value_t = 50)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct SyncCmd {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Gateway error label (network, not_found, rejected, decode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            kind: None,
            exit_code: 0,
        }
    }
}

impl JsonOutput<()> {
    pub fn error_msg(msg: impl Into<String>, kind: Option<&str>, code: ExitCode) -> Self {
        Self {
            data: None,
            error: Some(msg.into()),
            kind: kind.map(str::to_string),
            exit_code: code.into(),
        }
    }
}

/// Status OK response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl Default for StatusOk {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data wrapped in `JsonOutput`
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print a human-readable line (ignored in JSON mode)
    pub fn line(&self, msg: impl std::fmt::Display) {
        if !self.json {
            println!("{}", msg);
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        self.emit_error(msg.into(), None, code)
    }

    /// Report a backend failure with its mapped exit code
    pub fn gateway_error(&self, err: &GatewayError) -> ExitCode {
        self.emit_error(err.to_string(), Some(err.kind()), ExitCode::from(err))
    }

    fn emit_error(&self, msg: String, kind: Option<&str>, code: ExitCode) -> ExitCode {
        if self.json {
            let output = JsonOutput::error_msg(&msg, kind, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Argument Validation
// =============================================================================

/// Show ids are opaque but must be a single non-blank path segment
pub fn validate_show_id(id: &str) -> Result<&str, &'static str> {
    let id = id.trim();
    if id.is_empty() {
        Err("Show id must not be empty")
    } else if id.contains('/') {
        Err("Show id must not contain '/'")
    } else {
        Ok(id)
    }
}

// =============================================================================
// Tests
// =============================================================================
