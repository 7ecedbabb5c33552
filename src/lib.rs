//! seriestui - terminal client for a TV series tracker
//!
//! Browse tracked shows, run indexer searches through the tracker backend,
//! and grab releases one at a time.
//!
//! # Modules
//!
//! - `models` - Wire types served by the backend
//! - `api` - Backend HTTP client
//! - `acquisition` - Show snapshot store and the search/grab state machine
//! - `app` - Routing, navigation and key handling
//! - `runtime` - Executes backend effects on tokio tasks
//! - `ui` - TUI components
//! - `config`, `cli`, `commands` - Configuration and scriptable CLI mode

pub mod acquisition;
pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod runtime;
pub mod ui;

// Re-export commonly used types
pub use models::{
    IndexerHit, LogEntry, ReleaseRecord, Season, SeasonCoverage, Show, ShowMetadata, ShowSummary,
};

pub use acquisition::{AcquisitionController, Completion, Effect, Intent, LockPolicy, Tab};
pub use api::{BackendClient, GatewayError};
pub use app::{App, AppEffect, AppEvent, Route};
