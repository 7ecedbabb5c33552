//! CLI Command Handlers
//!
//! One handler per subcommand. Each takes its parsed args, the backend client
//! and the output handler, and returns an ExitCode.

use std::io::{BufRead, IsTerminal, Write};

use serde::Serialize;
use tracing::info;

use crate::api::BackendClient;
use crate::cli::{
    validate_show_id, ExitCode, GrabCmd, LogsCmd, Output, SearchCmd, ShowCmd, ShowsCmd, StatusOk,
    SyncCmd,
};
use crate::models::{IndexerHit, ReleaseRecord, Show};

/// Print `data` as JSON, or run the human formatter
fn emit<T: Serialize>(output: &Output, data: &T, human: impl FnOnce(&Output)) -> ExitCode {
    if output.json {
        if let Err(e) = output.print(data) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        human(output);
    }
    ExitCode::Success
}

fn print_hits(output: &Output, hits: &[IndexerHit]) {
    if hits.is_empty() {
        output.line("No results");
    }
    for hit in hits {
        output.line(format!(
            "{:<12} {}  [{}] S:{} L:{} G:{}  {} · {}",
            hit.primary_key,
            hit.title,
            hit.format_size(),
            hit.seeders,
            hit.leechers,
            hit.grabs,
            hit.indexer,
            hit.age_descriptor()
        ));
        if !hit.info_url.is_empty() {
            output.line(format!("{:<12} {}", "", hit.info_url));
        }
    }
}

// =============================================================================
// Shows Command
// =============================================================================

pub async fn shows_cmd(cmd: ShowsCmd, client: &BackendClient, output: &Output) -> ExitCode {
    let only_missing = !cmd.all;
    output.info(format!(
        "Listing {} shows...",
        if only_missing { "incomplete" } else { "all" }
    ));

    match client.list_shows(only_missing).await {
        Ok(shows) => emit(output, &shows, |out| {
            for show in &shows {
                let missing: Vec<String> = show
                    .missing_seasons
                    .iter()
                    .map(|s| format!("S{:02}", s))
                    .collect();
                if missing.is_empty() {
                    out.line(format!("{:>6}  {}", show.id, show));
                } else {
                    out.line(format!(
                        "{:>6}  {}  missing {}",
                        show.id,
                        show,
                        missing.join(" ")
                    ));
                }
            }
        }),
        Err(e) => output.gateway_error(&e),
    }
}

// =============================================================================
// Show Command
// =============================================================================

fn print_show(out: &Output, show: &Show) {
    out.line(format!("{} [{}]", show.metadata, show.id));
    if let Some(title_en) = show.metadata.title_en.as_deref().filter(|t| !t.is_empty()) {
        out.line(format!("  {}", title_en));
    }
    if !show.metadata.genres.is_empty() {
        out.line(format!("  {}", show.metadata.genres.join(", ")));
    }
    for season in show.coverage.numbered() {
        out.line(format!("  {}", season));
    }
    out.line(format!(
        "  {} releases, {} search results (last search: {})",
        show.releases.len(),
        show.search_results.len(),
        show.last_search_term.as_deref().unwrap_or("-")
    ));
}

pub async fn show_cmd(cmd: ShowCmd, client: &BackendClient, output: &Output) -> ExitCode {
    let id = match validate_show_id(&cmd.id) {
        Ok(id) => id,
        Err(e) => return output.error(e, ExitCode::InvalidArgs),
    };

    match client.fetch_show(id).await {
        Ok(show) => emit(output, &show, |out| print_show(out, &show)),
        Err(e) => output.gateway_error(&e),
    }
}

// =============================================================================
// Search Command
// =============================================================================

/// Submits the search, then re-fetches the show to report what landed
pub async fn search_cmd(cmd: SearchCmd, client: &BackendClient, output: &Output) -> ExitCode {
    let id = match validate_show_id(&cmd.id) {
        Ok(id) => id,
        Err(e) => return output.error(e, ExitCode::InvalidArgs),
    };

    let query = match cmd.query {
        Some(query) => query,
        None => match client.fetch_show(id).await {
            Ok(show) => show.default_query().to_string(),
            Err(e) => return output.gateway_error(&e),
        },
    };

    output.info(format!("Searching releases for: {}", query));
    info!(show_id = id, query = %query, "cli search");

    if let Err(e) = client.search_release(id, &query).await {
        return output.gateway_error(&e);
    }

    match client.fetch_show(id).await {
        Ok(show) => emit(output, &show.search_results, |out| {
            print_hits(out, &show.search_results)
        }),
        Err(e) => output.gateway_error(&e),
    }
}

// =============================================================================
// Grab Command
// =============================================================================

#[derive(Debug, Serialize)]
struct GrabResponse {
    status: &'static str,
    show_id: String,
    release_pk: String,
    releases: Vec<ReleaseRecord>,
}

pub async fn grab_cmd(cmd: GrabCmd, client: &BackendClient, output: &Output) -> ExitCode {
    let id = match validate_show_id(&cmd.id) {
        Ok(id) => id,
        Err(e) => return output.error(e, ExitCode::InvalidArgs),
    };
    if cmd.release_pk.trim().is_empty() {
        return output.error("Release key must not be empty", ExitCode::InvalidArgs);
    }

    output.info(format!("Grabbing release {}...", cmd.release_pk));
    info!(show_id = id, release_pk = %cmd.release_pk, "cli grab");

    if let Err(e) = client.grab_release(id, &cmd.release_pk).await {
        return output.gateway_error(&e);
    }

    match client.fetch_show(id).await {
        Ok(show) => {
            let response = GrabResponse {
                status: "ok",
                show_id: show.id.clone(),
                release_pk: cmd.release_pk.clone(),
                releases: show.releases,
            };
            emit(output, &response, |out| {
                out.line(format!("Grab of {} accepted", response.release_pk));
                for release in &response.releases {
                    out.line(format!(
                        "  {}  {}  ({})",
                        release.updated_at_display(),
                        release.name,
                        release.search_term
                    ));
                }
            })
        }
        Err(e) => output.gateway_error(&e),
    }
}

// =============================================================================
// Logs Command
// =============================================================================

pub async fn logs_cmd(cmd: LogsCmd, client: &BackendClient, output: &Output) -> ExitCode {
    match client.list_logs().await {
        Ok(mut records) => {
            records.truncate(cmd.limit);
            emit(output, &records, |out| {
                for entry in &records {
                    out.line(format!(
                        "{}  {:<8} {:<16} {}",
                        entry.time_display(),
                        entry.level.to_uppercase(),
                        entry.component,
                        entry.message
                    ));
                }
            })
        }
        Err(e) => output.gateway_error(&e),
    }
}

// =============================================================================
// Sync Command
// =============================================================================

/// Ask on the terminal; false when stdin is not interactive
fn confirm(prompt: &str) -> bool {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return false;
    }

    eprint!("{} [y/N] ", prompt);
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if stdin.lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

pub async fn sync_cmd(cmd: SyncCmd, client: &BackendClient, output: &Output) -> ExitCode {
    if !cmd.yes && !confirm("Sync all shows now?") {
        return output.error(
            "Sync not confirmed (pass --yes to skip the prompt)",
            ExitCode::InvalidArgs,
        );
    }

    info!("cli sync all");
    match client.sync_all().await {
        Ok(()) => emit(output, &StatusOk::default(), |out| {
            out.line("Sync all started")
        }),
        Err(e) => output.gateway_error(&e),
    }
}
