//! History command handler
//!
//! Edits go through the running daemon so its in-memory history stays the
//! single writer of the history file. Listing and search fall back to
//! reading the file directly when no daemon is running.

use std::path::PathBuf;

use crate::application::ports::HistoryRepository;
use crate::domain::history::History;
use crate::infrastructure::JsonHistoryFile;

use super::args::HistoryAction;
use super::daemon_cmd::{parse_data, report, send_request};
use super::ipc::{create_ipc_client, DaemonRequest, EntrySummary, Reply};
use super::presenter::Presenter;

/// Handle history subcommand
pub async fn handle_history_command(
    action: HistoryAction,
    history_path: Option<PathBuf>,
    capacity: usize,
    presenter: &Presenter,
) -> Result<(), String> {
    let request = match action {
        HistoryAction::List { limit, json } => {
            let entries = query_entries(None, history_path, capacity, presenter).await?;
            print_entries(entries, limit, json, presenter)?;
            return Ok(());
        }
        HistoryAction::Search { query, limit, json } => {
            let entries = query_entries(Some(query), history_path, capacity, presenter).await?;
            print_entries(entries, limit, json, presenter)?;
            return Ok(());
        }
        HistoryAction::ClearAll { yes: false } => {
            return Err("This also removes favorites. Re-run with --yes to confirm".to_string());
        }
        HistoryAction::ClearAll { yes: true } => DaemonRequest::ClearAll,
        HistoryAction::Clear => DaemonRequest::Clear,
        HistoryAction::Favorite { id } => DaemonRequest::Favorite { id },
        HistoryAction::Delete { id } => DaemonRequest::Delete { id },
        HistoryAction::Copy { id, plain } => DaemonRequest::Copy { id, rich: !plain },
        HistoryAction::Paste { id, plain } => DaemonRequest::Paste { id, rich: !plain },
    };

    let reply = send_request(&request).await?;
    report(reply, &request, presenter)
}

/// Entries from the daemon, or from the history file when none runs
async fn query_entries(
    query: Option<String>,
    history_path: Option<PathBuf>,
    capacity: usize,
    presenter: &Presenter,
) -> Result<Vec<EntrySummary>, String> {
    if create_ipc_client().is_daemon_running() {
        return match send_request(&DaemonRequest::List { query }).await? {
            Reply::Data(json) => parse_data(&json),
            Reply::Error(message) => Err(message),
            Reply::Ok(_) => Err("Unexpected daemon reply".to_string()),
        };
    }

    let file = match history_path {
        Some(path) => JsonHistoryFile::with_path(path),
        None => JsonHistoryFile::new(),
    };
    presenter.info(&format!("No daemon running, reading {}", file.path().display()));
    read_history_file(&file, query.as_deref(), capacity).await
}

async fn read_history_file(
    file: &JsonHistoryFile,
    query: Option<&str>,
    capacity: usize,
) -> Result<Vec<EntrySummary>, String> {
    let entries = file.load().await.map_err(|e| e.to_string())?;
    let history = History::from_entries(entries, capacity);
    let matches = match query {
        Some(query) => history.search(query),
        None => history.listing(),
    };
    Ok(matches.into_iter().map(EntrySummary::from).collect())
}

fn print_entries(
    mut entries: Vec<EntrySummary>,
    limit: Option<usize>,
    json: bool,
    presenter: &Presenter,
) -> Result<(), String> {
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    if json {
        let json = serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?;
        presenter.output(&json);
    } else {
        presenter.entries(&entries);
    }
    Ok(())
}
