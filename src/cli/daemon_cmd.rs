//! Daemon command handler - sends commands to running daemon via IPC

use super::args::DaemonAction;
use super::ipc::{create_ipc_client, DaemonRequest, DaemonStatus, EntrySummary, Reply};
use super::presenter::Presenter;

pub(crate) const NO_DAEMON: &str = "No daemon running. Start with: clipmark --daemon";

/// Handle daemon subcommand
pub async fn handle_daemon_command(action: DaemonAction, presenter: &Presenter) -> Result<(), String> {
    let request = match action {
        DaemonAction::Show => DaemonRequest::Show,
        DaemonAction::PasteRich => DaemonRequest::PasteRich,
        DaemonAction::PastePlain => DaemonRequest::PastePlain,
        DaemonAction::Pause => DaemonRequest::Pause,
        DaemonAction::Resume => DaemonRequest::Resume,
        DaemonAction::Status => DaemonRequest::Status,
        DaemonAction::Stop => DaemonRequest::Stop,
    };

    match send_request(&request).await? {
        Reply::Data(json) if action == DaemonAction::Status => {
            let status: DaemonStatus = parse_data(&json)?;
            presenter.status(&status);
        }
        Reply::Data(json) => {
            let entries: Vec<EntrySummary> = parse_data(&json)?;
            presenter.entries(&entries);
        }
        reply => report(reply, &request, presenter)?,
    }
    Ok(())
}

/// Send one request, failing early when no daemon socket exists
pub(crate) async fn send_request(request: &DaemonRequest) -> Result<Reply, String> {
    let client = create_ipc_client();
    if !client.is_daemon_running() {
        return Err(NO_DAEMON.to_string());
    }
    client
        .send(request)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))
}

/// Print an `ok`/`error` reply
pub(crate) fn report(reply: Reply, request: &DaemonRequest, presenter: &Presenter) -> Result<(), String> {
    match reply {
        Reply::Ok(Some(detail)) => presenter.success(&detail),
        Reply::Ok(None) => presenter.success(&format!("Command sent: {}", request)),
        Reply::Error(message) => return Err(message),
        Reply::Data(data) => presenter.output(&data),
    }
    Ok(())
}

pub(crate) fn parse_data<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Unexpected daemon reply: {}", e))
}
