//! Daemon app runner

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::application::ports::{
    HistoryRepository, InjectionPermission, Keystroke, Notice, Notifier,
};
use crate::application::{
    ClipboardEngine, EngineConfig, EngineError, EngineEvent, EnginePorts, HotkeyCommands,
    PasteStatus, WrittenFormat,
};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    create_keystroke, ArboardClipboard, JsonHistoryFile, KeystrokeToolPreference, NoOpKeystroke,
    NotifyRustNotifier, SessionPermission,
};

use super::app::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
use super::args::DaemonOptions;
use super::ipc::{create_ipc_server, DaemonRequest, DaemonStatus, EntrySummary, Reply};
use super::pid_file::PidFile;
use super::presenter::Presenter;
use super::signals::{DaemonSignal, DaemonSignalHandler};

/// Run daemon mode
pub async fn run_daemon(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let options = DaemonOptions::from_config(&config);

    let _pid_lock = match PidFile::new().lock() {
        Ok(lock) => lock,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let keystroke: Box<dyn Keystroke> = if options.paste {
        let preference = match options.keystroke_tool.parse::<KeystrokeToolPreference>() {
            Ok(p) => p,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        };
        match create_keystroke(preference).await {
            Ok((keystroke, tool)) => {
                info!(%tool, "paste keystroke ready");
                keystroke
            }
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        Box::new(NoOpKeystroke)
    };

    let history_file = match options.history_path.clone() {
        Some(path) => JsonHistoryFile::with_path(path),
        None => JsonHistoryFile::new(),
    };
    let history_path = history_file.path().to_path_buf();

    let ports = EnginePorts {
        clipboard: Arc::new(ArboardClipboard::new()),
        keystroke,
        permission: Box::new(SessionPermission::new()) as Box<dyn InjectionPermission>,
        repository: Some(Arc::new(history_file) as Arc<dyn HistoryRepository>),
    };
    let engine = Arc::new(ClipboardEngine::new(EngineConfig::from_app_config(&config), ports).await);

    let (mut signals, signal_tx) = match DaemonSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut ipc_server = create_ipc_server();
    if let Err(e) = ipc_server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let socket = ipc_server.path();

    tokio::spawn(async move {
        if let Err(e) = ipc_server.run(signal_tx).await {
            warn!(error = %e, "socket server stopped");
        }
    });

    let notifier: Option<Arc<dyn Notifier>> = options
        .notify
        .then(|| Arc::new(NotifyRustNotifier::new()) as Arc<dyn Notifier>);
    let reporter = tokio::spawn(report_events(engine.subscribe(), notifier));

    engine.start().await;

    presenter.daemon_status(&format!(
        "Monitoring clipboard ({} entries loaded)",
        engine.store().len().await
    ));
    presenter.info(&format!(
        "PID: {} | Socket: {} | History: {}",
        std::process::id(),
        socket,
        history_path.display()
    ));

    let result = daemon_loop(&engine, &mut signals, &presenter).await;

    presenter.daemon_status("Shutting down...");
    engine.stop().await;
    reporter.abort();

    if result {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Serve requests one at a time until stop or shutdown.
///
/// Returns false when the signal channel closes unexpectedly.
async fn daemon_loop(
    engine: &ClipboardEngine,
    signals: &mut DaemonSignalHandler,
    presenter: &Presenter,
) -> bool {
    loop {
        match signals.recv().await {
            Some(DaemonSignal::Request(DaemonRequest::Stop, reply)) => {
                let _ = reply.send(Reply::ok());
                return true;
            }
            Some(DaemonSignal::Request(request, reply)) => {
                debug!(%request, "handling request");
                let response = handle_request(engine, request).await;
                if let Reply::Error(message) = &response {
                    presenter.warn(message);
                }
                let _ = reply.send(response);
            }
            Some(DaemonSignal::Shutdown) => return true,
            None => return false,
        }
    }
}

/// Execute one client request against the engine
pub(crate) async fn handle_request(engine: &ClipboardEngine, request: DaemonRequest) -> Reply {
    match execute(engine, request).await {
        Ok(reply) => reply,
        Err(e) => Reply::error(e),
    }
}

async fn execute(engine: &ClipboardEngine, request: DaemonRequest) -> Result<Reply, EngineError> {
    let store = engine.store();
    let reply = match request {
        DaemonRequest::Show => {
            engine.on_show_history_requested().await;
            Reply::json(&summaries(&store.listing().await))
        }
        DaemonRequest::PasteRich => paste_reply(engine.on_paste_rich_text_requested().await?),
        DaemonRequest::PastePlain => {
            paste_reply(engine.on_paste_as_plain_text_requested().await?)
        }
        DaemonRequest::Pause => {
            engine.watcher().set_paused(true);
            Reply::ok_with("monitoring paused")
        }
        DaemonRequest::Resume => {
            engine.watcher().set_paused(false);
            Reply::ok_with("monitoring resumed")
        }
        DaemonRequest::Status => Reply::json(&DaemonStatus {
            monitoring: engine.watcher().is_running().await,
            paused: engine.watcher().is_paused(),
            entries: store.len().await,
            capacity: store.capacity().await,
        }),
        // the loop exits before getting here
        DaemonRequest::Stop => Reply::ok(),
        DaemonRequest::List { query } => {
            let entries = match query {
                Some(query) => store.search(&query).await,
                None => store.listing().await,
            };
            Reply::json(&summaries(&entries))
        }
        DaemonRequest::Favorite { id } => {
            let entry = engine.find(&id).await?;
            match store.toggle_favorite(entry.id()).await {
                Some(true) => Reply::ok_with(format!("{} marked favorite", entry.id().short())),
                Some(false) => Reply::ok_with(format!("{} unmarked", entry.id().short())),
                None => return Err(EngineError::EntryNotFound(id)),
            }
        }
        DaemonRequest::Delete { id } => {
            let entry = engine.find(&id).await?;
            if !store.delete_entry(entry.id()).await {
                return Err(EngineError::EntryNotFound(id));
            }
            Reply::ok_with(format!("{} deleted", entry.id().short()))
        }
        DaemonRequest::Clear => {
            let removed = store.clear_history().await;
            Reply::ok_with(format!("removed {} entries, favorites kept", removed))
        }
        DaemonRequest::ClearAll => {
            let removed = store.clear_all_history().await;
            Reply::ok_with(format!("removed {} entries", removed))
        }
        DaemonRequest::Copy { id, rich } => {
            let entry = engine.find(&id).await?;
            let format = engine.copy_to_clipboard(&entry, rich).await?;
            Reply::ok_with(format!("copied {}", format_label(format)))
        }
        DaemonRequest::Paste { id, rich } => {
            let entry = engine.find(&id).await?;
            paste_reply(engine.paste_entry(&entry, rich).await?)
        }
    };
    Ok(reply)
}

fn summaries(entries: &[crate::domain::entry::ClipboardEntry]) -> Vec<EntrySummary> {
    entries.iter().map(EntrySummary::from).collect()
}

fn format_label(format: WrittenFormat) -> &'static str {
    match format {
        WrittenFormat::PlainText => "as plain text",
        WrittenFormat::RichText => "as rich text",
    }
}

/// Clipboard writes succeeded in every case, so every status is `ok`
fn paste_reply(status: PasteStatus) -> Reply {
    let label = format_label(status.format());
    match status {
        PasteStatus::Pasted(_) => Reply::ok_with(format!("pasted {}", label)),
        PasteStatus::KeystrokeDisabled(_) => Reply::ok_with(format!("copied {}", label)),
        PasteStatus::PermissionMissing(_) => Reply::ok_with(format!(
            "copied {}; input injection not permitted, paste manually",
            label
        )),
        PasteStatus::InjectionFailed { message, .. } => Reply::ok_with(format!(
            "copied {}; paste keystroke failed: {}",
            label, message
        )),
    }
}

/// Log engine events and raise notifications for the ones a user must act on
async fn report_events(
    mut events: tokio::sync::broadcast::Receiver<EngineEvent>,
    notifier: Option<Arc<dyn Notifier>>,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "event reporter lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        debug!(?event, "engine event");
        let Some(notifier) = notifier.as_ref() else {
            continue;
        };
        if let Some(notice) = Notice::from_event(&event) {
            if let Err(e) = notifier.notify(&notice).await {
                warn!(error = %e, "notification failed");
            }
        }
    }
}
