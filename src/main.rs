//! Clipmark CLI entry point

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use clipmark::cli::{
    app::{cli_config, load_merged_config, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    convert_cmd::handle_convert_command,
    daemon_app::run_daemon,
    daemon_cmd::handle_daemon_command,
    history_cmd::handle_history_command,
    presenter::Presenter,
};
use clipmark::infrastructure::XdgConfigStore;

/// Filter variable for log output (stderr)
const LOG_ENV: &str = "CLIPMARK_LOG";

fn init_tracing(verbose: bool) {
    let default = if verbose { "clipmark=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presenter = Presenter::new();

    let config = load_merged_config(cli_config(&cli)).await;

    let result = match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            handle_config_command(action, &store, &presenter)
                .await
                .map_err(|e| e.to_string())
        }
        Some(Commands::Daemon { action }) => handle_daemon_command(action, &presenter).await,
        Some(Commands::History { action }) => {
            handle_history_command(
                action,
                config.history_path(),
                config.capacity_or_default(),
                &presenter,
            )
            .await
        }
        Some(Commands::Convert { file, plain }) => {
            handle_convert_command(file.as_deref(), plain, &presenter).await
        }
        None if cli.daemon => return run_daemon(config).await,
        None => {
            let _ = Cli::command().print_help();
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            presenter.error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
