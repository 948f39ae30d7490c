//! IPC between the daemon and its command-line clients
//!
//! Unix domain sockets carrying the line protocol in [`protocol`].

pub mod protocol;
mod unix_socket;

pub use protocol::{DaemonRequest, DaemonStatus, EntrySummary, ParseRequestError, Reply};
pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::io;

use tokio::sync::mpsc;

use super::signals::DaemonSignal;

/// Server side of the daemon endpoint
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept connections until the process exits.
    ///
    /// Each parsed request is forwarded on `tx` together with a reply
    /// channel; the daemon loop answers through it.
    async fn run(&self, tx: mpsc::Sender<DaemonSignal>) -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Client side of the daemon endpoint
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if daemon appears to be running (endpoint exists)
    fn is_daemon_running(&self) -> bool;

    /// Send a request and wait for its reply
    async fn send(&self, request: &DaemonRequest) -> io::Result<Reply>;
}

pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}
