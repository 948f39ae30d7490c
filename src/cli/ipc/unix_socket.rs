//! Unix Domain Socket communication for daemon control

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::protocol::{DaemonRequest, Reply};
use super::{IpcClient, IpcServer};
use crate::cli::signals::DaemonSignal;

const SOCKET_NAME: &str = "clipmark.sock";

/// Location of the daemon socket
#[derive(Debug, Clone)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// `$XDG_RUNTIME_DIR/clipmark.sock`, or the temp dir when unset
    pub fn new() -> Self {
        let dir = std::env::var_os("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        Self::with_path(dir.join(SOCKET_NAME))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn remove_stale(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}

pub struct UnixSocketServer {
    socket_path: SocketPath,
    listener: Option<UnixListener>,
}

impl UnixSocketServer {
    pub fn new(socket_path: SocketPath) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }
}

impl Drop for UnixSocketServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[async_trait]
impl IpcServer for UnixSocketServer {
    fn bind(&mut self) -> io::Result<()> {
        // left behind by a daemon that did not exit cleanly
        self.socket_path.remove_stale()?;
        self.listener = Some(UnixListener::bind(self.socket_path.path())?);
        Ok(())
    }

    fn path(&self) -> String {
        self.socket_path.path().display().to_string()
    }

    async fn run(&self, tx: mpsc::Sender<DaemonSignal>) -> io::Result<()> {
        let Some(listener) = self.listener.as_ref() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket not bound"));
        };

        loop {
            let stream = match listener.accept().await {
                Ok((stream, _)) => stream,
                Err(e) => {
                    warn!(error = %e, "socket accept failed");
                    continue;
                }
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(e) = serve(stream, tx).await {
                    warn!(error = %e, "client connection failed");
                }
            });
        }
    }

    fn cleanup(&self) {
        let _ = self.socket_path.remove_stale();
    }
}

/// One request line in, one reply line out
async fn serve(stream: UnixStream, tx: mpsc::Sender<DaemonSignal>) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let line = BufReader::new(reader).lines().next_line().await?.unwrap_or_default();

    let reply = match line.parse::<DaemonRequest>() {
        Ok(request) => forward(request, &tx).await,
        Err(e) => Reply::error(e),
    };

    writer.write_all(format!("{}\n", reply).as_bytes()).await?;
    writer.shutdown().await
}

/// Hand a request to the daemon loop and wait for its answer
async fn forward(request: DaemonRequest, tx: &mpsc::Sender<DaemonSignal>) -> Reply {
    debug!(%request, "daemon request");
    let (reply_tx, reply_rx) = oneshot::channel();
    if tx.send(DaemonSignal::Request(request, reply_tx)).await.is_err() {
        return Reply::error("daemon is shutting down");
    }
    reply_rx
        .await
        .unwrap_or_else(|_| Reply::error("daemon is shutting down"))
}

pub struct UnixSocketClient {
    socket_path: SocketPath,
}

impl UnixSocketClient {
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }
}

#[async_trait]
impl IpcClient for UnixSocketClient {
    fn is_daemon_running(&self) -> bool {
        self.socket_path.path().exists()
    }

    async fn send(&self, request: &DaemonRequest) -> io::Result<Reply> {
        let mut stream = UnixStream::connect(self.socket_path.path()).await?;
        stream.write_all(format!("{}\n", request).as_bytes()).await?;

        let mut response = String::new();
        BufReader::new(stream).read_line(&mut response).await?;
        Ok(Reply::parse(&response))
    }
}
