//! Single-instance lock for the daemon

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tracing::debug;

const DEFAULT_PID_PATH: &str = "/tmp/clipmark.pid";

#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("Another daemon is already running (PID: {0})")]
    AlreadyRunning(u32),

    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Location of the daemon's pid file
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_PID_PATH)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID of the live process named in the file.
    ///
    /// A file naming a dead process is stale and gets removed.
    pub fn owner(&self) -> Option<u32> {
        let pid: u32 = fs::read_to_string(&self.path).ok()?.trim().parse().ok()?;

        // signal 0: existence check only
        match kill(Pid::from_raw(pid as i32), None) {
            Ok(()) | Err(Errno::EPERM) => Some(pid),
            Err(Errno::ESRCH) => {
                debug!(pid, path = %self.path.display(), "removing stale pid file");
                let _ = fs::remove_file(&self.path);
                None
            }
            Err(_) => None,
        }
    }

    /// Claim the file for this process; held until the returned lock drops
    pub fn lock(self) -> Result<PidLock, PidFileError> {
        if let Some(pid) = self.owner() {
            return Err(PidFileError::AlreadyRunning(pid));
        }
        // unparseable leftovers are not a live owner
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }

        let pid = process::id();
        let io_err = |source| PidFileError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(io_err)?;
        write!(file, "{}", pid).map_err(io_err)?;

        Ok(PidLock {
            path: self.path,
            pid,
        })
    }
}

impl Default for PidFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Held pid file; removed on drop if it still names this process
pub struct PidLock {
    path: PathBuf,
    pid: u32,
}

impl Drop for PidLock {
    fn drop(&mut self) {
        let ours = fs::read_to_string(&self.path)
            .map(|s| s.trim() == self.pid.to_string())
            .unwrap_or(false);
        if ours {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path() {
        assert_eq!(PidFile::new().path(), Path::new(DEFAULT_PID_PATH));
    }

    #[test]
    fn missing_file_has_no_owner() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PidFile::with_path(dir.path().join("none.pid")).owner().is_none());
    }

    #[test]
    fn live_owner_blocks_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");
        fs::write(&path, process::id().to_string()).unwrap();

        assert_eq!(PidFile::with_path(&path).owner(), Some(process::id()));
        assert!(matches!(
            PidFile::with_path(&path).lock(),
            Err(PidFileError::AlreadyRunning(pid)) if pid == process::id()
        ));
    }

    #[test]
    fn garbage_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");
        fs::write(&path, "not a pid").unwrap();

        assert!(PidFile::with_path(&path).owner().is_none());
        let lock = PidFile::with_path(&path).lock().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), process::id().to_string());
        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn drop_leaves_a_file_it_no_longer_owns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");

        let lock = PidFile::with_path(&path).lock().unwrap();
        fs::write(&path, "1").unwrap();
        drop(lock);
        assert!(path.exists());
    }

    #[test]
    fn unwritable_location_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("daemon.pid");
        assert!(matches!(
            PidFile::with_path(path).lock(),
            Err(PidFileError::Io { .. })
        ));
    }
}
