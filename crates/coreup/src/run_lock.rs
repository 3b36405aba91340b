use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use fs2::FileExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("another coreup run is already in progress")]
    AlreadyRunning,
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl AcquireError {
    fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}

/// Exclusive lock held for the duration of a run, so two runs never unpack
/// into the same base directory at once. Released on drop.
#[derive(Debug)]
pub struct RunLock {
    _file: File,
}

impl RunLock {
    /// Take the lock at `path`, creating the file if needed.
    ///
    /// # Errors
    /// Returns [`AcquireError::AlreadyRunning`] when another process holds the
    /// lock, or an I/O error when the lock file cannot be opened or written.
    pub fn acquire(path: &Path) -> Result<Self, AcquireError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|error| AcquireError::io("failed to create lock directory", error))?;
        }

        let mut lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|error| AcquireError::io("failed to open run lock file", error))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {}
            Err(error) if error.kind() == fs2::lock_contended_error().kind() => {
                return Err(AcquireError::AlreadyRunning);
            }
            Err(error) => {
                return Err(AcquireError::io("failed to acquire run lock", error));
            }
        }

        lock_file
            .set_len(0)
            .and_then(|()| lock_file.seek(SeekFrom::Start(0)).map(|_| ()))
            .and_then(|()| writeln!(lock_file, "{}", std::process::id()))
            .map_err(|error| AcquireError::io("failed to write run lock metadata", error))?;

        Ok(Self { _file: lock_file })
    }
}
