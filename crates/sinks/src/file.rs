//! File backend
//!
//! Plain file destination with log-rotation support: an external signal
//! sets the sink's rotation flag, and the next write reopens the path
//! before touching the file handle.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dnseve_config::FileOutputConfig;

use crate::common::SinkError;

/// Open file destination
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    append: bool,
    file: File,
}

impl FileBackend {
    /// Open the configured path.
    ///
    /// # Errors
    ///
    /// An unwritable path is fatal at startup - unlike network
    /// destinations there is nothing to retry against later.
    pub fn open(config: &FileOutputConfig) -> Result<Self, SinkError> {
        let path = PathBuf::from(&config.path);
        let file = Self::open_path(&path, config.append).map_err(|e| SinkError::Open {
            path: config.path.clone(),
            source: e,
        })?;

        Ok(Self {
            path,
            append: config.append,
            file,
        })
    }

    /// Write one event and flush it out.
    ///
    /// Events must hit the file individually; readers tail it live.
    pub fn write(&mut self, payload: &[u8]) -> io::Result<()> {
        self.file.write_all(payload)?;
        self.file.flush()
    }

    /// Close and reopen the path, picking up a rotated file.
    ///
    /// Reopen always appends: rotation must never truncate a file another
    /// process just moved into place.
    pub fn reopen(&mut self) -> io::Result<()> {
        self.file = Self::open_path(&self.path, true)?;
        Ok(())
    }

    fn open_path(path: &Path, append: bool) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .append(append)
            .write(true)
            .truncate(!append)
            .open(path)
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;
