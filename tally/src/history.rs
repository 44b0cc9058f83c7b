use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::rewrite::render;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Append-only log of evaluated expressions, one `"<expr> = <result>"` per line.
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> History {
        History { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, expression: &str, result: f64) -> Result<(), HistoryError> {
        // a single write per entry so appends don't interleave
        let entry = format!("{} = {}\n", expression, render(result));
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut log| log.write_all(entry.as_bytes()))
            .map_err(|e| self.io_error(e))?;
        debug!("appended to {}: {}", self.path.display(), entry.trim_end());
        Ok(())
    }

    /// All entries oldest first, None if nothing was ever appended.
    pub fn read_all(&self) -> Result<Option<Vec<String>>, HistoryError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text.lines().map(String::from).collect())),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: io::Error) -> HistoryError {
        HistoryError::Io { path: self.path.clone(), source }
    }
}
