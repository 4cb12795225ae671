//! Headless driver.
//!
//! Runs the `JP` command against a JSON file the way an editor would: the
//! file is loaded into a source buffer of an in-process host, the command is
//! dispatched, and the result buffer is printed. With watching enabled the
//! source buffer is refreshed on every change and the query re-run, so the
//! same result buffer is reused for the whole session.

mod event_loop;
mod session;

pub use session::Session;

use std::path::PathBuf;

use crate::host::SplitDirection;

/// Main application struct holding what to run and how.
pub struct App {
    file_path: PathBuf,
    query: String,
    watch_enabled: bool,
    split: SplitDirection,
    filetype: Option<String>,
}

impl App {
    /// Create a new application for the given file and query.
    pub fn new(file_path: PathBuf, query: impl Into<String>) -> Self {
        Self {
            file_path,
            query: query.into(),
            watch_enabled: false,
            split: SplitDirection::default(),
            filetype: None,
        }
    }

    /// Enable or disable file watching.
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Set where the result buffer is revealed.
    pub const fn with_split(mut self, split: SplitDirection) -> Self {
        self.split = split;
        self
    }

    /// Override the filetype tag put on result buffers.
    pub fn with_filetype(mut self, filetype: Option<String>) -> Self {
        self.filetype = filetype;
        self
    }
}
