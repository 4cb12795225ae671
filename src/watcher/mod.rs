//! Change notifications for the JSON file a headless session reads.
//!
//! The parent directory is watched rather than the file itself, since saving
//! by rename swaps the file out from under a file-level watch. Bursts of
//! events collapse into one change once the file has been quiet for the
//! debounce interval.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

/// Debounced watch on one JSON input file.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    dir: PathBuf,
    file: PathBuf,
    file_name: Option<OsString>,
    debounce: Duration,
    dirty_since: Option<Instant>,
}

impl FileWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if notify cannot watch the containing directory.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        let path = path.as_ref();
        // notify reports canonical paths.
        let file = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let file_name = file.file_name().map(std::ffi::OsStr::to_os_string);
        let dir = containing_dir(&file);

        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            events,
            dir,
            file,
            file_name,
            debounce,
            dirty_since: None,
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.file
    }

    /// Drain pending events and report whether the file changed and has
    /// since been quiet for the debounce interval.
    pub fn poll_change(&mut self) -> bool {
        let mut drained = 0u32;
        let mut touched = false;
        for event in self.events.try_iter() {
            drained += 1;
            match event {
                Ok(ev) if self.touches_file(&ev) => touched = true,
                Ok(ev) => debug!(kind = ?ev.kind, paths = ?ev.paths, "skipping unrelated event"),
                Err(err) => warn!(%err, "file watcher error"),
            }
        }
        if drained > 0 {
            debug!(drained, touched, file = %self.file.display(), "drained watch events");
        }

        if touched {
            self.dirty_since = Some(Instant::now());
        }
        match self.dirty_since {
            Some(since) if since.elapsed() >= self.debounce => {
                self.dirty_since = None;
                true
            }
            _ => false,
        }
    }

    fn touches_file(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.dir
                || path == &self.file
                || path.file_name().is_some_and(|name| self.file_name.as_deref() == Some(name))
        })
    }
}

fn containing_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
