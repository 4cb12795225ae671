use std::io::{Write, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::{App, Session};
use crate::plugin::Plugin;
use crate::watcher::FileWatcher;

const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);
const WATCH_POLL: Duration = Duration::from_millis(250);

impl App {
    fn make_plugin(&self) -> Plugin {
        let plugin = Plugin::new().with_split(self.split);
        match &self.filetype {
            Some(filetype) => plugin.with_filetype(filetype.clone()),
            None => plugin,
        }
    }

    fn read_source(&self) -> Result<String> {
        std::fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))
    }

    /// Run the query once, or keep re-running it on file changes when
    /// watching is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or watched, if writing to
    /// stdout fails, or (when not watching) if the query fails.
    pub fn run(&self) -> Result<()> {
        let text = self.read_source()?;
        let mut session = Session::open(&text, self.make_plugin());

        if !self.watch_enabled {
            let lines = session
                .query(&self.query)
                .with_context(|| format!("{} failed", self.query))?;
            return print_lines(&lines);
        }

        let mut watcher = FileWatcher::new(&self.file_path, WATCH_DEBOUNCE)
            .with_context(|| format!("Failed to watch {}", self.file_path.display()))?;
        info!(path = %watcher.target_path().display(), query = %self.query, "watching");
        self.run_and_print(&mut session)?;

        loop {
            std::thread::sleep(WATCH_POLL);
            if !watcher.poll_change() {
                continue;
            }
            match self.read_source() {
                Ok(text) => {
                    session.reload(&text);
                    self.run_and_print(&mut session)?;
                }
                Err(err) => warn!("{err:#}"),
            }
        }
    }

    /// Query errors are reported and the loop keeps going, since the file is
    /// often mid-edit.
    fn run_and_print(&self, session: &mut Session) -> Result<()> {
        match session.query(&self.query) {
            Ok(lines) => print_lines(&lines),
            Err(err) if err.is_host_failure() => Err(err).context("host failure"),
            Err(err) => {
                warn!(query = %self.query, "{err}");
                Ok(())
            }
        }
    }
}

fn print_lines(lines: &[String]) -> Result<()> {
    let mut out = stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}
