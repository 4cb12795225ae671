use crate::error::Result;
use crate::host::{BufferId, Host, LineRange, MemoryHost};
use crate::plugin::{COMMAND, Plugin};

/// One source buffer in an in-process host, with the plugin state that
/// queries it.
#[derive(Debug)]
pub struct Session {
    host: MemoryHost,
    plugin: Plugin,
    source: BufferId,
}

impl Session {
    /// Open `text` as the focused source buffer.
    pub fn open(text: &str, plugin: Plugin) -> Self {
        let mut host = MemoryHost::new();
        let source = host.open_source(text);
        Self {
            host,
            plugin,
            source,
        }
    }

    pub const fn source(&self) -> BufferId {
        self.source
    }

    pub const fn host(&self) -> &MemoryHost {
        &self.host
    }

    pub const fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    /// Replace the source buffer's text, as reloading the file would.
    pub fn reload(&mut self, text: &str) -> bool {
        self.host.set_text(self.source, text)
    }

    /// Dispatch the `JP` command and return the result buffer's lines.
    ///
    /// # Errors
    ///
    /// Returns the command's error unchanged.
    pub fn query(&mut self, query: &str) -> Result<Vec<String>> {
        let result = self
            .plugin
            .handle_command(&mut self.host, COMMAND, &[query.to_string()])?;
        Ok(self.host.buffer_lines(result, LineRange::ALL)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_query_returns_result_lines() {
        let mut session = Session::open(r#"{"a": {"b": [true, false]}}"#, Plugin::new());
        let lines = session.query("a").unwrap();
        assert_eq!(lines, vec!["{", "  \"b\": [", "    true,", "    false", "  ]", "}"]);
    }

    #[test]
    fn test_reload_reuses_result_buffer() {
        let mut session = Session::open(r#"{"v": 1}"#, Plugin::new());
        session.query("v").unwrap();
        let result = session.plugin().registry().get(session.source());

        assert!(session.reload(r#"{"v": 2}"#));
        assert_eq!(session.query("v").unwrap(), vec!["2"]);
        assert_eq!(session.plugin().registry().get(session.source()), result);
        assert_eq!(session.host().windows().len(), 2);
    }

    #[test]
    fn test_broken_reload_keeps_previous_result() {
        let mut session = Session::open(r#"{"v": 1}"#, Plugin::new());
        session.query("v").unwrap();
        let result = session
            .plugin()
            .registry()
            .get(session.source())
            .unwrap();

        session.reload(r#"{"v": "#);
        assert!(matches!(session.query("v"), Err(Error::Decode(_))));
        assert_eq!(session.host().buffer_text(result).as_deref(), Some("1"));
    }
}
