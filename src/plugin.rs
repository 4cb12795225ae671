//! Command dispatch.
//!
//! [`Plugin`] is the state the host-facing layer keeps for the lifetime of
//! the process. It owns the registry and hands it by reference to every
//! handler, so there is no ambient global state.

use serde_json::Value;
use tracing::debug;

use crate::display::DisplayOrchestrator;
use crate::error::{Error, Result};
use crate::format;
use crate::host::{BufferId, Host, LineRange, SplitDirection};
use crate::query::{Jmespath, QueryEngine};
use crate::registry::BufferRegistry;

/// Name of the user command.
pub const COMMAND: &str = "JP";

/// Process-wide plugin state plus the query engine.
#[derive(Debug, Default)]
pub struct Plugin<E = Jmespath> {
    registry: BufferRegistry,
    display: DisplayOrchestrator,
    engine: E,
}

impl Plugin {
    /// A plugin using JMESPath with default display settings.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: QueryEngine> Plugin<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            registry: BufferRegistry::new(),
            display: DisplayOrchestrator::default(),
            engine,
        }
    }

    /// Place revealed result buffers in `split` windows.
    #[must_use]
    pub const fn with_split(mut self, split: SplitDirection) -> Self {
        self.display = DisplayOrchestrator::new(split);
        self
    }

    /// Tag new result buffers with `filetype`.
    ///
    /// Only affects buffers created afterwards; existing bindings are kept.
    #[must_use]
    pub fn with_filetype(mut self, filetype: impl Into<String>) -> Self {
        self.registry.set_filetype(filetype);
        self
    }

    pub const fn registry(&self) -> &BufferRegistry {
        &self.registry
    }

    /// Dispatch a user command invocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for an unknown command or an argument count
    /// other than one, otherwise whatever [`Plugin::search`] returns.
    pub fn handle_command<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        name: &str,
        args: &[String],
    ) -> Result<BufferId> {
        if name != COMMAND {
            return Err(Error::Usage(format!("unknown command: {name}")));
        }
        match args {
            [query] => self.search(host, query),
            _ => Err(Error::Usage(format!(
                "{COMMAND} takes exactly one argument, got {}",
                args.len()
            ))),
        }
    }

    /// Run `query` against the JSON in the current buffer and show the result.
    ///
    /// Nothing is created in the host unless the buffer decodes and the query
    /// evaluates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for malformed JSON, [`Error::Query`] for a
    /// bad expression, and host errors from reading or displaying.
    pub fn search<H: Host + ?Sized>(&mut self, host: &mut H, query: &str) -> Result<BufferId> {
        let source = host.current_buffer()?;
        let data = read_json(host, source)?;
        let value = self.engine.evaluate(query, &data)?;
        debug!(%source, query, "query evaluated");
        self.display.show(host, &mut self.registry, source, &value)
    }

    /// Tear down the result buffer for `source`, if any.
    ///
    /// # Errors
    ///
    /// Returns a host error if the delete fails.
    pub fn release<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        source: BufferId,
    ) -> Result<Option<BufferId>> {
        self.registry.release(host, source)
    }
}

/// Decode the full content of `buffer` as JSON.
///
/// # Errors
///
/// Returns a host error if the lines cannot be read or [`Error::Decode`] if
/// they are not JSON.
pub fn read_json<H: Host + ?Sized>(host: &mut H, buffer: BufferId) -> Result<Value> {
    let lines = host.buffer_lines(buffer, LineRange::ALL)?;
    format::decode_lines(lines.as_slice())
}
