//! Writing query results into result buffers and putting them on screen.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::format;
use crate::host::{BufferId, Host, LineRange, SplitDirection};
use crate::registry::BufferRegistry;

/// Shows values in the result buffer bound to a source buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOrchestrator {
    split: SplitDirection,
}

impl DisplayOrchestrator {
    pub const fn new(split: SplitDirection) -> Self {
        Self { split }
    }

    pub const fn split(&self) -> SplitDirection {
        self.split
    }

    /// Render `value` into the result buffer for `source` and make sure it is
    /// on screen.
    ///
    /// The buffer content is replaced wholesale. A hidden result buffer is
    /// opened in a new split and focus is handed back to the window that had
    /// it; an already visible one is left where it is.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or any host call fails. A render
    /// failure happens before the registry or host is touched.
    pub fn show<H: Host + ?Sized>(
        &self,
        host: &mut H,
        registry: &mut BufferRegistry,
        source: BufferId,
        value: &Value,
    ) -> Result<BufferId> {
        let lines = format::encode_lines(value)?;
        let result = registry.resolve(host, source)?;
        let hidden = !host.is_buffer_visible(result)?;

        host.set_buffer_lines(result, LineRange::ALL, &lines)?;

        if hidden {
            let previous = host.current_window()?;
            let window = host.open_split(result, self.split)?;
            host.set_current_window(previous)?;
            debug!(%result, %window, split = self.split.as_str(), "revealed result buffer");
        }

        Ok(result)
    }
}
