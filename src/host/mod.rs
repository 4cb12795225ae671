//! The editor host boundary.
//!
//! Everything the plugin knows about buffers and windows comes through the
//! [`Host`] trait. Buffer and window ids are plain indices into host-owned
//! state: holding one never keeps the underlying object alive.

mod memory;
pub mod script;
mod shim;
mod text;

use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryHost;
pub use shim::ScriptShim;
pub use text::TextBuffer;

use crate::error::Result;

/// Host-assigned identity of a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-assigned identity of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A failed round-trip to the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{method}: {message}")]
pub struct HostError {
    /// RPC method that failed.
    pub method: &'static str,
    /// Error text reported by the transport or the host.
    pub message: String,
}

impl HostError {
    pub fn new(method: &'static str, message: impl Into<String>) -> Self {
        Self {
            method,
            message: message.into(),
        }
    }
}

/// Result of a single host RPC call.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Zero-based, end-exclusive line range. `end: None` means "to the last line".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl LineRange {
    /// The whole buffer.
    pub const ALL: Self = Self {
        start: 0,
        end: None,
    };

    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// Options for [`Host::delete_buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Discard unsaved changes.
    pub force: bool,
    /// Only unload the buffer instead of wiping it.
    pub unload: bool,
}

impl DeleteOptions {
    /// Forced wipe: the buffer id stops being valid.
    pub const WIPE: Self = Self {
        force: true,
        unload: false,
    };
}

/// Where a revealed buffer is placed.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitDirection {
    /// Full-height window on the far right.
    #[default]
    Vertical,
    /// Full-width window at the bottom.
    Horizontal,
}

impl SplitDirection {
    /// The ex command that opens this kind of split.
    pub const fn ex_command(self) -> &'static str {
        match self {
            Self::Vertical => "vsplit",
            Self::Horizontal => "split",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

/// Synchronous buffer and window operations offered by the editor.
///
/// Each call is one blocking round-trip. Nothing is retried and there is no
/// timeout.
pub trait Host {
    /// Allocate a new buffer. Result buffers use `listed = false, scratch = true`.
    fn create_buffer(&mut self, listed: bool, scratch: bool) -> HostResult<BufferId>;

    fn set_buffer_option(&mut self, buffer: BufferId, name: &str, value: &str)
    -> HostResult<()>;

    fn delete_buffer(&mut self, buffer: BufferId, opts: DeleteOptions) -> HostResult<()>;

    /// Whether `buffer` still exists (has not been wiped).
    fn is_buffer_valid(&mut self, buffer: BufferId) -> HostResult<bool>;

    /// Whether `buffer` is loaded into the host's working set.
    fn is_buffer_loaded(&mut self, buffer: BufferId) -> HostResult<bool>;

    fn buffer_lines(&mut self, buffer: BufferId, range: LineRange) -> HostResult<Vec<String>>;

    fn set_buffer_lines(
        &mut self,
        buffer: BufferId,
        range: LineRange,
        lines: &[String],
    ) -> HostResult<()>;

    fn current_buffer(&mut self) -> HostResult<BufferId>;

    fn current_window(&mut self) -> HostResult<WindowId>;

    fn set_current_window(&mut self, window: WindowId) -> HostResult<()>;

    /// Execute an ex script. When `capture_output` is set the reply carries
    /// the printed text under the `output` key.
    fn exec(&mut self, script: &str, capture_output: bool) -> HostResult<Value>;

    /// Whether any window currently displays `buffer`.
    ///
    /// The default asks through the scripted channel; hosts with a native
    /// query should override it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnexpectedHostResponse`] if the scripted reply
    /// cannot be interpreted.
    fn is_buffer_visible(&mut self, buffer: BufferId) -> Result<bool> {
        let reply = self.exec(&script::visibility_probe(buffer), true)?;
        Ok(!script::parse_hidden(&reply)?)
    }

    /// Open a new split showing `buffer`. The new window becomes current.
    ///
    /// The default goes through the scripted channel.
    fn open_split(&mut self, buffer: BufferId, direction: SplitDirection) -> HostResult<WindowId> {
        self.exec(&script::split_command(buffer, direction), false)?;
        self.current_window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_as_raw_numbers() {
        assert_eq!(BufferId(7).to_string(), "7");
        assert_eq!(WindowId(1000).to_string(), "1000");
    }

    #[test]
    fn test_wipe_options_force_without_unload() {
        assert!(DeleteOptions::WIPE.force);
        assert!(!DeleteOptions::WIPE.unload);
    }

    #[test]
    fn test_split_direction_defaults_to_vertical() {
        assert_eq!(SplitDirection::default(), SplitDirection::Vertical);
        assert_eq!(SplitDirection::Vertical.ex_command(), "vsplit");
        assert_eq!(SplitDirection::Horizontal.ex_command(), "split");
    }
}
