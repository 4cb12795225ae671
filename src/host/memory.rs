//! An in-process host with its own buffers and windows.
//!
//! `MemoryHost` behaves like a small editor: buffers can be wiped, unloaded
//! and hidden by "the user" through the inherent methods, while the plugin
//! only sees it through [`Host`]. It backs the headless driver and the tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

use super::{
    BufferId, DeleteOptions, Host, HostError, HostResult, LineRange, SplitDirection, TextBuffer,
    WindowId,
};
use crate::error::Result;

static VISIBILITY_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^echo\s+empty\(win_findbuf\((\d+)\)\)$").expect("visibility probe pattern")
});

static SPLIT_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:bo|botright)\s+(vs|vsplit|sp|split)\s*\|\s*(?:b|buffer)\s+(\d+)$")
        .expect("split command pattern")
});

const FIRST_WINDOW: u32 = 1000;

#[derive(Debug)]
struct BufferState {
    text: TextBuffer,
    listed: bool,
    scratch: bool,
    loaded: bool,
    options: BTreeMap<String, String>,
}

impl BufferState {
    fn new(text: TextBuffer, listed: bool, scratch: bool) -> Self {
        Self {
            text,
            listed,
            scratch,
            loaded: true,
            options: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    id: WindowId,
    buffer: BufferId,
    split: Option<SplitDirection>,
}

/// A self-contained editor host.
#[derive(Debug)]
pub struct MemoryHost {
    buffers: BTreeMap<BufferId, BufferState>,
    windows: Vec<Window>,
    current: WindowId,
    next_buffer: u32,
    next_window: u32,
    calls: Vec<&'static str>,
    failures: BTreeSet<&'static str>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// A host with one empty buffer shown in one window.
    pub fn new() -> Self {
        let first = BufferId(1);
        let window = WindowId(FIRST_WINDOW);
        let mut buffers = BTreeMap::new();
        buffers.insert(first, BufferState::new(TextBuffer::default(), true, false));
        Self {
            buffers,
            windows: vec![Window {
                id: window,
                buffer: first,
                split: None,
            }],
            current: window,
            next_buffer: 2,
            next_window: FIRST_WINDOW + 1,
            calls: Vec::new(),
            failures: BTreeSet::new(),
        }
    }

    /// Open a new listed buffer holding `text` in the current window.
    pub fn open_source(&mut self, text: &str) -> BufferId {
        let id = self.alloc_buffer(TextBuffer::from_text(text), true, false);
        self.show_in_current(id);
        id
    }

    /// Show an existing buffer in the current window, loading it if needed.
    ///
    /// Returns `false` if the buffer does not exist.
    pub fn edit(&mut self, buffer: BufferId) -> bool {
        let Some(state) = self.buffers.get_mut(&buffer) else {
            return false;
        };
        state.loaded = true;
        self.show_in_current(buffer);
        true
    }

    /// Replace the full text of a buffer, as a user edit or reload would.
    pub fn set_text(&mut self, buffer: BufferId, text: &str) -> bool {
        match self.buffers.get_mut(&buffer) {
            Some(state) if state.loaded => {
                state.text = TextBuffer::from_text(text);
                true
            }
            _ => false,
        }
    }

    /// Wipe a buffer out entirely (`:bwipeout`). Its id becomes invalid.
    pub fn wipe_buffer(&mut self, buffer: BufferId) -> bool {
        if self.buffers.remove(&buffer).is_none() {
            return false;
        }
        self.detach_buffer(buffer);
        true
    }

    /// Unload a buffer (`:bunload`). The id stays valid but the content is
    /// freed and its windows close.
    pub fn unload_buffer(&mut self, buffer: BufferId) -> bool {
        let Some(state) = self.buffers.get_mut(&buffer) else {
            return false;
        };
        state.loaded = false;
        state.text = TextBuffer::default();
        self.detach_buffer(buffer);
        true
    }

    /// Close a window, leaving its buffer loaded but hidden.
    ///
    /// The last window cannot be closed.
    pub fn close_window(&mut self, window: WindowId) -> bool {
        if self.windows.len() <= 1 {
            return false;
        }
        let Some(pos) = self.windows.iter().position(|w| w.id == window) else {
            return false;
        };
        self.windows.remove(pos);
        if self.current == window {
            self.current = self.windows[pos.saturating_sub(1)].id;
        }
        true
    }

    /// Make `window` current. Returns `false` if it does not exist.
    pub fn focus(&mut self, window: WindowId) -> bool {
        if self.window(window).is_none() {
            return false;
        }
        self.current = window;
        true
    }

    /// The focused window.
    pub const fn focused_window(&self) -> WindowId {
        self.current
    }

    /// All windows with the buffer each one shows, in layout order.
    pub fn windows(&self) -> Vec<(WindowId, BufferId)> {
        self.windows.iter().map(|w| (w.id, w.buffer)).collect()
    }

    /// Windows currently showing `buffer`.
    pub fn windows_showing(&self, buffer: BufferId) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|w| w.buffer == buffer)
            .map(|w| w.id)
            .collect()
    }

    /// How `window` was opened, if it was opened as a split.
    pub fn window_split(&self, window: WindowId) -> Option<SplitDirection> {
        self.window(window).and_then(|w| w.split)
    }

    /// Full text of a buffer, if it exists.
    pub fn buffer_text(&self, buffer: BufferId) -> Option<String> {
        self.buffers.get(&buffer).map(|state| state.text.text())
    }

    /// Value of a buffer-local option set through [`Host::set_buffer_option`].
    pub fn buffer_option(&self, buffer: BufferId, name: &str) -> Option<&str> {
        self.buffers
            .get(&buffer)
            .and_then(|state| state.options.get(name))
            .map(String::as_str)
    }

    /// Whether a buffer shows up in the buffer list.
    pub fn is_listed(&self, buffer: BufferId) -> bool {
        self.buffers.get(&buffer).is_some_and(|state| state.listed)
    }

    /// Whether a buffer was created as a scratch buffer.
    pub fn is_scratch(&self, buffer: BufferId) -> bool {
        self.buffers.get(&buffer).is_some_and(|state| state.scratch)
    }

    /// Ids of every existing buffer.
    pub fn buffer_ids(&self) -> Vec<BufferId> {
        self.buffers.keys().copied().collect()
    }

    /// RPC methods invoked through [`Host`] so far, oldest first.
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Make the next call to `method` fail once.
    pub fn fail_next(&mut self, method: &'static str) {
        self.failures.insert(method);
    }

    fn call(&mut self, method: &'static str) -> HostResult<()> {
        self.calls.push(method);
        if self.failures.remove(method) {
            return Err(HostError::new(method, "injected failure"));
        }
        Ok(())
    }

    fn alloc_buffer(&mut self, text: TextBuffer, listed: bool, scratch: bool) -> BufferId {
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        self.buffers
            .insert(id, BufferState::new(text, listed, scratch));
        id
    }

    fn window(&self, window: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == window)
    }

    fn show_in_current(&mut self, buffer: BufferId) {
        let current = self.current;
        if let Some(window) = self.windows.iter_mut().find(|w| w.id == current) {
            window.buffer = buffer;
        }
    }

    /// Close every window showing `buffer`. The last window is kept and
    /// switched to a fresh empty buffer instead.
    fn detach_buffer(&mut self, buffer: BufferId) {
        while let Some(pos) = self.windows.iter().position(|w| w.buffer == buffer) {
            if self.windows.len() > 1 {
                let closed = self.windows.remove(pos);
                if self.current == closed.id {
                    self.current = self.windows[pos.saturating_sub(1)].id;
                }
            } else {
                let replacement = self.alloc_buffer(TextBuffer::default(), true, false);
                self.windows[pos].buffer = replacement;
            }
        }
    }

    fn require_buffer(&self, method: &'static str, buffer: BufferId) -> HostResult<&BufferState> {
        self.buffers
            .get(&buffer)
            .ok_or_else(|| HostError::new(method, format!("Invalid buffer id: {buffer}")))
    }

    fn split(&mut self, buffer: BufferId, direction: SplitDirection) -> HostResult<WindowId> {
        let method = "nvim_open_win";
        let state = self
            .buffers
            .get_mut(&buffer)
            .ok_or_else(|| HostError::new(method, format!("E86: Buffer {buffer} does not exist")))?;
        state.loaded = true;
        let id = WindowId(self.next_window);
        self.next_window += 1;
        self.windows.push(Window {
            id,
            buffer,
            split: Some(direction),
        });
        self.current = id;
        Ok(id)
    }
}

impl Host for MemoryHost {
    fn create_buffer(&mut self, listed: bool, scratch: bool) -> HostResult<BufferId> {
        self.call("nvim_create_buf")?;
        Ok(self.alloc_buffer(TextBuffer::default(), listed, scratch))
    }

    fn set_buffer_option(
        &mut self,
        buffer: BufferId,
        name: &str,
        value: &str,
    ) -> HostResult<()> {
        let method = "nvim_buf_set_option";
        self.call(method)?;
        let state = self
            .buffers
            .get_mut(&buffer)
            .ok_or_else(|| HostError::new(method, format!("Invalid buffer id: {buffer}")))?;
        state.options.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferId, opts: DeleteOptions) -> HostResult<()> {
        // In-memory buffers never hold unsaved changes, so `force` has no
        // effect here.
        let method = "nvim_buf_delete";
        self.call(method)?;
        self.require_buffer(method, buffer)?;
        if opts.unload {
            self.unload_buffer(buffer);
        } else {
            self.wipe_buffer(buffer);
        }
        Ok(())
    }

    fn is_buffer_valid(&mut self, buffer: BufferId) -> HostResult<bool> {
        self.call("nvim_buf_is_valid")?;
        Ok(self.buffers.contains_key(&buffer))
    }

    fn is_buffer_loaded(&mut self, buffer: BufferId) -> HostResult<bool> {
        self.call("nvim_buf_is_loaded")?;
        Ok(self.buffers.get(&buffer).is_some_and(|state| state.loaded))
    }

    fn buffer_lines(&mut self, buffer: BufferId, range: LineRange) -> HostResult<Vec<String>> {
        let method = "nvim_buf_get_lines";
        self.call(method)?;
        let state = self.require_buffer(method, buffer)?;
        if !state.loaded {
            return Ok(Vec::new());
        }
        state
            .text
            .lines(range)
            .ok_or_else(|| HostError::new(method, "Index out of bounds"))
    }

    fn set_buffer_lines(
        &mut self,
        buffer: BufferId,
        range: LineRange,
        lines: &[String],
    ) -> HostResult<()> {
        let method = "nvim_buf_set_lines";
        self.call(method)?;
        let state = self
            .buffers
            .get_mut(&buffer)
            .ok_or_else(|| HostError::new(method, format!("Invalid buffer id: {buffer}")))?;
        if !state.loaded {
            return Err(HostError::new(method, "Buffer is not loaded"));
        }
        if state.text.replace_lines(range, lines) {
            Ok(())
        } else {
            Err(HostError::new(method, "Index out of bounds"))
        }
    }

    fn current_buffer(&mut self) -> HostResult<BufferId> {
        let method = "nvim_get_current_buf";
        self.call(method)?;
        self.window(self.current)
            .map(|w| w.buffer)
            .ok_or_else(|| HostError::new(method, "no current window"))
    }

    fn current_window(&mut self) -> HostResult<WindowId> {
        self.call("nvim_get_current_win")?;
        Ok(self.current)
    }

    fn set_current_window(&mut self, window: WindowId) -> HostResult<()> {
        let method = "nvim_set_current_win";
        self.call(method)?;
        if self.focus(window) {
            Ok(())
        } else {
            Err(HostError::new(method, format!("Invalid window id: {window}")))
        }
    }

    fn exec(&mut self, script: &str, capture_output: bool) -> HostResult<Value> {
        let method = "nvim_exec2";
        self.call(method)?;
        let script = script.trim();

        if let Some(caps) = VISIBILITY_PROBE.captures(script) {
            let buffer = parse_buffer_arg(method, &caps[1])?;
            let hidden = self.windows_showing(buffer).is_empty();
            let printed = if hidden { "1" } else { "0" };
            return Ok(if capture_output {
                json!({ "output": printed })
            } else {
                json!({})
            });
        }

        if let Some(caps) = SPLIT_COMMAND.captures(script) {
            let direction = match &caps[1] {
                "vs" | "vsplit" => SplitDirection::Vertical,
                _ => SplitDirection::Horizontal,
            };
            let buffer = parse_buffer_arg(method, &caps[2])?;
            self.split(buffer, direction)?;
            return Ok(if capture_output {
                json!({ "output": "" })
            } else {
                json!({})
            });
        }

        Err(HostError::new(
            method,
            format!("E492: Not an editor command: {script}"),
        ))
    }

    fn is_buffer_visible(&mut self, buffer: BufferId) -> Result<bool> {
        self.call("win_findbuf")?;
        Ok(!self.windows_showing(buffer).is_empty())
    }

    fn open_split(&mut self, buffer: BufferId, direction: SplitDirection) -> HostResult<WindowId> {
        self.call("nvim_open_win")?;
        self.split(buffer, direction)
    }
}

fn parse_buffer_arg(method: &'static str, raw: &str) -> HostResult<BufferId> {
    raw.parse()
        .map(BufferId)
        .map_err(|err| HostError::new(method, format!("bad buffer number {raw:?}: {err}")))
}
