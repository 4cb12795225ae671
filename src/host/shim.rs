use serde_json::Value;

use super::{BufferId, DeleteOptions, Host, HostResult, LineRange, WindowId};

/// Routes visibility checks and split creation through the scripted exec
/// channel, for hosts that expose no dedicated calls for them.
///
/// All other operations are forwarded unchanged.
#[derive(Debug, Default)]
pub struct ScriptShim<H> {
    inner: H,
}

impl<H: Host> ScriptShim<H> {
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }

    pub const fn inner(&self) -> &H {
        &self.inner
    }

    pub const fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: Host> Host for ScriptShim<H> {
    fn create_buffer(&mut self, listed: bool, scratch: bool) -> HostResult<BufferId> {
        self.inner.create_buffer(listed, scratch)
    }

    fn set_buffer_option(
        &mut self,
        buffer: BufferId,
        name: &str,
        value: &str,
    ) -> HostResult<()> {
        self.inner.set_buffer_option(buffer, name, value)
    }

    fn delete_buffer(&mut self, buffer: BufferId, opts: DeleteOptions) -> HostResult<()> {
        self.inner.delete_buffer(buffer, opts)
    }

    fn is_buffer_valid(&mut self, buffer: BufferId) -> HostResult<bool> {
        self.inner.is_buffer_valid(buffer)
    }

    fn is_buffer_loaded(&mut self, buffer: BufferId) -> HostResult<bool> {
        self.inner.is_buffer_loaded(buffer)
    }

    fn buffer_lines(&mut self, buffer: BufferId, range: LineRange) -> HostResult<Vec<String>> {
        self.inner.buffer_lines(buffer, range)
    }

    fn set_buffer_lines(
        &mut self,
        buffer: BufferId,
        range: LineRange,
        lines: &[String],
    ) -> HostResult<()> {
        self.inner.set_buffer_lines(buffer, range, lines)
    }

    fn current_buffer(&mut self) -> HostResult<BufferId> {
        self.inner.current_buffer()
    }

    fn current_window(&mut self) -> HostResult<WindowId> {
        self.inner.current_window()
    }

    fn set_current_window(&mut self, window: WindowId) -> HostResult<()> {
        self.inner.set_current_window(window)
    }

    fn exec(&mut self, script: &str, capture_output: bool) -> HostResult<Value> {
        self.inner.exec(script, capture_output)
    }
}
