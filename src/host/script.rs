//! Scripts sent over the host's generic exec channel.
//!
//! The host has no dedicated "is this buffer on screen" call, so visibility
//! is probed with `win_findbuf()` and the printed result is parsed back.

use serde::Deserialize;
use serde_json::Value;

use super::{BufferId, SplitDirection};
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct CapturedOutput {
    output: String,
}

/// Script that prints `1` when no window shows `buffer`, `0` otherwise.
pub fn visibility_probe(buffer: BufferId) -> String {
    format!("echo empty(win_findbuf({buffer}))")
}

/// Script that opens a far-side split and shows `buffer` in it.
pub fn split_command(buffer: BufferId, direction: SplitDirection) -> String {
    format!("botright {} | buffer {buffer}", direction.ex_command())
}

/// Interpret the reply to [`visibility_probe`]. Returns `true` when hidden.
///
/// # Errors
///
/// Returns [`Error::UnexpectedHostResponse`] if the reply has no string
/// `output` field or it is neither `0` nor `1`.
pub fn parse_hidden(reply: &Value) -> Result<bool> {
    let captured = CapturedOutput::deserialize(reply)
        .map_err(|err| Error::UnexpectedHostResponse(format!("{err} in {reply}")))?;
    match captured.output.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(Error::UnexpectedHostResponse(format!(
            "visibility probe printed {other:?}"
        ))),
    }
}
