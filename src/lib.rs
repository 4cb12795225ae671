// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. host::HostError)
    clippy::module_name_repetitions
)]

//! # jpview
//!
//! JMESPath queries over JSON held in editor buffers.
//!
//! The user runs `:JP <expression>` in a buffer holding JSON. The result is
//! written to a scratch buffer bound to that source buffer and shown in a
//! side split without taking focus away from the source.
//!
//! ## Architecture
//!
//! - **Host**: the editor, reached only through the [`host::Host`] trait
//! - **Registry**: source buffer → result buffer bindings, reconciled against
//!   host state on every access
//! - **Display**: writes the rendered value and reveals hidden result buffers
//! - **Plugin**: command dispatch, owns the registry for the process lifetime
//!
//! ## Modules
//!
//! - [`host`]: Host trait, ids, in-process host and scripted-channel shim
//! - [`registry`]: Binding lifecycle and reconciliation
//! - [`display`]: Result buffer content and visibility
//! - [`format`]: Canonical JSON encode/decode of buffer text
//! - [`query`]: Query engine trait and JMESPath implementation
//! - [`plugin`]: The `JP` command
//! - [`app`]: Headless driver used by the binary
//! - [`config`]: Flag-file defaults
//! - [`watcher`]: File watching

pub mod app;
pub mod config;
pub mod display;
mod error;
pub mod format;
pub mod host;
pub mod plugin;
pub mod query;
pub mod registry;
pub mod watcher;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::display::DisplayOrchestrator;
    pub use crate::host::{BufferId, Host, MemoryHost, SplitDirection, WindowId};
    pub use crate::plugin::Plugin;
    pub use crate::query::{Jmespath, QueryEngine};
    pub use crate::registry::BufferRegistry;
}
