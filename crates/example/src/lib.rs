//! Demonstration of scoped resources.
//!
//! The `hello` binary walks through the three shapes a scoped resource takes:
//!
//! - [`announce_on_exit`] - a pure scope-exit action with no resource bound
//! - [`farewell_channel`] - a two-argument disposer that writes a final
//!   message to a duplicated output channel while cleaning up
//! - [`Stage`] - a variant held in a scoped resource and read back through
//!   its value accessor
//!
//! Logging is configured by [`DemoConfig`].

mod config;
mod demos;

pub use config::{DemoConfig, LOG_ENV, LOG_FORMAT_ENV, TracingFormat};
pub use demos::{Stage, announce_on_exit, farewell_channel, report_stage};

/// Errors surfaced by the demo program.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Writing demo output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested log format is not one of `pretty`, `compact` or `json`.
    #[error("unknown log format: {0}")]
    UnknownFormat(String),
}
