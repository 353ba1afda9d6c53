//! The demo's scoped-resource walkthroughs.
//!
//! Every function writes to a caller-supplied sink so the binary can point
//! them at stdout and tests can capture what they print.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::io::{self, Write};

use scoped_core::{make_scoped_resource, scope_exit};

use crate::DemoError;

/// Prints `message` only after the rest of the function has run.
///
/// # Errors
///
/// Returns an error if writing to `out` fails. The deferred message is still
/// attempted on that path.
pub fn announce_on_exit<W: Write>(out: &RefCell<W>, message: &str) -> Result<(), DemoError> {
    let _announce = scope_exit(|| -> io::Result<()> {
        let mut out = out.borrow_mut();
        writeln!(out, "message:")?;
        writeln!(out, "{message}")
    });

    writeln!(out.borrow_mut(), "Should be first...")?;
    Ok(())
}

/// Writes to `channel` and leaves `farewell` as the last thing written.
///
/// The channel and the farewell are bound together; the disposer receives
/// both and writes the farewell while the channel is being released. The
/// channel is closed when the guard drops it.
///
/// # Errors
///
/// Returns an error if the opening write fails.
pub fn farewell_channel<W>(channel: W, farewell: &str) -> Result<(), DemoError>
where
    W: fmt::Debug,
    for<'a> &'a W: Write,
{
    let file = make_scoped_resource(
        |channel: &W, farewell: &&str| -> io::Result<()> {
            let mut channel = channel;
            channel.write_all(farewell.as_bytes())?;
            channel.flush()
        },
        (channel, farewell),
    );

    let mut channel: &W = &file;
    channel.write_all(b"begin\n")?;
    tracing::info!(channel = ?file.get::<0>(), "leaving with channel");
    Ok(())
}

/// Progress through the demo, tracked in a scoped resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has run yet.
    Starting,
    /// The scope-exit demo finished.
    Announced,
    /// The channel demo finished.
    Farewelled,
    /// Every demo finished.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Starting => "starting",
            Self::Announced => "announced",
            Self::Farewelled => "farewelled",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs `body` with a stage tracker that reports the last stage reached.
///
/// The report is written when the tracker goes out of scope, so it also
/// appears when `body` fails partway.
///
/// # Errors
///
/// Returns whatever `body` returns.
pub fn report_stage<W, F>(out: &RefCell<W>, body: F) -> Result<(), DemoError>
where
    W: Write,
    F: FnOnce(&Cell<Stage>) -> Result<(), DemoError>,
{
    let stage = make_scoped_resource(
        |stage: &Cell<Stage>| {
            writeln!(
                out.borrow_mut(),
                "Done with demos, last stage: {}",
                stage.get()
            )
        },
        (Cell::new(Stage::Starting),),
    );

    body(&*stage)?;
    tracing::debug!(stage = %stage.value().get(), "demos complete");
    Ok(())
}
