//! Scoped resource demo.
//!
//! Runs the scope-exit, two-argument and variant demos against stdout.
//!
//! # Usage
//!
//! ```bash
//! HELLO_LOG=scoped_core=trace HELLO_LOG_FORMAT=compact hello
//! ```

use core::cell::RefCell;
use std::io::{self, Write};
use std::process::ExitCode;

use example::{DemoConfig, DemoError, Stage, announce_on_exit, farewell_channel, report_stage};

/// Duplicates stdout so the demo's channel can be closed independently.
#[cfg(unix)]
fn output_channel() -> io::Result<std::fs::File> {
    use std::os::fd::AsFd;

    Ok(io::stdout().as_fd().try_clone_to_owned()?.into())
}

#[cfg(not(unix))]
fn output_channel() -> io::Result<io::Stdout> {
    Ok(io::stdout())
}

fn run() -> Result<(), DemoError> {
    let out = RefCell::new(io::stdout());

    report_stage(&out, |stage| {
        announce_on_exit(&out, "Should be 2nd")?;
        stage.set(Stage::Announced);

        farewell_channel(output_channel()?, "Final Message\n")?;
        stage.set(Stage::Farewelled);

        for line in ["Test", "Test 2", "Test 3"] {
            writeln!(out.borrow_mut(), "{line}")?;
        }
        stage.set(Stage::Done);
        Ok(())
    })
}

fn main() -> ExitCode {
    match DemoConfig::from_env() {
        Ok(config) => config.init_tracing(),
        Err(error) => {
            DemoConfig::default().init_tracing();
            tracing::warn!(%error, "ignoring log configuration");
        }
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "demo failed");
            ExitCode::FAILURE
        }
    }
}
