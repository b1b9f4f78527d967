//! Entry point for the `jack-bridged` daemon.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match jack_bridged::run_bridge() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            drop(writeln!(io::stderr().lock(), "jack-bridged: {error}"));
            ExitCode::FAILURE
        }
    }
}
