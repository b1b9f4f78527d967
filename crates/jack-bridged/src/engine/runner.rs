//! Bounded execution of the JACK command-line tools.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{ENGINE_TARGET, EngineError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs `command` to completion and returns its standard output.
///
/// Output pipes are drained on helper threads so a chatty tool cannot stall
/// on a full pipe while the caller waits on its exit.
pub(super) fn run_to_completion(
    tool: &str,
    mut command: Command,
    timeout: Duration,
) -> Result<String, EngineError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(target: ENGINE_TARGET, tool, "running JACK tool");
    let mut child = command.spawn().map_err(|source| EngineError::Spawn {
        tool: tool.to_owned(),
        source,
    })?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);
    let status = wait_for_exit(tool, &mut child, timeout)?;
    let stdout = collect(stdout);
    let stderr = collect(stderr);

    if status.success() {
        Ok(stdout)
    } else {
        Err(EngineError::ToolFailed {
            tool: tool.to_owned(),
            status: status.code().unwrap_or(-1),
            stderr: stderr.trim().to_owned(),
        })
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Err(error) = pipe.read_to_end(&mut buffer) {
            debug!(target: ENGINE_TARGET, error = %error, "tool pipe closed early");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn wait_for_exit(
    tool: &str,
    child: &mut Child,
    timeout: Duration,
) -> Result<ExitStatus, EngineError> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if start.elapsed() > timeout => {
                warn!(
                    target: ENGINE_TARGET,
                    tool,
                    timeout_ms = timeout.as_millis(),
                    "JACK tool timed out, killing process"
                );
                drop(child.kill());
                drop(child.wait());
                return Err(EngineError::Timeout {
                    tool: tool.to_owned(),
                    timeout_ms: timeout.as_millis(),
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                return Err(EngineError::Spawn {
                    tool: tool.to_owned(),
                    source,
                });
            }
        }
    }
}
