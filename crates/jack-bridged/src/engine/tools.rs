//! Engine backend driven by the JACK command-line tools.

use std::process::Command;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use jack_bridge_config::Config;

use super::lsp::{parse_connections, parse_number_after, parse_ports};
use super::runner::run_to_completion;
use super::{
    ConnectOutcome, Connection, ENGINE_TARGET, EngineBackend, EngineError, EngineHandle,
    EngineInfo, Port,
};

const METHOD: &str = "jack_tools";

/// Locates and invokes the JACK command-line tools.
#[derive(Debug, Clone)]
pub struct JackTools {
    dir: Option<Utf8PathBuf>,
    server: Option<String>,
    timeout: Duration,
}

impl JackTools {
    /// Builds a tool locator.
    ///
    /// Tools are resolved inside `dir` when given and through `PATH`
    /// otherwise. `server` selects a named JACK server.
    #[must_use]
    pub fn new(dir: Option<&Utf8Path>, server: Option<&str>, timeout: Duration) -> Self {
        Self {
            dir: dir.map(Utf8Path::to_path_buf),
            server: server.map(str::to_owned),
            timeout,
        }
    }

    fn command(&self, tool: &str) -> Command {
        let mut command = match &self.dir {
            Some(dir) => Command::new(dir.join(tool)),
            None => Command::new(tool),
        };
        command.env("JACK_NO_START_SERVER", "1");
        if let Some(server) = &self.server {
            command.env("JACK_DEFAULT_SERVER", server);
        }
        command
    }

    fn run(&self, tool: &str, args: &[&str]) -> Result<String, EngineError> {
        let mut command = self.command(tool);
        command.args(args);
        run_to_completion(tool, command, self.timeout)
    }
}

/// [`EngineBackend`] that shells out to `jack_lsp`, `jack_connect` and
/// friends.
#[derive(Debug, Clone)]
pub struct JackToolsBackend {
    tools: JackTools,
    client_name: String,
}

impl JackToolsBackend {
    /// Builds a backend from explicit parts.
    #[must_use]
    pub fn new(tools: JackTools, client_name: impl Into<String>) -> Self {
        Self {
            tools,
            client_name: client_name.into(),
        }
    }

    /// Builds a backend from the daemon configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let tools = JackTools::new(
            config.jack_tools_dir(),
            config.jack_server(),
            config.engine_timeout(),
        );
        Self::new(tools, config.client_name())
    }
}

impl EngineBackend for JackToolsBackend {
    fn open(&self) -> Result<Box<dyn EngineHandle>, EngineError> {
        let mut handle = JackToolsHandle {
            tools: self.tools.clone(),
            client_name: self.client_name.clone(),
        };
        // The tools are stateless, so a session is only as good as the
        // server answering right now.
        handle.probe()?;
        Ok(Box::new(handle))
    }

    fn method(&self) -> &'static str {
        METHOD
    }
}

struct JackToolsHandle {
    tools: JackTools,
    client_name: String,
}

impl EngineHandle for JackToolsHandle {
    fn probe(&mut self) -> Result<EngineInfo, EngineError> {
        let output = self.tools.run("jack_samplerate", &[])?;
        let sample_rate = parse_number_after(&output, "sample rate")
            .filter(|rate| *rate > 0)
            .ok_or_else(|| EngineError::not_running("jack_samplerate reported no sample rate"))?;
        let output = self.tools.run("jack_bufsize", &[])?;
        let buffer_size = parse_number_after(&output, "buffer size")
            .ok_or_else(|| EngineError::invalid_output("jack_bufsize", output.trim()))?;
        Ok(EngineInfo {
            sample_rate,
            buffer_size,
            client_name: self.client_name.clone(),
        })
    }

    fn ports(&mut self) -> Result<Vec<Port>, EngineError> {
        let output = self.tools.run("jack_lsp", &["-p", "-t"])?;
        Ok(parse_ports(&output))
    }

    fn connections(&mut self) -> Result<Vec<Connection>, EngineError> {
        let output = self.tools.run("jack_lsp", &["-c", "-p"])?;
        Ok(parse_connections(&output))
    }

    fn connect(&mut self, from: &str, to: &str) -> Result<ConnectOutcome, EngineError> {
        if self.connections()?.iter().any(|edge| edge.joins(from, to)) {
            return Ok(ConnectOutcome::AlreadyConnected);
        }
        self.tools.run("jack_connect", &[from, to])?;
        Ok(ConnectOutcome::Connected)
    }

    fn disconnect(&mut self, from: &str, to: &str) -> Result<(), EngineError> {
        self.tools.run("jack_disconnect", &[from, to]).map(drop)
    }

    fn close(&mut self) {
        debug!(target: ENGINE_TARGET, client = %self.client_name, "released JACK tools session");
    }
}
