//! Scripted in-memory engine for manager, watchdog and dispatch tests.
//!
//! Every handle call is instrumented: overlapping calls from different
//! threads are counted so tests can assert the manager serialises access.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::engine::{
    ConnectOutcome, Connection, EngineBackend, EngineError, EngineHandle, EngineInfo, Port,
    PortDirection, PortKind,
};

#[derive(Debug, Default)]
struct Script {
    reachable: bool,
    failing_probes: bool,
    ports: Vec<Port>,
    edges: Vec<Connection>,
    failing_disconnects: HashSet<Connection>,
    opens: usize,
    closes: usize,
    call_delay: Duration,
}

/// Shared, cloneable fake engine. Clones observe the same script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    script: Arc<Mutex<Script>>,
    in_call: Arc<AtomicBool>,
    overlaps: Arc<AtomicUsize>,
}

impl ScriptedEngine {
    /// Builds a reachable engine exposing a small set of system ports.
    pub fn with_system_ports() -> Self {
        let engine = Self::default();
        {
            let mut script = engine.script();
            script.reachable = true;
            script.ports = vec![
                Port::new("system:capture_1", PortDirection::Output, PortKind::Audio),
                Port::new("system:capture_2", PortDirection::Output, PortKind::Audio),
                Port::new("system:playback_1", PortDirection::Input, PortKind::Audio),
                Port::new("system:playback_2", PortDirection::Input, PortKind::Audio),
                Port::new("system:midi_capture_1", PortDirection::Output, PortKind::Midi),
            ];
        }
        engine
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("engine script mutex poisoned")
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.script().reachable = reachable;
    }

    /// Keeps `open` working while every probe fails.
    pub fn fail_probes(&self, failing: bool) {
        self.script().failing_probes = failing;
    }

    /// Makes every handle call take at least `delay`.
    pub fn set_call_delay(&self, delay: Duration) {
        self.script().call_delay = delay;
    }

    pub fn add_edge(&self, from: &str, to: &str) {
        self.script().edges.push(Connection::new(from, to));
    }

    pub fn fail_disconnect(&self, from: &str, to: &str) {
        self.script()
            .failing_disconnects
            .insert(Connection::new(from, to));
    }

    pub fn edges(&self) -> Vec<Connection> {
        self.script().edges.clone()
    }

    pub fn opens(&self) -> usize {
        self.script().opens
    }

    pub fn closes(&self) -> usize {
        self.script().closes
    }

    /// Number of handle calls that started while another was running.
    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    fn enter(&self) -> CallGuard {
        if self.in_call.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        // Widen the window so unsynchronised callers would collide.
        let delay = self.script().call_delay;
        thread::sleep(delay.max(Duration::from_micros(200)));
        CallGuard {
            in_call: Arc::clone(&self.in_call),
        }
    }

    fn ensure_reachable(&self) -> Result<(), EngineError> {
        if self.script().reachable {
            Ok(())
        } else {
            Err(EngineError::not_running("scripted engine is offline"))
        }
    }
}

struct CallGuard {
    in_call: Arc<AtomicBool>,
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.in_call.store(false, Ordering::SeqCst);
    }
}

impl EngineBackend for ScriptedEngine {
    fn open(&self) -> Result<Box<dyn EngineHandle>, EngineError> {
        self.ensure_reachable()?;
        self.script().opens += 1;
        Ok(Box::new(ScriptedHandle {
            engine: self.clone(),
        }))
    }

    fn method(&self) -> &'static str {
        "scripted"
    }
}

struct ScriptedHandle {
    engine: ScriptedEngine,
}

impl EngineHandle for ScriptedHandle {
    fn probe(&mut self) -> Result<EngineInfo, EngineError> {
        let _guard = self.engine.enter();
        self.engine.ensure_reachable()?;
        if self.engine.script().failing_probes {
            return Err(EngineError::not_running("probe rejected"));
        }
        Ok(EngineInfo {
            sample_rate: 48_000,
            buffer_size: 256,
            client_name: String::from("jack-bridge"),
        })
    }

    fn ports(&mut self) -> Result<Vec<Port>, EngineError> {
        let _guard = self.engine.enter();
        self.engine.ensure_reachable()?;
        Ok(self.engine.script().ports.clone())
    }

    fn connections(&mut self) -> Result<Vec<Connection>, EngineError> {
        let _guard = self.engine.enter();
        self.engine.ensure_reachable()?;
        Ok(self.engine.edges())
    }

    fn connect(&mut self, from: &str, to: &str) -> Result<ConnectOutcome, EngineError> {
        let _guard = self.engine.enter();
        self.engine.ensure_reachable()?;
        let mut script = self.engine.script();
        if script.edges.iter().any(|edge| edge.joins(from, to)) {
            return Ok(ConnectOutcome::AlreadyConnected);
        }
        let has = |name: &str, direction| {
            script
                .ports
                .iter()
                .any(|port| port.name == name && port.direction == direction)
        };
        if !has(from, PortDirection::Output) || !has(to, PortDirection::Input) {
            return Err(EngineError::rejected(format!("cannot connect {from} to {to}")));
        }
        script.edges.push(Connection::new(from, to));
        Ok(ConnectOutcome::Connected)
    }

    fn disconnect(&mut self, from: &str, to: &str) -> Result<(), EngineError> {
        let _guard = self.engine.enter();
        self.engine.ensure_reachable()?;
        let mut script = self.engine.script();
        let edge = Connection::new(from, to);
        if script.failing_disconnects.contains(&edge) {
            return Err(EngineError::rejected(format!("{from} -> {to} is locked")));
        }
        let before = script.edges.len();
        script.edges.retain(|existing| *existing != edge);
        if script.edges.len() == before {
            return Err(EngineError::rejected(format!("{from} is not connected to {to}")));
        }
        Ok(())
    }

    fn close(&mut self) {
        self.engine.script().closes += 1;
    }
}
