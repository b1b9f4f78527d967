//! Shared doubles and worlds for the bridge test suites.

mod client;
mod config_loader;
mod engine;
mod logs;
mod reporter;
mod world;

pub use client::{exchange, response_json};
pub use config_loader::{FailingConfigLoader, TestConfigLoader, reserve_port};
pub use engine::ScriptedEngine;
pub use logs::CapturedLogs;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{BridgeWorld, world};
