//! Supervises bridge launch sequencing and runtime orchestration.

use std::sync::Arc;

use tracing::{error, info, warn};

use jack_bridge_config::Config;

use crate::bootstrap::{ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::dispatch::BridgeConnectionHandler;
use crate::engine::{EngineBackend, JackToolsBackend};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::SocketListener;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to launch the bridge runtime.
pub(crate) struct LaunchPlan<L, S, F> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    /// Builds the engine backend from the resolved configuration.
    pub(crate) engine: F,
    pub(crate) shutdown: S,
}

/// Runs the bridge with the production collaborators until a termination
/// signal arrives.
///
/// # Errors
///
/// Returns [`LaunchError`] when configuration, bootstrap, the HTTP listener
/// or the watchdog fail, or when signal handlers cannot be installed. An
/// absent JACK server is not an error; the watchdog keeps retrying.
pub fn run_bridge() -> Result<(), LaunchError> {
    let plan = LaunchPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredHealthReporter::new()),
        engine: JackToolsBackend::from_config,
        shutdown: SystemShutdownSignal,
    };
    run_bridge_with(plan)
}

/// Runs the bridge with injected collaborators.
pub(crate) fn run_bridge_with<L, S, F, B>(plan: LaunchPlan<L, S, F>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
    F: FnOnce(&Config) -> B,
    B: EngineBackend + 'static,
{
    let LaunchPlan {
        loader,
        reporter,
        engine,
        shutdown,
    } = plan;

    let config = loader.load()?;
    let backend = engine(&config);
    let bridge = bootstrap_with(&StaticConfigLoader::new(config), reporter, backend)?;
    info!(
        target: PROCESS_TARGET,
        method = bridge.manager().method(),
        "starting bridge runtime"
    );

    let listener = match SocketListener::bind(bridge.config().listen()) {
        Ok(listener) => listener,
        Err(error) => {
            error!(
                target: PROCESS_TARGET,
                endpoint = %bridge.config().listen(),
                %error,
                "failed to bind HTTP listener"
            );
            return Err(error.into());
        }
    };
    let manager = bridge.manager();
    if !manager.initialize() {
        warn!(
            target: PROCESS_TARGET,
            "JACK server unavailable at startup; the watchdog will keep retrying"
        );
    }

    let local_addr = listener.local_addr();
    let handler = Arc::new(BridgeConnectionHandler::new(Arc::clone(&manager)));
    let listener_handle = listener.start(handler, bridge.config().max_connections())?;
    let watchdog_handle = match bridge.watchdog().spawn() {
        Ok(handle) => handle,
        Err(error) => {
            listener_handle.shutdown();
            drop(listener_handle.join());
            manager.shutdown();
            return Err(error.into());
        }
    };
    info!(
        target: PROCESS_TARGET,
        address = ?local_addr,
        "bridge ready"
    );

    let waited = shutdown.wait();
    info!(target: PROCESS_TARGET, "stopping bridge");
    listener_handle.shutdown();
    let listener_joined = listener_handle.join();
    watchdog_handle.shutdown();
    let watchdog_joined = watchdog_handle.join();
    manager.shutdown();
    waited?;
    listener_joined?;
    watchdog_joined?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
