//! TCP listener with a bounded pool of worker threads.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use jack_bridge_config::ListenEndpoint;

use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Listener bound to the configured endpoint.
#[derive(Debug)]
pub(crate) struct SocketListener {
    endpoint: ListenEndpoint,
    listener: TcpListener,
}

impl SocketListener {
    pub(crate) fn bind(endpoint: &ListenEndpoint) -> Result<Self, ListenerError> {
        let listener = bind_tcp(endpoint.host(), endpoint.port())?;
        Ok(Self {
            endpoint: endpoint.clone(),
            listener,
        })
    }

    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Starts accepting on a background thread.
    ///
    /// At most `max_workers` handlers run at once; further clients wait in
    /// the kernel backlog until a worker finishes.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
        max_workers: usize,
    ) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let active = Arc::new(AtomicUsize::new(0));
        let workers = WorkerPool {
            active: Arc::clone(&active),
            limit: max_workers.max(1),
        };
        let handle = thread::Builder::new()
            .name(String::from("jack-bridge-accept"))
            .spawn(move || run_accept_loop(&self, &flag, &handler, &workers))
            .map_err(|source| ListenerError::Spawn { source })?;
        Ok(ListenerHandle {
            shutdown,
            active,
            drain_timeout: DRAIN_TIMEOUT,
            handle: Some(handle),
        })
    }
}

/// Handle to the background listener thread.
pub(crate) struct ListenerHandle {
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    drain_timeout: Duration,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the accept loop to exit, then for in-flight workers to
    /// finish their request, for at most the drain timeout.
    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        let joined = match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ListenerError::ThreadPanic),
            None => Ok(()),
        };
        drain_workers(&self.active, self.drain_timeout);
        joined
    }

    #[cfg(test)]
    pub(crate) fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

struct WorkerPool {
    active: Arc<AtomicUsize>,
    limit: usize,
}

impl WorkerPool {
    fn is_full(&self) -> bool {
        self.active.load(Ordering::SeqCst) >= self.limit
    }

    fn claim(&self) -> WorkerSlot {
        self.active.fetch_add(1, Ordering::SeqCst);
        WorkerSlot(Arc::clone(&self.active))
    }
}

/// Releases a worker slot when the worker finishes, even by panicking.
struct WorkerSlot(Arc<AtomicUsize>);

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &SocketListener,
    shutdown: &AtomicBool,
    handler: &Arc<dyn ConnectionHandler>,
    workers: &WorkerPool,
) {
    info!(
        target: LISTENER_TARGET,
        endpoint = %listener.endpoint,
        max_workers = workers.limit,
        "listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        if workers.is_full() {
            thread::sleep(ACCEPT_BACKOFF);
            continue;
        }
        match accept_connection(&listener.listener) {
            Ok(Some(stream)) => {
                last_error = None;
                spawn_worker(stream, handler, workers);
            }
            Ok(None) => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        error = %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    debug!(target: LISTENER_TARGET, "listener stopped accepting");
}

fn drain_workers(active: &AtomicUsize, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    let mut remaining = active.load(Ordering::SeqCst);
    if remaining > 0 {
        debug!(
            target: LISTENER_TARGET,
            workers = remaining,
            "waiting for in-flight requests"
        );
    }
    while remaining > 0 {
        if Instant::now() >= deadline {
            warn!(
                target: LISTENER_TARGET,
                workers = remaining,
                "in-flight requests still running after drain timeout"
            );
            return;
        }
        thread::sleep(ACCEPT_BACKOFF);
        remaining = active.load(Ordering::SeqCst);
    }
}

fn spawn_worker(
    stream: ConnectionStream,
    handler: &Arc<dyn ConnectionHandler>,
    workers: &WorkerPool,
) {
    let slot = workers.claim();
    let handler = Arc::clone(handler);
    let spawned = thread::Builder::new()
        .name(String::from("jack-bridge-worker"))
        .spawn(move || {
            let _slot = slot;
            handler.handle(stream);
        });
    if let Err(error) = spawned {
        warn!(
            target: LISTENER_TARGET,
            error = %error,
            "failed to spawn connection worker"
        );
    }
}

fn accept_connection(listener: &TcpListener) -> Result<Option<ConnectionStream>, io::Error> {
    match listener.accept() {
        Ok((stream, _)) => {
            stream.set_nonblocking(false)?;
            stream.set_read_timeout(Some(READ_TIMEOUT))?;
            Ok(Some(ConnectionStream::from(stream)))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}
