//! Connection handling abstractions for the listener.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};

/// Accepted client connection.
#[derive(Debug)]
pub(crate) struct ConnectionStream {
    inner: TcpStream,
}

impl ConnectionStream {
    pub(crate) fn peer_addr(&self) -> Option<SocketAddr> {
        self.inner.peer_addr().ok()
    }
}

impl From<TcpStream> for ConnectionStream {
    fn from(inner: TcpStream) -> Self {
        Self { inner }
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Handles accepted connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection. Implementations should avoid panicking.
    fn handle(&self, stream: ConnectionStream);
}
