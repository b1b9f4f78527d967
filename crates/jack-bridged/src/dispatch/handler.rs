//! Connection handler that serves one bridge request per connection.

use std::io::{self, Read, Write};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::manager::ConnectionManager;
use crate::transport::{ConnectionHandler, ConnectionStream};

use super::DISPATCH_TARGET;
use super::request::{HttpRequest, MAX_REQUEST_BYTES};
use super::response::HttpResponse;
use super::router::Router;

/// Reads one request, answers it, and closes the connection.
///
/// The request is taken from a single read of at most
/// [`MAX_REQUEST_BYTES`]; longer requests are truncated rather than
/// reassembled.
#[derive(Debug)]
pub(crate) struct BridgeConnectionHandler {
    router: Router,
}

impl BridgeConnectionHandler {
    pub(crate) fn new(manager: Arc<ConnectionManager>) -> Self {
        Self {
            router: Router::new(manager),
        }
    }

    fn dispatch(&self, mut stream: ConnectionStream) {
        let bytes = match read_request(&mut stream) {
            Ok(bytes) if bytes.is_empty() => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                return;
            }
        };

        let request = HttpRequest::parse(&bytes);
        debug!(
            target: DISPATCH_TARGET,
            peer = ?stream.peer_addr(),
            method = request.method(),
            path = request.path(),
            version = request.version(),
            bytes = bytes.len(),
            "received request"
        );
        let response = self.router.route(&request);
        if let Err(error) = write_response(&mut stream, &response) {
            warn!(target: DISPATCH_TARGET, %error, "failed to write response");
        }
    }
}

impl ConnectionHandler for BridgeConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

fn read_request(stream: &mut impl Read) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0_u8; MAX_REQUEST_BYTES];
    let read = loop {
        match stream.read(&mut buffer) {
            Ok(read) => break read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    };
    buffer.truncate(read);
    Ok(buffer)
}

fn write_response(stream: &mut impl Write, response: &HttpResponse) -> io::Result<()> {
    stream.write_all(&response.to_bytes())?;
    stream.flush()
}
