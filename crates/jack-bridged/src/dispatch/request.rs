//! Request-line and body extraction from a raw request chunk.

/// Largest request the handler reads; anything beyond is dropped.
pub(crate) const MAX_REQUEST_BYTES: usize = 4096;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Request parsed from a single read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpRequest {
    method: String,
    path: String,
    version: String,
    body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Splits `METHOD PATH VERSION` off the first line and keeps whatever
    /// follows the blank line as the body.
    ///
    /// Parsing never fails: missing tokens become empty strings, which no
    /// route matches.
    pub(crate) fn parse(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let request_line = text.lines().next().unwrap_or_default();
        let mut tokens = request_line.split_whitespace();
        let mut next = || tokens.next().map(str::to_owned).unwrap_or_default();
        let method = next();
        let path = next();
        let version = next();

        let body = bytes
            .windows(HEADER_TERMINATOR.len())
            .position(|window| window == HEADER_TERMINATOR)
            .and_then(|start| bytes.get(start + HEADER_TERMINATOR.len()..))
            .filter(|body| !body.is_empty())
            .map(<[u8]>::to_vec);

        Self {
            method,
            path,
            version,
            body,
        }
    }

    pub(crate) fn method(&self) -> &str {
        &self.method
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn version(&self) -> &str {
        &self.version
    }

    pub(crate) fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
