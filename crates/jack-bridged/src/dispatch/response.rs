//! Wire encoding of bridge responses.
//!
//! Every response uses the same status line and CORS headers; logical
//! failures are reported inside the JSON body.

use serde::Serialize;
use time::OffsetDateTime;
use time::macros::format_description;

use super::bodies::ErrorBody;
use super::errors::DispatchError;

const STATUS_LINE: &str = "HTTP/1.1 200 OK";
const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];
const FALLBACK_TIMESTAMP: &str = "1970-01-01T00:00:00.000Z";

/// Encoded response ready to be written to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpResponse {
    body: String,
}

impl HttpResponse {
    /// Response with an empty body, used for CORS preflight.
    pub(crate) fn empty() -> Self {
        Self {
            body: String::new(),
        }
    }

    /// Serialises `body` as the JSON payload.
    pub(crate) fn json<T: Serialize>(body: &T) -> Result<Self, DispatchError> {
        Ok(Self {
            body: serde_json::to_string(body)?,
        })
    }

    /// Renders a dispatch failure as an error body.
    pub(crate) fn error(error: &DispatchError) -> Self {
        let body = ErrorBody::from_error(error);
        // ErrorBody holds only strings and booleans.
        let body = serde_json::to_string(&body).unwrap_or_else(|_| {
            String::from(r#"{"success":false,"error":"internal error"}"#)
        });
        Self { body }
    }

    pub(crate) fn body(&self) -> &str {
        &self.body
    }

    /// Status line, headers and body as one buffer.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut head = String::with_capacity(256 + self.body.len());
        head.push_str(STATUS_LINE);
        head.push_str("\r\n");
        for (name, value) in CORS_HEADERS {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("Content-Type: application/json\r\n");
        head.push_str("Content-Length: ");
        head.push_str(&self.body.len().to_string());
        head.push_str("\r\n\r\n");
        head.push_str(&self.body);
        head.into_bytes()
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub(crate) fn timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

fn format_timestamp(moment: OffsetDateTime) -> String {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    moment
        .format(&format)
        .unwrap_or_else(|_| String::from(FALLBACK_TIMESTAMP))
}
