//! Minimal HTTP client for talking to a running listener.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use serde_json::Value;

/// Sends `request` and returns everything the server wrote before closing.
///
/// A reset after the response counts as the end of the stream.
pub fn exchange(addr: SocketAddr, request: &str) -> String {
    let mut client = TcpStream::connect(addr).expect("connect client");
    client
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("client read timeout");
    client
        .write_all(request.as_bytes())
        .expect("write request");
    let mut response = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        match client.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(read) => response.extend_from_slice(&chunk[..read]),
        }
    }
    String::from_utf8(response).expect("utf8 response")
}

/// Parses the JSON body following the blank line of a raw response.
pub fn response_json(response: &str) -> Value {
    let (_, body) = response
        .split_once("\r\n\r\n")
        .expect("response has a header terminator");
    serde_json::from_str(body).expect("response body is JSON")
}
