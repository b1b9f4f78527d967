//! HTTP-flavoured request dispatch for the bridge API.
//!
//! Clients speak a small subset of HTTP/1.1: one request per connection, a
//! request line, headers the bridge ignores, and an optional JSON body. The
//! handler reads a single bounded chunk, routes on the exact method and
//! path, and answers with one JSON document before closing the connection.
//!
//! | Method | Path           | Operation                        |
//! |--------|----------------|----------------------------------|
//! | GET    | `/health`      | liveness and engine probe        |
//! | GET    | `/status`      | probe plus engine parameters     |
//! | GET    | `/ports`       | list ports                       |
//! | GET    | `/connections` | list edges                       |
//! | POST   | `/connect`     | create `source -> destination`   |
//! | POST   | `/disconnect`  | remove `source -> destination`   |
//! | POST   | `/clear`       | remove every edge                |
//! | OPTIONS| any            | empty CORS preflight answer      |
//!
//! Every answer carries status `200 OK`; clients inspect the body's
//! `success` and `error` fields.

mod bodies;
mod errors;
mod fields;
mod handler;
mod request;
mod response;
mod router;

pub(crate) use self::handler::BridgeConnectionHandler;

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
