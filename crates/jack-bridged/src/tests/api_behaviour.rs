//! Behavioural tests driving the HTTP API over a real loopback socket.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::engine::Connection;

use super::support::{self, BridgeWorld};

type StepResult = Result<(), String>;

#[fixture]
fn world() -> RefCell<BridgeWorld> {
    support::world()
}

#[given("a bridge connected to a running JACK server")]
fn given_connected_bridge(world: &RefCell<BridgeWorld>) -> StepResult {
    let mut world = world.borrow_mut();
    world.bootstrap();
    if world.initialize() {
        Ok(())
    } else {
        Err(String::from("scripted engine should accept the session"))
    }
}

#[when("a client connects \"{source}\" to \"{destination}\"")]
fn when_client_connects(world: &RefCell<BridgeWorld>, source: String, destination: String) {
    let body = format!(r#"{{"source":"{source}","destination":"{destination}"}}"#);
    let request = format!(
        "POST /connect HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    world.borrow_mut().send(&request);
}

#[when("a client requests \"{path}\"")]
fn when_client_requests(world: &RefCell<BridgeWorld>, path: String) {
    world
        .borrow_mut()
        .send(&format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"));
}

#[when("a client posts to \"{path}\"")]
fn when_client_posts(world: &RefCell<BridgeWorld>, path: String) {
    world
        .borrow_mut()
        .send(&format!("POST {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"));
}

#[then("the response is a 200 with CORS headers")]
fn then_response_is_ok(world: &RefCell<BridgeWorld>) {
    let world = world.borrow();
    let response = world.last_response();
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.contains("Access-Control-Allow-Origin: *\r\n"));
    assert!(response.contains("Content-Type: application/json\r\n"));
}

#[then("the response reports success")]
fn then_response_succeeds(world: &RefCell<BridgeWorld>) {
    let body = world.borrow().last_body();
    assert_eq!(body["success"], true, "{body}");
}

#[then("the response lists {count} entries")]
fn then_response_lists(world: &RefCell<BridgeWorld>, count: u64) {
    let body = world.borrow().last_body();
    assert_eq!(body["count"], count, "{body}");
}

#[then("the engine routes \"{source}\" to \"{destination}\"")]
fn then_engine_routes(world: &RefCell<BridgeWorld>, source: String, destination: String) {
    let edges = world.borrow().engine.edges();
    assert!(
        edges.contains(&Connection::new(source.as_str(), destination.as_str())),
        "missing edge in {edges:?}"
    );
}

#[then("the engine has no connections")]
fn then_engine_is_empty(world: &RefCell<BridgeWorld>) {
    let edges = world.borrow().engine.edges();
    assert!(edges.is_empty(), "leftover edges: {edges:?}");
}

#[scenario(path = "tests/features/bridge_api.feature")]
fn bridge_api(world: RefCell<BridgeWorld>) {
    drop(world);
}
