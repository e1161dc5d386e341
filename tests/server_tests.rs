//! End-to-end tests over TCP.
//!
//! Each test starts the service on a free local port through an RAII
//! fixture, speaks raw HTTP/1.1 to it and stops it on drop.

use std::net::{SocketAddr, TcpListener};
use textgate::server::{HttpServer, ServerHandle};
use textgate::{build_in_memory, ServiceOptions};

mod common;
use common::http::{header, parse_response, send_request};
use common::test_server::setup_may_runtime;

struct TestServer {
    handle: Option<ServerHandle>,
    addr: SocketAddr,
}

impl TestServer {
    fn start(options: ServiceOptions) -> Self {
        setup_may_runtime();
        let service = build_in_memory(options).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();
        Self {
            handle: Some(handle),
            addr,
        }
    }

    fn get(&self, target: &str, cookie: Option<&str>) -> (u16, Vec<(String, String)>, String) {
        let cookie_line = cookie
            .map(|c| format!("Cookie: sid={c}\r\n"))
            .unwrap_or_default();
        let req = format!(
            "GET {target} HTTP/1.1\r\nHost: localhost\r\n{cookie_line}Connection: close\r\n\r\n"
        );
        parse_response(&send_request(&self.addr, &req))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

fn sid_of(headers: &[(String, String)]) -> Option<String> {
    let cookie = header(headers, "set-cookie")?;
    cookie
        .split(';')
        .next()?
        .strip_prefix("sid=")
        .map(str::to_string)
}

#[test]
fn test_index_sets_cookie_and_html_content_type() {
    let server = TestServer::start(ServiceOptions::default());
    let (status, headers, body) = server.get("/text", None);

    assert_eq!(status, 200);
    assert!(header(&headers, "content-type")
        .unwrap()
        .starts_with("text/html"));
    let cookie = header(&headers, "set-cookie").unwrap();
    assert!(cookie.contains("path=/"));
    assert!(cookie.contains("expires="));
    assert!(body.contains("What do you want read?"));
}

#[test]
fn test_cookie_is_not_repeated_for_known_session() {
    let server = TestServer::start(ServiceOptions::default());
    let (_, headers, _) = server.get("/", None);
    let sid = sid_of(&headers).unwrap();

    let (status, headers, body) = server.get("/", Some(&sid));
    assert_eq!(status, 200);
    assert_eq!(body, "Index HI!");
    assert!(header(&headers, "set-cookie").is_none());
}

#[test]
fn test_unknown_path_is_404() {
    let server = TestServer::start(ServiceOptions::default());
    let (status, _, body) = server.get("/nope?title=x", None);
    assert_eq!(status, 404);
    assert_eq!(body, "Nooo 404!");
}

#[test]
fn test_add_then_read_over_the_wire() {
    let server = TestServer::start(ServiceOptions::default());
    let (status, headers, _) = server.get("/text/add?title=Alpha&content=Hello+there", None);
    assert_eq!(status, 200);
    let sid = sid_of(&headers).unwrap();

    let (status, _, body) = server.get("/text?title=Alpha", Some(&sid));
    assert_eq!(status, 200);
    assert!(body.contains("<h1>Alpha</h1>"));
    assert!(body.contains("Hello there"));
}

#[test]
fn test_health_is_json() {
    let server = TestServer::start(ServiceOptions::default());
    let (status, headers, body) = server.get("/health", None);
    assert_eq!(status, 200);
    assert!(header(&headers, "content-type")
        .unwrap()
        .starts_with("application/json"));
    assert!(header(&headers, "set-cookie").is_none());
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[test]
fn test_debug_dump_is_appended() {
    let server = TestServer::start(ServiceOptions {
        debug: true,
        ..ServiceOptions::default()
    });
    let (_, _, body) = server.get("/?probe=1", None);
    assert!(body.starts_with("Index HI!"));
    assert!(body.contains("The request:"));
    assert!(body.contains("probe"));
}
