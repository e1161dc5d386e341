//! # Server Module
//!
//! Gateway adapter between `may_minihttp` and the router.
//!
//! - [`request`] turns the raw request into a [`ParsedRequest`]: path,
//!   multi-valued parameters and cookies.
//! - [`service`] holds [`AppService`], which resolves the visitor's session,
//!   dispatches through the router and announces new sessions.
//! - [`response`] writes the status line, `Content-Type: text/html` and the
//!   one-time `Set-Cookie` header.
//! - [`http_server`] starts and stops the coroutine server.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, ParsedRequest, SESSION_COOKIE};
pub use response::{ContentType, GatewayResponse};
pub use service::{health_endpoint, AppService, ServiceOptions, DEFAULT_COOKIE_EXPIRES};
