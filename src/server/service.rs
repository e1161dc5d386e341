use super::request::{parse_request, ParsedRequest};
use super::response::{session_cookie, write_response, GatewayResponse};
use crate::error::AppError;
use crate::router::{HandlerResponse, Router};
use crate::session::SessionStore;
use http::StatusCode;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Fixed cookie expiry used when none is configured.
pub const DEFAULT_COOKIE_EXPIRES: &str = "Thu, 31 Dec 2099 23:59:59 GMT";

/// Gateway-level switches.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Append a dump of the parsed request to every HTML body.
    pub debug: bool,
    /// `expires=` attribute of the session cookie.
    pub cookie_expires: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            debug: false,
            cookie_expires: DEFAULT_COOKIE_EXPIRES.to_string(),
        }
    }
}

/// The request-handling entry point.
///
/// Everything is injected at construction; clones share the same router
/// and session store.
#[derive(Clone)]
pub struct AppService {
    router: Arc<Router>,
    sessions: Arc<SessionStore>,
    options: ServiceOptions,
}

impl AppService {
    pub fn new(router: Arc<Router>, sessions: Arc<SessionStore>, options: ServiceOptions) -> Self {
        Self {
            router,
            sessions,
            options,
        }
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run one request through session resolution, routing and the session
    /// announcement, without touching a socket.
    #[must_use]
    pub fn handle(&self, req: &ParsedRequest) -> GatewayResponse {
        let start = Instant::now();

        if req.path == "/health" {
            return health_endpoint();
        }

        let outcome = self
            .sessions
            .with_session(req.session_cookie(), |session| {
                // Persist a new session before the handler mutates anything.
                let cookie = if session.is_new() {
                    session.consume_new_flag()?;
                    Some(session_cookie(session.id(), &self.options.cookie_expires))
                } else {
                    None
                };
                let routed = self.router.route(&req.path, &req.params, session)?;
                Ok::<_, AppError>((routed, cookie, session.id()))
            })
            .map_err(AppError::from)
            .and_then(|inner| inner);

        match outcome {
            Ok((HandlerResponse { status, body }, cookie, session_id)) => {
                let body = if self.options.debug {
                    format!("{body}{}", debug_dump(req))
                } else {
                    body
                };
                info!(
                    method = %req.method,
                    path = %req.path,
                    status = status.as_u16(),
                    session_id = %session_id,
                    new_session = cookie.is_some(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Request handled"
                );
                GatewayResponse::html(status, body).with_cookie(cookie)
            }
            Err(e) => {
                error!(
                    method = %req.method,
                    path = %req.path,
                    status = e.status().as_u16(),
                    error = %e,
                    "Request failed"
                );
                GatewayResponse::internal_error()
            }
        }
    }
}

/// Liveness probe answering `{ "status": "ok" }`.
#[must_use]
pub fn health_endpoint() -> GatewayResponse {
    GatewayResponse::json(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}

fn debug_dump(req: &ParsedRequest) -> String {
    let dump = format!("{req:#?}")
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<br><br> The request: <pre>{dump}</pre>")
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        write_response(res, self.handle(&parsed));
        Ok(())
    }
}
