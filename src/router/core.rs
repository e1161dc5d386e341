use super::Params;
use crate::error::AppResult;
use crate::session::Session;
use http::StatusCode;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Body answered for every unregistered path.
pub const NOT_FOUND_BODY: &str = "Nooo 404!";

/// A route handler: `(params, session) -> response`.
pub type Handler = Arc<dyn Fn(&Params, &mut Session) -> AppResult<HandlerResponse> + Send + Sync>;

/// Status and rendered body produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
    }
}

/// Exact-match path router.
#[derive(Clone, Default)]
pub struct Router {
    routes: HashMap<String, Handler>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("paths", &self.paths())
            .finish()
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `path`, replacing any previous binding.
    pub fn register<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Params, &mut Session) -> AppResult<HandlerResponse> + Send + Sync + 'static,
    {
        if self
            .routes
            .insert(path.to_string(), Arc::new(handler))
            .is_some()
        {
            warn!(path = %path, "Route re-registered, previous handler replaced");
        } else {
            debug!(path = %path, "Route registered");
        }
    }

    /// Dispatch to the handler bound to `path`.
    ///
    /// The handler's response is returned unchanged; an unbound path yields
    /// [`HandlerResponse::not_found`].
    ///
    /// # Errors
    ///
    /// Propagates the handler's error.
    pub fn route(
        &self,
        path: &str,
        params: &Params,
        session: &mut Session,
    ) -> AppResult<HandlerResponse> {
        match self.routes.get(path) {
            Some(handler) => handler(params, session),
            None => {
                debug!(path = %path, "No route matched");
                Ok(HandlerResponse::not_found())
            }
        }
    }

    /// Registered paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}
