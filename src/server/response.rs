use crate::ids::SessionId;
use http::StatusCode;
use may_minihttp::Response;

use super::request::SESSION_COOKIE;

/// Body sent when a request fails below the controller layer.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Json,
}

impl ContentType {
    fn header_line(self) -> &'static str {
        match self {
            ContentType::Html => "Content-Type: text/html",
            ContentType::Json => "Content-Type: application/json",
        }
    }

    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            ContentType::Json => "application/json",
        }
    }
}

/// Status, headers and body on their way back through the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub content_type: ContentType,
    /// Full `Set-Cookie` value, present only on a session's first response.
    pub set_cookie: Option<String>,
    pub body: String,
}

impl GatewayResponse {
    #[must_use]
    pub fn html(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: ContentType::Html,
            set_cookie: None,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: ContentType::Json,
            set_cookie: None,
            body: body.to_string(),
        }
    }

    #[must_use]
    pub fn internal_error() -> Self {
        Self::html(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.set_cookie = cookie;
        self
    }

    /// Header list in the order it is written.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", self.content_type.mime().to_string())];
        if let Some(cookie) = &self.set_cookie {
            headers.push(("Set-Cookie", cookie.clone()));
        }
        headers
    }
}

/// `Set-Cookie` value announcing a session id.
#[must_use]
pub fn session_cookie(id: SessionId, expires: &str) -> String {
    format!("{SESSION_COOKIE}={id}; path=/; expires={expires}")
}

/// Reason phrase for the status line.
pub(crate) fn status_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("OK")
}

/// Write a [`GatewayResponse`] onto the `may_minihttp` response.
pub fn write_response(res: &mut Response, response: GatewayResponse) {
    res.status_code(
        usize::from(response.status.as_u16()),
        status_reason(response.status),
    );
    res.header(response.content_type.header_line());
    if let Some(cookie) = response.set_cookie {
        // may_minihttp only accepts 'static header lines; this leaks one
        // short string per newly announced session.
        let line = format!("Set-Cookie: {cookie}").into_boxed_str();
        res.header(Box::leak(line));
    }
    res.body_vec(response.body.into_bytes());
}
