use crate::router::Params;
use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sid";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Gateway-neutral view of an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed cookies from the Cookie header
    pub cookies: HashMap<String, String>,
    /// Query-string values followed by urlencoded form-body values
    pub params: Params,
}

impl ParsedRequest {
    /// Build a GET request from a raw target such as `/text?title=a`.
    ///
    /// Used by tests and by callers that drive [`AppService`](super::AppService)
    /// without a socket.
    #[must_use]
    pub fn get(target: &str) -> Self {
        Self {
            method: "GET".to_string(),
            path: strip_query(target).to_string(),
            params: parse_query_params(target),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    /// The `sid` cookie value, if the client sent one.
    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.cookies.get(SESSION_COOKIE).map(String::as_str)
    }
}

/// Split a `Cookie` header into name/value pairs.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    if name.is_empty() {
                        return None;
                    }
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse the query string of a request target, keeping repeated keys.
pub fn parse_query_params(target: &str) -> Params {
    match target.split_once('?') {
        Some((_, query)) => Params::from_urlencoded(query),
        None => Params::new(),
    }
}

fn strip_query(target: &str) -> &str {
    target.split('?').next().unwrap_or("/")
}

/// Extract everything the service needs from a `may_minihttp::Request`.
///
/// An `application/x-www-form-urlencoded` body is decoded and its values are
/// appended after the query-string values.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = strip_query(&raw_path).to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let cookies = parse_cookies(&headers);
    debug!(
        cookie_count = cookies.len(),
        cookie_names = ?cookies.keys().collect::<Vec<_>>(),
        "Cookies extracted"
    );

    let mut params = parse_query_params(&raw_path);

    let is_form = headers
        .get("content-type")
        .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));
    if is_form {
        let mut body = String::new();
        match req.body().read_to_string(&mut body) {
            Ok(size) if size > 0 => {
                params.extend_urlencoded(&body);
                debug!(body_size_bytes = size, "Form body parsed");
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Form body unreadable"),
        }
    }

    info!(
        method = %method,
        path = %path,
        headers_count = headers.len(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        cookies,
        params,
    }
}
