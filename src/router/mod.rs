//! # Router Module
//!
//! Exact-path routing from a request path to a registered handler.
//!
//! ## Overview
//!
//! The router owns a table of `path -> handler` bindings:
//!
//! - Lookup is exact string equality on the path (no wildcards, no
//!   parameter segments, no trailing-slash folding).
//! - Registering the same path twice replaces the earlier handler.
//! - An unmatched path answers `404` with the fixed body `Nooo 404!`,
//!   whatever the query parameters are.
//!
//! Handlers receive the decoded [`Params`] and the request's
//! [`Session`](crate::session::Session) and return a [`HandlerResponse`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use textgate::router::{HandlerResponse, Params, Router};
//! use textgate::session::SessionStore;
//! use textgate::storage::MemoryStore;
//!
//! let mut router = Router::new();
//! router.register("/", |_params, _session| Ok(HandlerResponse::ok("Index HI!")));
//!
//! let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
//! let mut session = sessions.resolve("").unwrap();
//! let res = router.route("/", &Params::default(), &mut session).unwrap();
//! assert_eq!(res.status.as_u16(), 200);
//! ```

mod core;
mod params;
#[cfg(test)]
mod tests;

pub use core::{Handler, HandlerResponse, Router, NOT_FOUND_BODY};
pub use params::Params;
