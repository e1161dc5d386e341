//! # textgate
//!
//! **textgate** is a small Model-View-Controller text service running on the
//! `may` coroutine runtime and `may_minihttp`. It stores "text" articles by
//! title, lets visitors read a few of them for free, and asks for an access
//! code once the free reads are used up.
//!
//! ## Architecture
//!
//! - **[`storage`]** - key-value substrate (`KvStore`) with memory and JSON
//!   file backends
//! - **[`content`]** - `ContentStore`: title-keyed articles, create-once
//! - **[`session`]** - `Session` / `SessionStore`: per-visitor counters and
//!   the authenticated flag, written through on every change
//! - **[`router`]** - exact-path routing to handlers
//! - **[`controller`]** - the `/`, `/text`, `/text/add` and `/text/login`
//!   actions
//! - **[`views`]** - `minijinja` templates for the pages
//! - **[`server`]** - gateway adapter: request parsing, session cookie,
//!   response writing, server lifecycle
//! - **[`config`]**, **[`logging`]**, **[`cli`]** - process setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Service as AppService
//!     participant Sessions as SessionStore
//!     participant Router
//!     participant Controller as TextController
//!     participant View
//!
//!     Client->>Server: GET /text?title=Alpha<br/>Cookie: sid=...
//!     Server->>Service: ParsedRequest
//!     Service->>Sessions: with_session(sid)
//!     Sessions->>Sessions: lock id, load or mint
//!     Service->>Sessions: consume_new_flag (new session only)
//!     Service->>Router: route(path, params, session)
//!     Router->>Controller: index(params, session)
//!     Controller->>Controller: gate check, lookup,<br/>increment viewed
//!     Controller->>View: IndexContext
//!     View-->>Controller: HTML
//!     Controller-->>Router: (200, body)
//!     Router-->>Service: HandlerResponse
//!     Service-->>Server: GatewayResponse<br/>(+ Set-Cookie once)
//!     Server-->>Client: 200 text/html
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use textgate::server::ParsedRequest;
//! use textgate::{build_in_memory, ServiceOptions};
//!
//! let service = build_in_memory(ServiceOptions::default()).unwrap();
//! let res = service.handle(&ParsedRequest::get("/text/add?title=Alpha&content=Hello"));
//! assert_eq!(res.status.as_u16(), 200);
//! assert!(res.set_cookie.is_some());
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod ids;
pub mod logging;
pub mod router;
pub mod server;
pub mod session;
pub mod storage;
pub mod views;

pub use app::{assemble, build_in_memory, build_service};
pub use content::{ContentItem, ContentStore};
pub use controller::{TextController, ACCESS_CODE, FREE_VIEW_LIMIT};
pub use error::{AppError, StoreError, ViewError};
pub use ids::SessionId;
pub use router::{HandlerResponse, Params, Router};
pub use server::{AppService, GatewayResponse, ParsedRequest, ServiceOptions};
pub use session::{Session, SessionRecord, SessionStore};
