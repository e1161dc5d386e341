use super::{HandlerResponse, Params, Router, NOT_FOUND_BODY};
use crate::session::SessionStore;
use crate::storage::MemoryStore;
use http::StatusCode;
use std::sync::Arc;

fn session_store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryStore::new()))
}

#[test]
fn test_exact_match_only() {
    let mut router = Router::new();
    router.register("/text", |_, _| Ok(HandlerResponse::ok("text")));
    let sessions = session_store();
    let mut session = sessions.resolve("").unwrap();

    let hit = router.route("/text", &Params::new(), &mut session).unwrap();
    assert_eq!(hit.body, "text");

    for miss in ["/text/", "/TEXT", "/text/other", ""] {
        let res = router.route(miss, &Params::new(), &mut session).unwrap();
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{miss}");
        assert_eq!(res.body, NOT_FOUND_BODY);
    }
}

#[test]
fn test_last_registration_wins() {
    let mut router = Router::new();
    router.register("/", |_, _| Ok(HandlerResponse::ok("first")));
    router.register("/", |_, _| Ok(HandlerResponse::ok("second")));
    let sessions = session_store();
    let mut session = sessions.resolve("").unwrap();

    let res = router.route("/", &Params::new(), &mut session).unwrap();
    assert_eq!(res.body, "second");
    assert_eq!(router.paths(), vec!["/"]);
}

#[test]
fn test_handler_response_passes_through_unchanged() {
    let mut router = Router::new();
    router.register("/teapot", |params, _| {
        Ok(HandlerResponse::new(
            StatusCode::IM_A_TEAPOT,
            params.first("x").unwrap_or_default().to_string(),
        ))
    });
    let sessions = session_store();
    let mut session = sessions.resolve("").unwrap();

    let res = router
        .route("/teapot", &Params::from_urlencoded("x=1"), &mut session)
        .unwrap();
    assert_eq!(res, HandlerResponse::new(StatusCode::IM_A_TEAPOT, "1"));
}
