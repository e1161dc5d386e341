//! Session resolution, write-through and per-id serialization.

use std::sync::Arc;
use std::thread;
use textgate::server::response::INTERNAL_ERROR_BODY;
use textgate::server::ParsedRequest;
use textgate::storage::{KvStore, MemoryStore};
use textgate::{assemble, ServiceOptions, SessionId, SessionRecord, SessionStore, StoreError};

mod common;
use common::app::{cookie_sid, service, Browser};

fn store() -> (Arc<MemoryStore<SessionRecord>>, SessionStore) {
    let records = Arc::new(MemoryStore::new());
    let sessions = SessionStore::new(records.clone());
    (records, sessions)
}

#[test]
fn test_empty_and_garbage_ids_mint_fresh_sessions() {
    let (_, sessions) = store();
    let a = sessions.resolve("").unwrap();
    let b = sessions.resolve("not-a-ulid").unwrap();

    assert_ne!(a.id(), b.id());
    for s in [&a, &b] {
        assert!(s.is_new());
        assert_eq!(s.viewed_count(), 0);
        assert!(!s.is_authenticated());
    }
}

#[test]
fn test_unknown_well_formed_id_is_replaced() {
    let (_, sessions) = store();
    let stranger = SessionId::new();
    let session = sessions.resolve(&stranger.to_string()).unwrap();
    assert_ne!(session.id(), stranger);
    assert!(session.is_new());
}

#[test]
fn test_mutations_are_written_through() {
    let (records, sessions) = store();
    let mut session = sessions.resolve("").unwrap();
    let key = session.id().to_string();

    session.increment_viewed().unwrap();
    session.toggle_authenticated().unwrap();
    session.consume_new_flag().unwrap();

    let stored = records.get(&key).unwrap().unwrap();
    assert_eq!(
        stored,
        SessionRecord {
            viewed_count: 1,
            is_authenticated: true,
            is_new: false,
        }
    );

    let again = sessions.resolve(&key).unwrap();
    assert_eq!(again.id(), session.id());
    assert_eq!(again.record(), stored);
}

#[test]
fn test_concurrent_increments_on_one_session_are_not_lost() {
    let (_, sessions) = store();
    let mut first = sessions.resolve("").unwrap();
    first.consume_new_flag().unwrap();
    let cookie = first.id().to_string();
    let sessions = Arc::new(sessions);

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let sessions = Arc::clone(&sessions);
            let cookie = cookie.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    sessions
                        .with_session(Some(&cookie), |s| s.increment_viewed())
                        .unwrap()
                        .unwrap();
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    let record = sessions.get(first.id()).unwrap().unwrap();
    assert_eq!(record.viewed_count, 200);
}

#[test]
fn test_set_cookie_only_on_first_response() {
    let service = service();
    let mut browser = Browser::new(&service);

    let first = browser.get("/");
    let sid = cookie_sid(&first).unwrap();
    assert_eq!(first.body, "Index HI!");

    for target in ["/", "/text", "/text/login?code=0000", "/missing"] {
        let res = browser.get(target);
        assert!(res.set_cookie.is_none(), "{target}");
    }
    assert_eq!(browser.sid.as_deref(), Some(sid.as_str()));

    let id: SessionId = sid.parse().unwrap();
    let record = service.sessions().get(id).unwrap().unwrap();
    assert!(!record.is_new);
}

#[test]
fn test_visitors_have_separate_counters() {
    let service = service();
    let mut writer = Browser::new(&service);
    writer.get("/text/add?title=A&content=a");

    let mut alice = Browser::new(&service);
    let mut bob = Browser::new(&service);
    alice.get("/text?title=A");
    alice.get("/text?title=A");
    bob.get("/text?title=A");

    let count = |b: &Browser<'_>| {
        let id: SessionId = b.sid.as_deref().unwrap().parse().unwrap();
        service.sessions().get(id).unwrap().unwrap().viewed_count
    };
    assert_eq!(count(&alice), 2);
    assert_eq!(count(&bob), 1);
}

/// Session backend whose writes always fail.
struct BrokenSessions;

impl KvStore<SessionRecord> for BrokenSessions {
    fn get(&self, _key: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: SessionRecord) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }

    fn insert_new(&self, _key: &str, _value: SessionRecord) -> Result<bool, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn entries(&self) -> Result<Vec<(String, SessionRecord)>, StoreError> {
        Ok(Vec::new())
    }
}

#[test]
fn test_session_write_failure_is_500_without_side_effects() {
    let content: Arc<MemoryStore<String>> = Arc::new(MemoryStore::new());
    let service = assemble(
        content.clone(),
        Arc::new(BrokenSessions),
        ServiceOptions::default(),
    )
    .unwrap();

    let res = service.handle(&ParsedRequest::get("/text/add?title=A&content=B"));
    assert_eq!(res.status.as_u16(), 500);
    assert_eq!(res.body, INTERNAL_ERROR_BODY);
    assert!(!res.body.contains("poisoned"));
    assert!(res.set_cookie.is_none());
    assert_eq!(content.get("A").unwrap(), None);
}
