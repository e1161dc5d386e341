//! Process wiring: stores, controller, router and service are built once
//! here and passed down explicitly.

use crate::config::{AppConfig, StorageKind};
use crate::content::ContentStore;
use crate::controller::{register_routes, TextController};
use crate::error::ViewError;
use crate::router::Router;
use crate::server::{AppService, ServiceOptions};
use crate::session::{SessionRecord, SessionStore};
use crate::storage::{JsonFileStore, KvStore, MemoryStore};
use crate::views::Templates;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Build the service described by `config`.
///
/// # Errors
///
/// Fails if a store file cannot be opened or a template does not compile.
pub fn build_service(config: &AppConfig) -> Result<AppService> {
    let options = ServiceOptions {
        debug: config.debug,
        cookie_expires: config.cookie_expires.clone(),
    };
    let service = match config.storage {
        StorageKind::Memory => build_in_memory(options)?,
        StorageKind::File => {
            let content: Arc<dyn KvStore<String>> =
                Arc::new(JsonFileStore::open(config.content_path())?);
            let sessions: Arc<dyn KvStore<SessionRecord>> =
                Arc::new(JsonFileStore::open(config.session_path())?);
            assemble(content, sessions, options)?
        }
    };
    info!(
        storage = ?config.storage,
        data_dir = %config.data_dir.display(),
        routes = ?service.router().paths(),
        "Service assembled"
    );
    Ok(service)
}

/// Build a service whose stores live only in memory.
///
/// # Errors
///
/// Fails if a template does not compile.
pub fn build_in_memory(options: ServiceOptions) -> Result<AppService, ViewError> {
    assemble(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        options,
    )
}

/// Wire a service over caller-supplied stores.
///
/// # Errors
///
/// Fails if a template does not compile.
pub fn assemble(
    content: Arc<dyn KvStore<String>>,
    sessions: Arc<dyn KvStore<SessionRecord>>,
    options: ServiceOptions,
) -> Result<AppService, ViewError> {
    let controller = Arc::new(TextController::new(
        ContentStore::new(content),
        Templates::new()?,
    ));
    let mut router = Router::new();
    register_routes(&mut router, controller);
    Ok(AppService::new(
        Arc::new(router),
        Arc::new(SessionStore::new(sessions)),
        options,
    ))
}
