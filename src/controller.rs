//! # Text Controller
//!
//! Business logic for the `text` resource. Each action reads the request
//! [`Params`], consults or mutates the visitor's [`Session`] and the
//! [`ContentStore`], and renders a view.
//!
//! ## Gate
//!
//! An unauthenticated visitor may reveal [`FREE_VIEW_LIMIT`] items. On the
//! request where their counter equals the limit, nothing is looked up and
//! the index shows the access-code form instead. The comparison is equality:
//! a visitor who climbed past the limit while authenticated and then toggled
//! back out is not gated again.
//!
//! ## Routes
//!
//! | Path          | Action                  |
//! |---------------|-------------------------|
//! | `/`           | [`TextController::start`] |
//! | `/text`       | [`TextController::index`] |
//! | `/text/add`   | [`TextController::add`]   |
//! | `/text/login` | [`TextController::login`] |

use crate::content::{ContentItem, ContentStore};
use crate::error::{AppError, AppResult};
use crate::router::{HandlerResponse, Params, Router};
use crate::session::Session;
use crate::views::{
    AddContext, AddView, IndexContext, IndexView, RedirectView, Templates, TEXT_INDEX_PATH,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Items an unauthenticated visitor may read before the gate closes.
pub const FREE_VIEW_LIMIT: u32 = 3;

/// The single shared access code.
pub const ACCESS_CODE: &str = "1234";

pub const GREETING: &str = "Index HI!";
pub const MISSING_FIELDS: &str = "Need fill the form fields.";
pub const TITLE_EXISTS: &str = "Title already exist.";

/// What the index action decided, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutcome {
    pub all: Vec<ContentItem>,
    pub current: Option<ContentItem>,
    pub need_auth: bool,
}

pub struct TextController {
    texts: ContentStore,
    index_view: IndexView,
    add_view: AddView,
    redirect_view: RedirectView,
}

impl TextController {
    #[must_use]
    pub fn new(texts: ContentStore, templates: Templates) -> Self {
        Self {
            texts,
            index_view: IndexView::new(templates.clone()),
            add_view: AddView::new(templates.clone()),
            redirect_view: RedirectView::new(templates, TEXT_INDEX_PATH),
        }
    }

    /// `/`: plain greeting, no session effects.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other actions.
    pub fn start(&self, _params: &Params, _session: &mut Session) -> AppResult<HandlerResponse> {
        Ok(HandlerResponse::ok(GREETING))
    }

    /// Decide what `/text` reveals and update the view counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] if the store or session write
    /// fails.
    pub fn read(&self, params: &Params, session: &mut Session) -> AppResult<IndexOutcome> {
        let need_auth =
            !session.is_authenticated() && session.viewed_count() == FREE_VIEW_LIMIT;

        let mut current = None;
        if need_auth {
            info!(session_id = %session.id(), viewed = session.viewed_count(), "Gate closed");
        } else if let Some(title) = params.first("title") {
            current = self.texts.get_by_title(title)?;
            if current.is_some() {
                session.increment_viewed()?;
                debug!(
                    session_id = %session.id(),
                    title = %title,
                    viewed = session.viewed_count(),
                    "Text revealed"
                );
            }
        }

        Ok(IndexOutcome {
            all: self.texts.list_all()?,
            current,
            need_auth,
        })
    }

    /// `/text`: listing, optional selected item, gate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] or [`AppError::Render`].
    pub fn index(&self, params: &Params, session: &mut Session) -> AppResult<HandlerResponse> {
        let outcome = self.read(params, session)?;
        let body = self.index_view.render(&IndexContext {
            all: &outcome.all,
            current: outcome.current.as_ref(),
            need_auth: outcome.need_auth,
            is_authenticated: session.is_authenticated(),
        })?;
        Ok(HandlerResponse::ok(body))
    }

    /// Validate the form fields and persist a new item.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when `title` or `content` is missing
    /// or empty, [`AppError::Conflict`] when the title is taken, and
    /// [`AppError::Infrastructure`] if the store write fails.
    pub fn create(&self, params: &Params) -> AppResult<ContentItem> {
        let (Some(title), Some(content)) = (
            params.first_non_empty("title"),
            params.first_non_empty("content"),
        ) else {
            return Err(AppError::Validation(MISSING_FIELDS));
        };
        if !self.texts.create(title, content)? {
            return Err(AppError::Conflict(TITLE_EXISTS));
        }
        Ok(ContentItem::new(title, content))
    }

    /// `/text/add`: create, always `200`; rejections are shown inline.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] or [`AppError::Render`].
    pub fn add(&self, params: &Params, _session: &mut Session) -> AppResult<HandlerResponse> {
        let error = match self.create(params) {
            Ok(_) => None,
            Err(AppError::Validation(msg) | AppError::Conflict(msg)) => {
                warn!(title = ?params.first("title"), error = %msg, "Text not created");
                Some(msg)
            }
            Err(e) => return Err(e),
        };
        let body = self.add_view.render(&AddContext {
            title: params.first("title"),
            content: params.first("content"),
            error,
            url: TEXT_INDEX_PATH,
        })?;
        Ok(HandlerResponse::ok(body))
    }

    /// `/text/login`: a matching code toggles the session's authenticated
    /// flag. The response is the same redirect either way.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Infrastructure`] or [`AppError::Render`].
    pub fn login(&self, params: &Params, session: &mut Session) -> AppResult<HandlerResponse> {
        if params.first("code") == Some(ACCESS_CODE) {
            session.toggle_authenticated()?;
            info!(
                session_id = %session.id(),
                authenticated = session.is_authenticated(),
                "Access code accepted"
            );
        } else {
            warn!(session_id = %session.id(), "Access code rejected");
        }
        Ok(HandlerResponse::ok(self.redirect_view.render()?))
    }
}

/// Bind the controller's actions to their paths.
pub fn register_routes(router: &mut Router, controller: Arc<TextController>) {
    let c = Arc::clone(&controller);
    router.register("/", move |p, s| c.start(p, s));
    let c = Arc::clone(&controller);
    router.register("/text", move |p, s| c.index(p, s));
    let c = Arc::clone(&controller);
    router.register("/text/add", move |p, s| c.add(p, s));
    router.register("/text/login", move |p, s| controller.login(p, s));
}
