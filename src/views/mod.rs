//! # Views Module
//!
//! Pure `context -> markup` renderers backed by `minijinja` templates that
//! are compiled into the binary from `templates/`.
//!
//! - [`IndexView`] lists every title, shows the selected item, and swaps
//!   the read form for the access-code form when the gate is closed.
//! - [`AddView`] redirects to the listing after a successful create, or
//!   shows the error next to the submitted values.
//! - [`RedirectView`] emits a client-side refresh to a fixed path.
//!
//! Templates are registered under `.html` names, so `minijinja` escapes
//! every interpolated value.

use crate::content::ContentItem;
use crate::error::ViewError;
use minijinja::Environment;
use serde::Serialize;
use std::sync::Arc;

/// Path every redirect points at.
pub const TEXT_INDEX_PATH: &str = "/text";

const INDEX_TEMPLATE: &str = "index.html";
const ADD_TEMPLATE: &str = "add.html";
const REDIRECT_TEMPLATE: &str = "redirect.html";

/// Compiled template set shared by all views.
#[derive(Clone)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

impl Templates {
    /// Compile the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns a [`ViewError`] naming the template that failed to parse.
    pub fn new() -> Result<Self, ViewError> {
        let mut env = Environment::new();
        for (name, source) in [
            (INDEX_TEMPLATE, include_str!("../../templates/index.html")),
            (ADD_TEMPLATE, include_str!("../../templates/add.html")),
            (REDIRECT_TEMPLATE, include_str!("../../templates/redirect.html")),
        ] {
            env.add_template(name, source)
                .map_err(|source| ViewError { view: name, source })?;
        }
        Ok(Self { env: Arc::new(env) })
    }

    fn render<S: Serialize>(&self, name: &'static str, ctx: &S) -> Result<String, ViewError> {
        let wrap = |source| ViewError { view: name, source };
        self.env.get_template(name).map_err(wrap)?.render(ctx).map_err(wrap)
    }
}

/// Data handed to [`IndexView`].
#[derive(Debug, Serialize)]
pub struct IndexContext<'a> {
    pub all: &'a [ContentItem],
    pub current: Option<&'a ContentItem>,
    pub need_auth: bool,
    pub is_authenticated: bool,
}

/// Data handed to [`AddView`].
#[derive(Debug, Serialize)]
pub struct AddContext<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub error: Option<&'a str>,
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
struct RedirectContext<'a> {
    url: &'a str,
}

#[derive(Clone)]
pub struct IndexView(Templates);

impl IndexView {
    #[must_use]
    pub fn new(templates: Templates) -> Self {
        Self(templates)
    }

    /// # Errors
    ///
    /// Returns a [`ViewError`] if the template fails to render.
    pub fn render(&self, ctx: &IndexContext<'_>) -> Result<String, ViewError> {
        self.0.render(INDEX_TEMPLATE, ctx)
    }
}

#[derive(Clone)]
pub struct AddView(Templates);

impl AddView {
    #[must_use]
    pub fn new(templates: Templates) -> Self {
        Self(templates)
    }

    /// # Errors
    ///
    /// Returns a [`ViewError`] if the template fails to render.
    pub fn render(&self, ctx: &AddContext<'_>) -> Result<String, ViewError> {
        self.0.render(ADD_TEMPLATE, ctx)
    }
}

#[derive(Clone)]
pub struct RedirectView {
    templates: Templates,
    target: &'static str,
}

impl RedirectView {
    #[must_use]
    pub fn new(templates: Templates, target: &'static str) -> Self {
        Self { templates, target }
    }

    /// # Errors
    ///
    /// Returns a [`ViewError`] if the template fails to render.
    pub fn render(&self) -> Result<String, ViewError> {
        self.templates.render(
            REDIRECT_TEMPLATE,
            &RedirectContext { url: self.target },
        )
    }
}
