//! Error taxonomy for the text service.
//!
//! Only [`AppError::Infrastructure`] and [`AppError::Render`] ever escape a
//! controller. Not-found, validation and conflict outcomes are answered in
//! the response itself (a fixed 404 body, or an inline message with 200).

use http::StatusCode;
use thiserror::Error;

/// Failure of the key-value substrate backing content and session storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or rewriting the backing file failed.
    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A record could not be encoded or decoded.
    #[error("store record could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Failure while rendering a view template.
#[derive(Debug, Error)]
#[error("view '{view}' failed to render: {source}")]
pub struct ViewError {
    pub view: &'static str,
    #[source]
    pub source: minijinja::Error,
}

/// Request-level error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// No handler is registered for the path. The router answers this
    /// case itself with a 404 response; the variant only names the
    /// category.
    #[error("no route for {0}")]
    NotFound(String),
    /// A required form field was missing or empty.
    #[error("{0}")]
    Validation(&'static str),
    /// The item being created already exists.
    #[error("{0}")]
    Conflict(&'static str),
    /// The persistence layer failed.
    #[error("infrastructure failure: {0}")]
    Infrastructure(#[from] StoreError),
    /// A view could not be rendered.
    #[error(transparent)]
    Render(#[from] ViewError),
}

impl AppError {
    /// Status code the gateway answers with for this category.
    ///
    /// Validation and conflict errors are presentational and keep `200`.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::OK,
            AppError::Infrastructure(_) | AppError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
