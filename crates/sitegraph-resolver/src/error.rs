//! Resolver errors.
//!
//! Only conditions that would ship a corrupt or unrenderable page are
//! errors; everything recoverable is logged where it happens.

use sitegraph_core::CoreError;
use thiserror::Error;

/// Resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Core error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A path-expansion rule could not handle a page.
    #[error("cannot expand paths for page {page}: {message}")]
    Expansion { page: String, message: String },

    /// The payload does not survive a JSON round trip.
    #[error("Failed to serialize props for page {url_path}: {message}")]
    Serialize { url_path: String, message: String },

    /// The page carries no content type.
    #[error("page has no type, page '{url_path}'")]
    MissingModel { url_path: String },

    /// No page layout is registered for the page's content type.
    #[error("no page layout matching the page model: {model} (page '{url_path}')")]
    MissingLayout { url_path: String, model: String },
}

impl ResolveError {
    /// Create a new path-expansion error.
    pub fn expansion(page: Option<&str>, message: impl Into<String>) -> Self {
        Self::Expansion {
            page: page.unwrap_or("unknown page").to_string(),
            message: message.into(),
        }
    }

    /// Create a new serialization error.
    pub fn serialize(url_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialize {
            url_path: url_path.into(),
            message: message.into(),
        }
    }
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
