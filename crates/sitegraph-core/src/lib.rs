//! Sitegraph Core Library
//!
//! Content graph model, configuration, and error handling shared by the
//! sitegraph resolvers and CLI.

pub mod config;
pub mod content;
pub mod error;
pub mod source;

pub use config::Config;
pub use content::{ContentGraph, ContentObject, METADATA_KEY, Metadata, ModelName};
pub use error::{CoreError, Result};
pub use source::{ContentSource, InMemorySource, JsonFileSource};
