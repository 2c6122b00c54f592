//! Content sources.
//!
//! Loading the graph is the only point where a build waits on the outside
//! world; resolution afterwards runs against the loaded, read-only graph.

use std::{future::Future, path::PathBuf};

use tracing::{debug, info};

use crate::{
    content::ContentGraph,
    error::{CoreError, Result},
};

/// Something that can produce a content graph.
pub trait ContentSource {
    /// Load the full content graph.
    fn load(&self) -> impl Future<Output = Result<ContentGraph>> + Send;
}

/// Reads the content graph from a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source for the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ContentSource for JsonFileSource {
    fn load(&self) -> impl Future<Output = Result<ContentGraph>> + Send {
        let path = self.path.clone();
        async move {
            debug!(path = %path.display(), "reading content graph");

            let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
                CoreError::content(&path, format!("cannot read content graph: {e}"))
            })?;
            let graph = ContentGraph::from_json_str(&raw)
                .map_err(|e| CoreError::content(&path, e.to_string()))?;

            info!(
                path = %path.display(),
                pages = graph.pages.len(),
                objects = graph.objects.len(),
                "loaded content graph"
            );
            Ok(graph)
        }
    }
}

/// A graph that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    graph: ContentGraph,
}

impl InMemorySource {
    /// Wrap an existing graph.
    #[must_use]
    pub fn new(graph: ContentGraph) -> Self {
        Self { graph }
    }
}

impl ContentSource for InMemorySource {
    fn load(&self) -> impl Future<Output = Result<ContentGraph>> + Send {
        let graph = self.graph.clone();
        async move { Ok(graph) }
    }
}
