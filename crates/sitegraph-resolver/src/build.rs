//! Build orchestration.
//!
//! Loads the content graph, enumerates static paths and writes one
//! resolved payload per path.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use serde::Serialize;
use sitegraph_core::{ContentSource, CoreError, config::BuildConfig};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::{
    error::ResolveError,
    layout::{RenderPlan, plan_page},
    paths::resolve_static_paths,
    props::{StaticProps, resolve_static_props},
};

/// File listing every built path, at the output root.
pub const PATHS_FILE: &str = "paths.json";

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be loaded.
    #[error("content error: {0}")]
    Core(#[from] CoreError),

    /// A page could not be resolved.
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Output could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of static paths enumerated.
    pub paths: usize,

    /// Number of page files written.
    pub pages: usize,

    /// Paths that matched no page.
    pub missing: usize,

    /// Number of sections planned across all pages.
    pub sections: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// What gets written for one path.
#[derive(Debug, Serialize)]
pub struct PageOutput<'a> {
    pub props: &'a StaticProps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<&'a RenderPlan>,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    settings: BuildConfig,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(settings: BuildConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            output_dir: output_dir.into(),
        }
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build.
    ///
    /// The first serialization or layout failure aborts the build.
    pub async fn build<S: ContentSource>(&self, source: &S) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            output = %self.output_dir.display(),
            preview = self.settings.preview,
            "starting build"
        );

        let graph = source.load().await?;

        self.clean_output().await?;

        let paths = resolve_static_paths(&graph, &self.settings);
        stats.paths = paths.len();

        for url_path in &paths {
            let props = resolve_static_props(url_path, &graph, &self.settings)?;
            let plan = if props.is_missing_page() {
                warn!(url_path = %url_path, "no page for path, writing bare props");
                stats.missing += 1;
                None
            } else {
                let plan = plan_page(&props)?;
                stats.sections += plan.sections.len();
                Some(plan)
            };

            let output = PageOutput {
                props: &props,
                plan: plan.as_ref(),
            };
            let target = output_path(&self.output_dir, url_path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&target, serde_json::to_vec_pretty(&output)?).await?;
            debug!(path = %target.display(), "wrote page");
            stats.pages += 1;
        }

        fs::write(
            self.output_dir.join(PATHS_FILE),
            serde_json::to_vec_pretty(&paths)?,
        )
        .await?;

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            paths = stats.paths,
            pages = stats.pages,
            missing = stats.missing,
            sections = stats.sections,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    async fn clean_output(&self) -> Result<()> {
        if fs::try_exists(&self.output_dir).await? {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir).await?;
        }
        fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }
}

/// File a URL path is written to: `/blog/page/2` becomes
/// `<out>/blog/page/2/index.json`.
///
/// Empty, `.` and `..` segments are dropped so output stays under `out`.
pub fn output_path(output_dir: &Path, url_path: &str) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    for segment in url_path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        path.push(segment);
    }
    path.join("index.json")
}
