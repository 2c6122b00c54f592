//! Command implementations.

pub mod build;
pub mod check;
pub mod paths;
pub mod props;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use sitegraph_core::{Config, ContentGraph, ContentSource, JsonFileSource};

/// Load the configuration, layering environment overrides on the file.
pub fn load_config(config_path: &Path) -> Result<Config> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Resolve a configured path against the directory holding the config file.
pub fn resolve_path(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// Source for the configured content graph.
pub fn graph_source(config_path: &Path, config: &Config) -> JsonFileSource {
    JsonFileSource::new(resolve_path(config_path, &config.content.graph))
}

/// Load the configured content graph.
pub async fn load_graph(config_path: &Path, config: &Config) -> Result<ContentGraph> {
    let source = graph_source(config_path, config);
    source
        .load()
        .await
        .wrap_err_with(|| format!("Failed to load content graph {}", source.path().display()))
}
