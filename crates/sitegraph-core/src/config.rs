//! Build configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Environment variable holding the preview toggle.
pub const PREVIEW_ENV_VAR: &str = "SITEGRAPH_PREVIEW";

/// Main configuration structure for sitegraph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Content source settings.
    #[serde(default)]
    pub content: ContentConfig,
}

/// Build configuration.
///
/// Every resolver receives this explicitly; nothing reads the environment
/// after the configuration has been assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for resolved props.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Include drafts and unpublished posts.
    #[serde(default)]
    pub preview: bool,

    /// Feed window size when a feed page does not set `numOfPostsPerPage`.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,

    /// Number of posts shown by a recent-posts section without `recentCount`.
    #[serde(default = "default_recent_posts")]
    pub recent_posts: usize,
}

/// Content source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Path to the content graph JSON document.
    #[serde(default = "default_graph_path")]
    pub graph: PathBuf,
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_posts_per_page() -> usize {
    10
}

fn default_recent_posts() -> usize {
    6
}

fn default_graph_path() -> PathBuf {
    PathBuf::from("content/graph.json")
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            preview: false,
            posts_per_page: default_posts_per_page(),
            recent_posts: default_recent_posts(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            graph: default_graph_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `SITEGRAPH__*`
    /// environment overrides on top of an optional file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("SITEGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        if preview_from_env() {
            config.build.preview = true;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.build.output_dir.is_empty() {
            return Err(CoreError::config("build.output_dir cannot be empty"));
        }

        if self.build.posts_per_page == 0 {
            tracing::warn!("build.posts_per_page is 0, feeds will render on a single page");
        }

        Ok(())
    }
}

/// Read the preview toggle from the environment.
///
/// Called once while assembling the configuration.
pub fn preview_from_env() -> bool {
    preview_flag(std::env::var(PREVIEW_ENV_VAR).ok().as_deref())
}

/// Interpret a boolean-like environment value.
pub fn preview_flag(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) => !matches!(
            v.to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[build]
output_dir = "dist"
preview = true
posts_per_page = 5
recent_posts = 3

[content]
graph = "data/site.json"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("sitegraph.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.build.output_dir, "dist");
        assert!(config.build.preview);
        assert_eq!(config.build.posts_per_page, 5);
        assert_eq!(config.build.recent_posts, 3);
        assert_eq!(config.content.graph, PathBuf::from("data/site.json"));
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("sitegraph.toml");
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.build.output_dir, "public");
        assert!(!config.build.preview);
        assert_eq!(config.build.posts_per_page, 10);
        assert_eq!(config.build.recent_posts, 6);
        assert_eq!(config.content.graph, PathBuf::from("content/graph.json"));
    }

    #[test]
    fn test_config_validation_empty_output_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("sitegraph.toml");
        std::fs::write(&config_path, "[build]\noutput_dir = \"\"\n").expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("output_dir cannot be empty")
        );
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/sitegraph.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_load_with_env_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config::load_with_env(&dir.path().join("absent.toml")).expect("load config");

        assert_eq!(config.build.posts_per_page, 10);
        assert_eq!(config.build.output_dir, "public");
    }

    #[test]
    fn test_preview_flag() {
        assert!(!preview_flag(None));
        assert!(!preview_flag(Some("")));
        assert!(!preview_flag(Some("false")));
        assert!(!preview_flag(Some("0")));
        assert!(!preview_flag(Some(" OFF ")));
        assert!(preview_flag(Some("1")));
        assert!(preview_flag(Some("true")));
        assert!(preview_flag(Some("yes")));
    }
}
