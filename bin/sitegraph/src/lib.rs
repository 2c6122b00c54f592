//! Sitegraph CLI Library
//!
//! Command implementations behind the `sitegraph` binary, exposed so they
//! can be driven from integration code as well.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (paths, props, build, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # async fn demo() -> color_eyre::eyre::Result<()> {
//! sitegraph::cmd::build::run(Path::new("sitegraph.toml"), None, false).await?;
//! # Ok(())
//! # }
//! ```

pub mod cmd;

pub use sitegraph_core::{Config, ContentGraph};
pub use sitegraph_resolver::{BuildStats, Builder, StaticProps};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
