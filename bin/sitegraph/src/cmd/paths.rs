//! Paths command - list every static path the build renders

use std::path::Path;

use color_eyre::eyre::Result;
use sitegraph_resolver::resolve_static_paths;

use super::{load_config, load_graph};

/// Run the paths command.
///
/// Prints one URL path per line, in build order.
pub async fn run(config_path: &Path, preview: bool) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.build.preview |= preview;

    let graph = load_graph(config_path, &config).await?;
    for path in resolve_static_paths(&graph, &config.build) {
        println!("{path}");
    }

    Ok(())
}
