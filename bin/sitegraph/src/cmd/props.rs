//! Props command - print the resolved payload for one URL path

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use serde_json::{Value, json};
use sitegraph_resolver::{plan_page, resolve_static_props};

use super::{load_config, load_graph};

/// Options for the props command.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropsOptions {
    /// Pretty-print the JSON.
    pub pretty: bool,
    /// Include the render plan next to the props.
    pub plan: bool,
    /// Resolve as a preview build.
    pub preview: bool,
}

/// Run the props command.
pub async fn run(config_path: &Path, url_path: &str, options: PropsOptions) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.build.preview |= options.preview;

    let graph = load_graph(config_path, &config).await?;
    let props = resolve_static_props(url_path, &graph, &config.build)
        .wrap_err_with(|| format!("Failed to resolve props for {url_path}"))?;

    let output: Value = if options.plan {
        let plan = plan_page(&props).wrap_err_with(|| format!("Failed to plan {url_path}"))?;
        json!({ "props": props, "plan": plan })
    } else {
        serde_json::to_value(&props)?
    };

    let rendered = if options.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
