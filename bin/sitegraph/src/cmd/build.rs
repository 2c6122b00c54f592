//! Build command - resolves and writes every static page

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use sitegraph_core::InMemorySource;
use sitegraph_resolver::Builder;

use super::{check::quick_validate, load_config, load_graph, resolve_path};

/// Run the build command.
///
/// Writes one resolved payload per static path into the output directory.
pub async fn run(config_path: &Path, output: Option<&Path>, preview: bool) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, preview, "Starting build");

    let mut config = load_config(config_path)?;
    config.build.preview |= preview;

    let output = match output {
        Some(dir) => dir.to_path_buf(),
        None => resolve_path(config_path, Path::new(&config.build.output_dir)),
    };

    let graph = load_graph(config_path, &config).await?;

    // Quick validation - print warnings for dangling references
    let warnings = quick_validate(&graph);
    if !warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warn in &warnings {
            println!("  ⚠ {warn}");
        }
        println!();
    }

    let builder = Builder::new(config.build.clone(), &output);
    let stats = builder
        .build(&InMemorySource::new(graph))
        .await
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Paths:      {}", stats.paths);
    println!("  Pages:      {}", stats.pages);
    println!("  Sections:   {}", stats.sections);
    if stats.missing > 0 {
        println!("  Missing:    {}", stats.missing);
    }
    println!("  Preview:    {}", config.build.preview);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
