//! Check command - validate configuration and the content graph

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use color_eyre::eyre::{Result, bail};
use sitegraph_core::{Config, ContentGraph, ContentObject, ModelName};
use sitegraph_resolver::{plan_page, resolve_static_paths, resolve_static_props};

use super::{graph_source, load_graph};

/// Reference fields checked for dangling ids.
const REFERENCE_FIELDS: &[&str] = &["author", "category"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration, the content graph and a dry run of every path.
pub async fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking content graph...");
        match load_graph(config_path, cfg).await {
            Ok(graph) => {
                println!(
                    "  ✓ Loaded {} page(s) and {} object(s)",
                    graph.pages.len(),
                    graph.objects.len()
                );
                validate_graph(&graph, &mut result);

                println!("\nResolving pages...");
                let resolved = dry_run(&graph, cfg, &mut result);
                println!("  ✓ {resolved} path(s) resolved");
            }
            Err(e) => {
                let path = graph_source(config_path, cfg);
                result.add_error(format!(
                    "Content graph {} could not be loaded: {e:#}",
                    path.path().display()
                ));
            }
        }
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Quick validation for the build command.
///
/// Returns warnings for references that point at no object (non-fatal).
pub fn quick_validate(graph: &ContentGraph) -> Vec<String> {
    let mut result = ValidationResult::default();
    check_references(graph, &mut result);
    result.warnings
}

/// Structural checks over the graph.
pub fn validate_graph(graph: &ContentGraph, result: &mut ValidationResult) {
    let mut ids: HashSet<&str> = HashSet::new();
    for object in &graph.objects {
        if let Some(id) = object.id()
            && !ids.insert(id)
        {
            result.add_error(format!("Duplicate object id '{id}'"));
        }
    }

    let mut url_paths: HashMap<&str, &str> = HashMap::new();
    for page in &graph.pages {
        let label = page.id().unwrap_or("unknown page");
        match page.url_path() {
            Some(url_path) => {
                if let Some(previous) = url_paths.insert(url_path, label) {
                    result.add_error(format!(
                        "Pages '{previous}' and '{label}' share URL path {url_path}"
                    ));
                }
            }
            None => result.add_warning(format!("Page '{label}' has no urlPath and is never built")),
        }

        check_page_model(page, label, result);
    }

    check_references(graph, result);
}

fn check_page_model(page: &ContentObject, label: &str, result: &mut ValidationResult) {
    let Some(model_name) = page.model_name() else {
        result.add_error(format!("Page '{label}' has no modelName"));
        return;
    };
    match model_name.parse::<ModelName>() {
        Ok(model) if model.is_page_layout() => {}
        Ok(model) => result.add_error(format!(
            "Page '{label}' uses {model}, which is a section, not a page layout"
        )),
        Err(_) => result.add_warning(format!(
            "Page '{label}' uses unregistered model {model_name}"
        )),
    }
}

fn check_references(graph: &ContentGraph, result: &mut ValidationResult) {
    for post in graph.objects_of(ModelName::PostLayout) {
        let label = post.id().unwrap_or("unknown post");
        for field in REFERENCE_FIELDS {
            if let Some(id) = post.str_field(field)
                && graph.object(id).is_none()
            {
                result.add_warning(format!("Post '{label}' references missing {field} '{id}'"));
            }
        }
    }
}

/// Resolve and plan every path, collecting failures. Returns the number of
/// paths that resolved cleanly.
fn dry_run(graph: &ContentGraph, config: &Config, result: &mut ValidationResult) -> usize {
    let mut resolved = 0;
    for url_path in resolve_static_paths(graph, &config.build) {
        let outcome = resolve_static_props(&url_path, graph, &config.build)
            .and_then(|props| plan_page(&props).map(|_| ()));
        match outcome {
            Ok(()) => resolved += 1,
            Err(e) => result.add_error(format!("{url_path}: {e}")),
        }
    }
    resolved
}
