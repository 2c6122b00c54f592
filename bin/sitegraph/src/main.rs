//! Sitegraph CLI
//!
//! Resolves static paths and page props from a content graph.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use sitegraph::cmd::props::PropsOptions;

/// Command-line interface for sitegraph.
#[derive(Parser)]
#[command(
    name = "sitegraph",
    version,
    about = "Resolve static paths and props for a content-graph driven site"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sitegraph.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// List every static path
    Paths {
        /// Include drafts
        #[arg(long)]
        preview: bool,
    },
    /// Print the resolved props for a URL path
    Props {
        /// URL path to resolve (e.g., /blog/page/2)
        url_path: String,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
        /// Include the render plan
        #[arg(long)]
        plan: bool,
        /// Include drafts
        #[arg(long)]
        preview: bool,
    },
    /// Resolve and write every static page
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Include drafts
        #[arg(long)]
        preview: bool,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    sitegraph::init_tracing(cli.verbose);

    match cli.command {
        Commands::Paths { preview } => {
            sitegraph::cmd::paths::run(&cli.config, preview).await?;
        }
        Commands::Props {
            url_path,
            pretty,
            plan,
            preview,
        } => {
            let options = PropsOptions {
                pretty,
                plan,
                preview,
            };
            sitegraph::cmd::props::run(&cli.config, &url_path, options).await?;
        }
        Commands::Build { output, preview } => {
            sitegraph::cmd::build::run(&cli.config, output.as_deref(), preview).await?;
        }
        Commands::Check { strict } => {
            sitegraph::cmd::check::run(&cli.config, strict).await?;
        }
    }

    Ok(())
}
