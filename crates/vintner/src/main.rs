//! vintner CLI - markdown static site generator.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "vintner")]
#[command(about = "Markdown static site generator with a rebuild-on-change dev server")]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print name and version, then exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold pages/, static/ and template/ with a minimal example site
    Init,

    /// Build the site once into public/
    Build {
        /// Skip items that cannot bind instead of failing the build
        #[arg(long)]
        lenient: bool,
    },

    /// Build, serve locally and rebuild when source files change
    Develop {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Milliseconds between change-detection polls
        #[arg(long, default_value = "500")]
        interval_ms: u64,

        /// Do not open a browser tab
        #[arg(long)]
        no_open: bool,

        /// Skip items that cannot bind instead of failing the build
        #[arg(long)]
        lenient: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init => {
            commands::init::run()?;
        }
        Commands::Build { lenient } => {
            commands::build::run(lenient)?;
        }
        Commands::Develop {
            port,
            interval_ms,
            no_open,
            lenient,
        } => {
            commands::develop::run(port, interval_ms, !no_open, lenient).await?;
        }
    }

    Ok(())
}
