//! Landed Templates - Entry Point
//!
//! Reads a mod tree, regenerates the per-region localisation templates and
//! publishes them next to the previous revision.

use std::path::PathBuf;

use clap::Parser;
use landed_templates::core::error::Result;
use landed_templates::{pipeline, PipelineConfig};

/// Generate per-region localisation templates for landed titles
#[derive(Parser, Debug)]
#[command(name = "landed-templates")]
#[command(about = "Generate per-region localisation templates for landed titles")]
struct Args {
    /// Root directory of the mod
    mod_root: PathBuf,

    /// Published templates directory (default: <MOD_ROOT>/templates)
    #[arg(long)]
    templates: Option<PathBuf>,

    /// TOML file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    summary_json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "landed_templates=debug"
    } else {
        "landed_templates=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::new(),
    };
    let templates = args
        .templates
        .clone()
        .unwrap_or_else(|| args.mod_root.join("templates"));

    tracing::info!("Landed templates starting for {:?}", args.mod_root);
    let summary = pipeline::run(&args.mod_root, &templates, &config)?;

    if args.summary_json {
        println!("{}", summary.to_json());
    } else {
        println!("{}", summary.summary());
    }
    Ok(())
}
