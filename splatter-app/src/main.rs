//! Splatter Application
//!
//! Loads OBJ meshes as point splats and reports what a renderer would receive:
//! normalized positions, normals, splat sizes, midpoint and length.

mod app;
mod errors;
mod slot;
mod vertex;

use app::{AppBuilder, AppConfig, LoggingConfig, ReportFormat};
use clap::Parser;
use std::path::PathBuf;

/// Splatter - OBJ meshes as point splats
#[derive(Parser, Debug)]
#[command(name = "splatter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OBJ files to load in order; each one replaces the previous model
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON config file with derivation options and scale settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial display scale for each model
    #[arg(short, long)]
    scale: Option<f32>,

    /// Scale steps to apply after loading (negative shrinks)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    scale_steps: i32,

    /// Print summaries as JSON
    #[arg(long)]
    json: bool,

    /// Write the packed splat vertex buffer of the last model here
    #[arg(short, long)]
    dump: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Send spans to Tracy (needs the `tracy` feature)
    #[arg(long)]
    tracy: bool,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Application error: {}", e);
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    let mut builder = AppBuilder::new()
        .with_config(config)
        .with_logging(LoggingConfig {
            level: args.log_level,
            enable_tracy: args.tracy,
        })
        .with_scale_steps(args.scale_steps)
        .with_report_format(if args.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        });
    if let Some(scale) = args.scale {
        builder = builder.with_scale(scale);
    }
    if let Some(dump) = args.dump {
        builder = builder.with_dump_path(dump);
    }

    if let Err(e) = builder.run(&args.files) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
