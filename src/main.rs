// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "qraft")]
#[command(about = "Build, classify and scan QR code payloads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a raw payload and print the result as JSON
    Classify {
        /// Payload text exactly as decoded
        payload: String,
    },

    /// Build a payload from a template
    Encode {
        #[command(subcommand)]
        template: cli::EncodeTemplate,
    },

    /// Scan a QR code from an image file
    ScanFile {
        /// Image to scan (png, jpg, gif, bmp, webp, tiff)
        path: PathBuf,
    },

    /// Scan a QR code with a camera until one is found or Ctrl+C
    Scan {
        /// Capture device (default from config, usually /dev/video0)
        #[arg(short, long)]
        device: Option<String>,
    },

    /// List the built-in color presets
    Presets,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=qraft=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { payload } => cli::classify_payload(&payload)?,
        Commands::Encode { template } => cli::encode_template(template)?,
        Commands::ScanFile { path } => cli::scan_image_file(&path)?,
        Commands::Scan { device } => cli::scan_camera(device)?,
        Commands::Presets => cli::list_presets()?,
    }

    Ok(())
}
