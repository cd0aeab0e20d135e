use cartographer::{convert_file, default_palette_path, load_palette};
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

use anyhow::Result;
use clap::Parser;
use libmcmap::{ConvertOptions, DitherMethod, DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

/// Converts images to map art files and map art files back to images
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Palette file of quoted "r,g,b" base colors [default: colours.csv next to the executable]
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// Dithering used for image to map conversion
    #[arg(short, long, default_value_t = DitherMethod::default())]
    dither: DitherMethod,

    /// Map width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Map height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Directory for the converted files [default: next to each input]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Images to turn into maps, or maps to turn into images
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_file(true)
        .with_line_number(true)
        .init();

    let palette_path = cli.palette.unwrap_or_else(default_palette_path);
    let palette = load_palette(&palette_path)?;

    let options = ConvertOptions::builder()
        .dither(cli.dither)
        .width(cli.width)
        .height(cli.height)
        .build();

    if cli.files.is_empty() {
        warn!("No files given, nothing to do");
    }

    let mut failed = 0_usize;
    for file in &cli.files {
        match convert_file(file, &palette, &options, cli.output_dir.as_deref()) {
            Ok(output) => info!("{} -> {}", file.display(), output.display()),
            Err(e) => {
                failed += 1;
                error!("Failed to convert {}: {e:#}", file.display());
            }
        }
    }
    if failed > 0 {
        warn!("{failed} of {} files could not be converted", cli.files.len());
    }
    Ok(())
}
