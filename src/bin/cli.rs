use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env};
use log::info;
use std::path::PathBuf;

use colormap::*;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Map a file of scalar values to RGB colors.
    Map(MapArgs),
    /// Render a palette as a horizontal colorbar image.
    Bar(BarArgs),
}

#[derive(Args)]
struct PaletteArgs {
    /// Mapper configuration file (.json, .ron or .yaml).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Built-in palette, overriding the configuration file.
    #[arg(short, long)]
    palette: Option<PaletteName>,
    /// Bin layout: 'uniform', or 'legacy' for bins of width 1/(N-2).
    #[arg(short, long)]
    binning: Option<Binning>,
}

#[derive(Args)]
struct MapArgs {
    /// Path to the input values (.json array, or numbers separated by
    /// whitespace or commas).
    input: PathBuf,
    /// Path to the output colors (.json, .ron, .yaml, or plain `r g b` lines).
    output: PathBuf,
    #[command(flatten)]
    palette: PaletteArgs,
    /// Values below this are clamped to it.
    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,
    /// Values above this are clamped to it.
    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,
    /// Number of parallel threads.
    #[arg(short, long, default_value_t = 1)]
    threads: usize,
}

#[derive(Args)]
struct BarArgs {
    /// Path to the output image (file extension must be an image format, e.g. PNG).
    output: PathBuf,
    #[command(flatten)]
    palette: PaletteArgs,
    /// Dimensions (in pixels) of the output image.
    #[arg(short, long, number_of_values = 2, default_values_t = [512, 32])]
    #[arg(value_names = ["WIDTH", "HEIGHT"])]
    dims: Vec<u32>,
}

impl PaletteArgs {
    fn mapper(&self) -> Result<ColorMapper, ColormapError> {
        let mut mapper = match &self.config {
            Some(path) => ColorMapper::from_file(path)?,
            None => ColorMapper::default(),
        };
        if let Some(name) = self.palette {
            mapper.palette = Palette::named(name);
        }
        if let Some(binning) = self.binning {
            mapper.binning = binning;
        }
        Ok(mapper)
    }
}

impl MapArgs {
    fn mapper(&self) -> Result<ColorMapper, ColormapError> {
        let mut mapper = self.palette.mapper()?;
        if self.min.is_some() || self.max.is_some() {
            mapper.range = Range::new(
                self.min.unwrap_or(mapper.range.min()),
                self.max.unwrap_or(mapper.range.max()),
            )?;
        }
        Ok(mapper)
    }
}

fn map(args: MapArgs) -> Result<(), ColormapError> {
    let mapper = args.mapper()?;
    let values = read_values(&args.input)?;

    info!(
        "Mapping {} values over [{}, {}] with {} binning...",
        values.len(),
        mapper.range.min(),
        mapper.range.max(),
        mapper.binning
    );

    let before_run = std::time::Instant::now();
    let colors = mapper.map_parallel(&values, args.threads)?;
    let dur = before_run.elapsed();

    write_colors(&args.output, &colors)?;

    info!(
        "Completed! Mapped in {}.{:03} seconds. Output written to '{}'",
        dur.as_secs(),
        dur.subsec_millis(),
        args.output.display()
    );

    Ok(())
}

fn bar(args: BarArgs) -> Result<(), ColormapError> {
    let mapper = args.palette.mapper()?;
    mapper.binning.check(mapper.palette.len())?;

    let cfg = ColorbarConfig {
        width: args.dims[0],
        height: args.dims[1],
        binning: mapper.binning,
    };
    mapper.palette.save_colorbar(cfg, &args.output)?;

    info!("Colorbar written to '{}'", args.output.display());
    Ok(())
}

fn run() -> Result<(), ColormapError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Map(args) => map(args),
        Command::Bar(args) => bar(args),
    }
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
