//! vid2json CLI - Convert video to JSON pixel data with RLE compression.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};

use vid2json::{
    ChannelOrder, EncoderConfig, Palette, RawVideoSource, Resolution,
    error::Result,
    output::format_size,
    pipeline::Encoder,
    source::{FfmpegSource, FrameSource},
};

#[derive(Parser, Debug)]
#[command(
    name = "vid2json",
    version,
    about = "Convert video to JSON pixel data with RLE compression"
)]
struct Cli {
    /// Input video file path
    #[arg(long, required_unless_present = "print_config")]
    video: Option<PathBuf>,

    /// Target width in pixels
    #[arg(
        long,
        allow_negative_numbers = true,
        required_unless_present_any = ["config", "print_config"]
    )]
    width: Option<i64>,

    /// Target height in pixels
    #[arg(
        long,
        allow_negative_numbers = true,
        required_unless_present_any = ["config", "print_config"]
    )]
    height: Option<i64>,

    /// Number of frames to skip (0 = include all frames)
    #[arg(long, allow_negative_numbers = true)]
    frameskip: Option<i64>,

    /// Optional JSON file containing color palette
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Split frame data into fixed-size buckets
    #[arg(long, allow_negative_numbers = true)]
    buckets: Option<i64>,

    /// Max number of frames to save (0 = all)
    #[arg(long, allow_negative_numbers = true)]
    totalframes: Option<i64>,

    /// JSON encoder configuration; command line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path (default: video path with a .json extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat the input as headerless raw video at this resolution (WIDTHxHEIGHT)
    #[arg(long, value_name = "WxH")]
    raw: Option<Resolution>,

    /// Sample layout of raw input
    #[arg(long, value_enum, default_value_t = PixelFormat::Bgr24)]
    pixel_format: PixelFormat,

    /// Sample frames in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the default configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PixelFormat {
    Bgr24,
    Rgb24,
}

impl From<PixelFormat> for ChannelOrder {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Bgr24 => ChannelOrder::Bgr,
            PixelFormat::Rgb24 => ChannelOrder::Rgb,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if cli.print_config {
        print_example_config();
        return;
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Start from the config file (or defaults) and apply command line overrides.
fn resolve_config(cli: &Cli) -> Result<EncoderConfig> {
    let mut config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => EncoderConfig::default(),
    };

    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(skip) = cli.frameskip {
        config.frame_skip = skip;
    }
    if let Some(buckets) = cli.buckets {
        config.buckets = buckets;
    }
    if let Some(total) = cli.totalframes {
        config.max_frames = total;
    }
    config.parallel |= cli.parallel;

    Ok(config)
}

fn open_source(video: &Path, cli: &Cli) -> Result<Box<dyn FrameSource>> {
    let source: Box<dyn FrameSource> = match cli.raw {
        Some(resolution) => Box::new(RawVideoSource::open(
            video,
            resolution,
            cli.pixel_format.into(),
        )?),
        None => Box::new(FfmpegSource::open(video)?),
    };
    Ok(source)
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let video = cli.video.clone().unwrap_or_default();

    // Validate before touching any input.
    let encoder_settings = config.validate()?;

    let palette = match &cli.palette {
        Some(path) => {
            println!("Loading palette from: {}", path.display());
            let palette = Palette::load(path)?;
            println!("Loaded {} colors from palette", palette.len());
            Some(palette)
        }
        None => None,
    };

    let encoder = Encoder::new(encoder_settings, palette);
    let mut source = open_source(&video, &cli)?;

    println!("Starting video processing...");
    println!(
        "Source: {} -> {}x{}",
        source.resolution(),
        config.width,
        config.height
    );
    let start = Instant::now();
    let encoded = encoder.encode(&mut source)?;
    let elapsed = start.elapsed();

    println!("Processed {} frames", encoded.stats.frames_encoded);
    println!("Bucket size: {}", encoded.stats.bucket_length);

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| video.with_extension("json"));
    println!("Writing output to: {}", output_path.display());
    let size = encoded.document.write_to_path(&output_path)?;

    println!("Output file size: {}", format_size(size));
    println!("Time: {:.2}s ({})", elapsed.as_secs_f32(), encoded.stats);
    println!("Done!");
    Ok(())
}

fn print_example_config() {
    let config = EncoderConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
