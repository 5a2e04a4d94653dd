use anyhow::Result;
use clap::Parser;
use tracing::info;

mod audio;
mod color;
mod config;
mod display;
mod visualizer;

use color::ColorScheme;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "polarviz")]
#[command(author, version, about = "Circular audio spectrum visualizer for the terminal")]
pub struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Sink whose monitor is captured (default: the default sink)
    #[arg(short, long)]
    device: Option<String>,

    /// Full PulseAudio source name, used verbatim (overrides --device)
    #[arg(long)]
    source: Option<String>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Transform window size, must be a power of two
    #[arg(long)]
    fft_size: Option<usize>,

    /// Temporal smoothing factor (0.0-1.0)
    #[arg(long)]
    smoothing: Option<f32>,

    /// Color scheme
    #[arg(long)]
    colors: Option<ColorScheme>,

    /// Display ceiling in Hz; bins and markers above it are skipped
    #[arg(long)]
    max_frequency: Option<f32>,

    /// Target frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Hide the background grid
    #[arg(long)]
    no_grid: bool,

    /// Hide the frequency-axis labels
    #[arg(long)]
    no_labels: bool,

    /// Hide the named reference markers
    #[arg(long)]
    no_markers: bool,

    /// List PulseAudio/PipeWire sources and exit
    #[arg(long)]
    list_sources: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polarviz=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.list_sources {
        for (name, state) in audio::list_sources()? {
            println!("{name}\t{state}");
        }
        return Ok(());
    }

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args);
    config.validate()?;

    info!(
        "Starting polarviz: {} bins at {} Hz",
        config.audio.fft_size / 2,
        config.audio.sample_rate
    );

    display::terminal::run(config).await
}
