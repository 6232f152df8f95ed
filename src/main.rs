use clap::{Args, Parser, Subcommand};
use spectral_filter::config::{cutoff_for_level, FilterSettings};
use spectral_filter::data_container::{crop_to, pad_to_power_of_two};
use spectral_filter::filters::{FilterKind, FilterParameters, Pass};
use spectral_filter::math_tools::is_power_of_two;
use spectral_filter::pipeline::{point_reflect, FrequencyFilterPipeline};
use spectral_filter::{FilterError, Result};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "spectral-filter", version, about = "Frequency domain filtering of grayscale images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filters an image and writes its spectra, the mask and the filtered image.
    Filter(FilterArgs),
    /// Reflects an image through its center using the spectrum.
    Reflect {
        input: PathBuf,
        #[arg(long, short, default_value = "reflected.png")]
        output: PathBuf,
        /// Pad images that are not square with a power-of-two side.
        #[arg(long)]
        pad: bool,
    },
}

#[derive(Args)]
struct FilterArgs {
    input: PathBuf,
    /// ideal, gaussian or butterworth
    #[arg(long)]
    kind: Option<FilterKind>,
    #[arg(long, conflicts_with = "low_pass")]
    high_pass: bool,
    #[arg(long)]
    low_pass: bool,
    /// Cutoff radius in frequency grid units.
    #[arg(long, conflicts_with = "threshold_level")]
    cutoff: Option<f64>,
    /// Cutoff preset, level L maps to (1 << 2L) - 1.
    #[arg(long)]
    threshold_level: Option<u32>,
    /// Butterworth order.
    #[arg(long)]
    order: Option<i32>,
    /// Pad images that are not square with a power-of-two side.
    #[arg(long)]
    pad: bool,
    #[arg(long, short)]
    output_dir: Option<PathBuf>,
    /// Persist the resulting selection as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

fn load_gray(input: &Path, pad: bool) -> Result<(image::GrayImage, u32, u32)> {
    let img = image::open(input)?.to_luma8();
    let (width, height) = img.dimensions();
    log::info!("opened {:?} ({}x{})", input, width, height);
    if width == height && is_power_of_two(width as usize) {
        return Ok((img, width, height));
    }
    if !pad {
        log::warn!("{width}x{height} is not square with a power-of-two side, use --pad");
        return Err(if width != height {
            FilterError::NotSquare {
                rows: height as usize,
                cols: width as usize,
            }
        } else {
            FilterError::NotPowerOfTwo {
                len: width as usize,
            }
        });
    }
    Ok((pad_to_power_of_two(&img), width, height))
}

fn run_filter(args: FilterArgs) -> Result<()> {
    let mut settings = FilterSettings::load_or_default();
    if let Some(kind) = args.kind {
        settings.kind = kind;
    }
    if args.high_pass {
        settings.pass = Pass::HighPass;
    } else if args.low_pass {
        settings.pass = Pass::LowPass;
    }
    if let Some(level) = args.threshold_level {
        settings.set_threshold_level(level);
    }
    if let Some(cutoff) = args.cutoff {
        settings.set_cutoff(cutoff);
    }
    if let Some(order) = args.order {
        settings.set_order(order);
    }
    if let Some(output_dir) = args.output_dir {
        settings.output_dir = output_dir;
    }

    let parameters: FilterParameters = settings.parameters();
    if settings.custom_cutoff.is_none() {
        log::debug!(
            "threshold level {} is cutoff {}",
            settings.threshold_level,
            cutoff_for_level(settings.threshold_level)
        );
    }

    let pipeline = FrequencyFilterPipeline::new(parameters)?;
    let (img, width, height) = load_gray(&args.input, args.pad)?;
    let mut report = pipeline.run(&img)?;
    if img.dimensions() != (width, height) {
        report.output_image = crop_to(&report.output_image, width, height)?;
    }

    std::fs::create_dir_all(&settings.output_dir)?;
    for path in report.save(&settings.output_dir)? {
        log::info!("wrote {:?}", path);
    }

    if args.save_settings {
        settings.store()?;
        log::info!("saved filter settings");
    }
    Ok(())
}

fn run_reflect(input: PathBuf, output: PathBuf, pad: bool) -> Result<()> {
    let (img, width, height) = load_gray(&input, pad)?;
    let mut reflected = point_reflect(&img)?;
    if img.dimensions() != (width, height) {
        reflected = crop_to(&reflected, width, height)?;
    }
    reflected.save(&output)?;
    log::info!("wrote {:?}", output);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Filter(args) => run_filter(args),
        Command::Reflect { input, output, pad } => run_reflect(input, output, pad),
    };

    if let Err(err) = result {
        log::error!("{err}");
        process::exit(1);
    }
}
