use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use starmath_core::bad_pixels::BadPixelConfig;
use starmath_core::detection::{
    CentroidConfig, CentroidMethod, DegeneratePolicy, DetectionConfig, FwhmConfig, FwhmMethod,
    HfdConfig, ThresholdMethod,
};
use starmath_core::io;
use starmath_core::pipeline::actions::CropStars;
use starmath_core::pipeline::views::DetectStars;
use starmath_core::pipeline::{Action, Pipeline};
use tracing::debug;

use crate::summary::print_star_table;

#[derive(Clone, ValueEnum)]
pub enum ThresholdArg {
    Mean,
    Otsu,
    MaxEntropy,
    Sigma,
}

#[derive(Clone, ValueEnum)]
pub enum CentroidArg {
    /// Center of gravity
    Cog,
    /// Intensity weighted (squared intensities)
    Iwc,
}

#[derive(Clone, ValueEnum)]
pub enum FwhmArg {
    Crossing,
    Gaussian,
}

#[derive(Args)]
pub struct DetectArgs {
    /// Input image (FITS, TIFF or PNG)
    pub file: PathBuf,

    /// Detection config file (TOML); overrides the options below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Thresholding method
    #[arg(long, value_enum, default_value = "otsu")]
    pub threshold: ThresholdArg,

    /// Sigma multiplier for the sigma threshold
    #[arg(long, default_value = "3.0")]
    pub sigma: f32,

    /// Centroid method
    #[arg(long, value_enum, default_value = "cog")]
    pub centroid: CentroidArg,

    /// FWHM method
    #[arg(long, value_enum, default_value = "crossing")]
    pub fwhm: FwhmArg,

    /// HFD measurement window diameter in pixels
    #[arg(long, default_value = "25")]
    pub hfd_diameter: usize,

    /// Minimum pixels per star
    #[arg(long, default_value = "3")]
    pub min_pixels: usize,

    /// Gaussian blur sigma before thresholding
    #[arg(long)]
    pub blur: Option<f32>,

    /// Interpolate hot and cold pixels first
    #[arg(long)]
    pub bad_pixels: bool,

    /// Fail on the first degenerate star instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Show the N brightest stars only
    #[arg(long)]
    pub top: Option<usize>,

    /// Write one cut-out per star into this directory
    #[arg(long)]
    pub crop_dir: Option<PathBuf>,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let config = match args.config {
        Some(ref path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid detection config")?
        }
        None => build_config_from_args(args),
    };

    let image = io::read(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "Detecting stars in {}x{} image",
        image.width(),
        image.height()
    ));

    let result = Pipeline::new()
        .then(DetectStars { config })
        .run(image)?;
    spinner.finish_and_clear();

    let stars = result.stars();
    print_star_table(stars, result.background, args.top);

    if let Some(ref dir) = args.crop_dir {
        let crops = CropStars::default().apply(result)?;
        for (i, crop) in crops.iter().enumerate() {
            let path = io::numbered_path(dir, "star_{}.fits", i + 1);
            debug!(path = %path.display(), "Writing star cut-out");
            io::write(crop, &path, true)?;
        }
        println!("\nSaved {} star cut-outs to {}", crops.len(), dir.display());
    }

    Ok(())
}

fn build_config_from_args(args: &DetectArgs) -> DetectionConfig {
    let threshold = match args.threshold {
        ThresholdArg::Mean => ThresholdMethod::Mean,
        ThresholdArg::Otsu => ThresholdMethod::default(),
        ThresholdArg::MaxEntropy => ThresholdMethod::MaxEntropy {
            bins: starmath_core::consts::DEFAULT_HISTOGRAM_BINS,
        },
        ThresholdArg::Sigma => ThresholdMethod::MeanPlusSigma { sigma: args.sigma },
    };
    let centroid = CentroidConfig {
        method: match args.centroid {
            CentroidArg::Cog => CentroidMethod::CenterOfGravity,
            CentroidArg::Iwc => CentroidMethod::IntensityWeighted,
        },
        ..Default::default()
    };
    let fwhm = FwhmConfig {
        method: match args.fwhm {
            FwhmArg::Crossing => FwhmMethod::HalfMaxCrossing,
            FwhmArg::Gaussian => FwhmMethod::GaussianFit,
        },
        ..Default::default()
    };

    let mut config = DetectionConfig {
        bad_pixels: args.bad_pixels.then(BadPixelConfig::default),
        blur_sigma: args.blur,
        threshold,
        centroid,
        hfd: HfdConfig {
            outer_diameter: args.hfd_diameter,
            ..Default::default()
        },
        fwhm,
        degenerate: if args.strict {
            DegeneratePolicy::Fail
        } else {
            DegeneratePolicy::Skip
        },
        ..Default::default()
    };
    config.cluster.min_pixels = args.min_pixels;
    config
}
