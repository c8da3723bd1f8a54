use serde::{Deserialize, Serialize};

use crate::bad_pixels::BadPixelConfig;
use crate::consts::{
    DEFAULT_CENTROID_PADDING, DEFAULT_CLUSTER_RADIUS, DEFAULT_FWHM_WINDOW,
    DEFAULT_HFD_OUTER_DIAMETER, DEFAULT_HFD_SCALE, DEFAULT_HISTOGRAM_BINS,
    DEFAULT_MIN_STAR_PIXELS, DEFAULT_SIGMA_MULTIPLIER,
};

/// Policy separating star pixels from the sky background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ThresholdMethod {
    /// Threshold = arithmetic mean of the region.
    Mean,
    /// Otsu's method: maximizes inter-class variance of the histogram.
    Otsu {
        #[serde(default = "default_bins")]
        bins: usize,
    },
    /// Kapur's method: maximizes the summed entropy of both classes.
    MaxEntropy {
        #[serde(default = "default_bins")]
        bins: usize,
    },
    /// Threshold = mean + sigma * stddev.
    MeanPlusSigma {
        #[serde(default = "default_sigma")]
        sigma: f32,
    },
    /// User-specified fixed threshold in sample units.
    Fixed(f32),
}

impl Default for ThresholdMethod {
    fn default() -> Self {
        Self::Otsu {
            bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

fn default_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}
fn default_sigma() -> f32 {
    DEFAULT_SIGMA_MULTIPLIER
}

/// Connected-component grouping of the threshold mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Neighbourhood radius. 1 joins 8-connected pixels; larger values also
    /// bridge gaps of `radius - 1` background pixels.
    #[serde(default = "default_cluster_radius")]
    pub cluster_radius: usize,
    /// Blobs with fewer pixels are dropped as noise.
    #[serde(default = "default_min_pixels")]
    pub min_pixels: usize,
    /// Blobs whose bounding box is wider or taller than this are dropped.
    #[serde(default)]
    pub max_size: Option<usize>,
}

fn default_cluster_radius() -> usize {
    DEFAULT_CLUSTER_RADIUS
}
fn default_min_pixels() -> usize {
    DEFAULT_MIN_STAR_PIXELS
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cluster_radius: DEFAULT_CLUSTER_RADIUS,
            min_pixels: DEFAULT_MIN_STAR_PIXELS,
            max_size: None,
        }
    }
}

/// Weighting used to locate a star's center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CentroidMethod {
    /// Weights are background-subtracted intensities.
    #[default]
    CenterOfGravity,
    /// Weights are squared background-subtracted intensities.
    IntensityWeighted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CentroidConfig {
    #[serde(default)]
    pub method: CentroidMethod,
    /// Pixels added around the blob bounds before weighting.
    #[serde(default = "default_padding")]
    pub window_padding: usize,
}

fn default_padding() -> usize {
    DEFAULT_CENTROID_PADDING
}

impl Default for CentroidConfig {
    fn default() -> Self {
        Self {
            method: CentroidMethod::default(),
            window_padding: DEFAULT_CENTROID_PADDING,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HfdConfig {
    /// Diameter of the circular measurement window in pixels.
    #[serde(default = "default_outer_diameter")]
    pub outer_diameter: usize,
    /// HFD = scale_constant * sum(I * d) / sum(I).
    #[serde(default = "default_hfd_scale")]
    pub scale_constant: f64,
    /// Subtract the local background before weighting.
    #[serde(default = "default_true")]
    pub subtract_background: bool,
}

fn default_outer_diameter() -> usize {
    DEFAULT_HFD_OUTER_DIAMETER
}
fn default_hfd_scale() -> f64 {
    DEFAULT_HFD_SCALE
}
fn default_true() -> bool {
    true
}

impl Default for HfdConfig {
    fn default() -> Self {
        Self {
            outer_diameter: DEFAULT_HFD_OUTER_DIAMETER,
            scale_constant: DEFAULT_HFD_SCALE,
            subtract_background: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FwhmMethod {
    /// Linear interpolation of the half-maximum crossings.
    #[default]
    HalfMaxCrossing,
    /// Least-squares parabola through the log profile. Falls back to the
    /// crossing estimate when the profile is not Gaussian-like.
    GaussianFit,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FwhmConfig {
    #[serde(default)]
    pub method: FwhmMethod,
    /// Length of each axis profile in pixels.
    #[serde(default = "default_fwhm_window")]
    pub window: usize,
    #[serde(default = "default_true")]
    pub subtract_background: bool,
}

fn default_fwhm_window() -> usize {
    DEFAULT_FWHM_WINDOW
}

impl Default for FwhmConfig {
    fn default() -> Self {
        Self {
            method: FwhmMethod::default(),
            window: DEFAULT_FWHM_WINDOW,
            subtract_background: true,
        }
    }
}

/// What to do with a blob whose measurement is numerically degenerate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Drop the blob and keep going.
    #[default]
    Skip,
    /// Abort detection with the blob's error.
    Fail,
}

/// Configuration for star detection in a single image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Median-replace hot/cold pixels before anything else.
    #[serde(default)]
    pub bad_pixels: Option<BadPixelConfig>,
    /// Gaussian blur sigma for noise suppression before thresholding.
    #[serde(default)]
    pub blur_sigma: Option<f32>,
    /// Subtract the image-level sky estimate before thresholding.
    #[serde(default = "default_true")]
    pub subtract_background: bool,
    #[serde(default)]
    pub threshold: ThresholdMethod,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub centroid: CentroidConfig,
    #[serde(default)]
    pub hfd: HfdConfig,
    #[serde(default)]
    pub fwhm: FwhmConfig,
    #[serde(default)]
    pub degenerate: DegeneratePolicy,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            bad_pixels: None,
            blur_sigma: None,
            subtract_background: true,
            threshold: ThresholdMethod::default(),
            cluster: ClusterConfig::default(),
            centroid: CentroidConfig::default(),
            hfd: HfdConfig::default(),
            fwhm: FwhmConfig::default(),
            degenerate: DegeneratePolicy::default(),
        }
    }
}
