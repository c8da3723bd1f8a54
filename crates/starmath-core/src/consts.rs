/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum blob count to measure stars in parallel.
pub const PARALLEL_BLOB_THRESHOLD: usize = 8;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-10;

/// Number of histogram bins used by the Otsu and max-entropy thresholders.
pub const DEFAULT_HISTOGRAM_BINS: usize = 256;

/// Default sigma multiplier for MeanPlusSigma thresholding.
pub const DEFAULT_SIGMA_MULTIPLIER: f32 = 3.0;

/// Neighbourhood radius for clustering. 1 is plain 8-connectivity.
pub const DEFAULT_CLUSTER_RADIUS: usize = 1;

/// Blobs with fewer pixels are treated as noise speckles.
pub const DEFAULT_MIN_STAR_PIXELS: usize = 3;

/// Pixels added around a blob's bounds when centroiding.
pub const DEFAULT_CENTROID_PADDING: usize = 3;

/// Outer diameter (pixels) of the circular HFD measurement window.
pub const DEFAULT_HFD_OUTER_DIAMETER: usize = 25;

/// Classic HFD scale: HFD = 2 * sum(I * d) / sum(I).
pub const DEFAULT_HFD_SCALE: f64 = 2.0;

/// Largest HFD a window can physically report, as a fraction of its diameter.
/// A flat window yields 2/3 of the diameter; real stars sit well below
/// 1 / (2 * sqrt(2)).
pub const MAX_HFD_DIAMETER_FRACTION: f64 = 0.353_553;

/// Side length (pixels) of the square FWHM profile window.
pub const DEFAULT_FWHM_WINDOW: usize = 25;

/// FWHM of a Gaussian in units of sigma: 2 * sqrt(2 * ln 2).
pub const GAUSSIAN_FWHM_FACTOR: f64 = 2.354_820_045;

/// Width of the border strip used for the image-level background estimate.
pub const BACKGROUND_BORDER_STRIP_WIDTH: usize = 8;

/// Target background level of the midtone-balance stretch.
pub const DEFAULT_TARGET_BACKGROUND: f32 = 0.25;

/// Shadows are clipped this many MADs below the median.
pub const SHADOWS_CLIPPING_MADS: f32 = 2.8;

/// Floor for the MAD so a perfectly flat image still stretches.
pub const MIN_MAD: f32 = 0.001;

/// Absolute deviation from the local median that marks a pixel as bad.
pub const DEFAULT_BAD_PIXEL_THRESHOLD: f32 = 500.0;

/// Default median filter core size for bad pixel interpolation.
pub const DEFAULT_BAD_PIXEL_CORE_SIZE: usize = 3;

/// Default border (pixels) added around each star when cropping star tiles.
pub const DEFAULT_STAR_CROP_BORDER: i32 = 3;
