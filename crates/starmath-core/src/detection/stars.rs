use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bad_pixels::interpolate_bad_pixels;
use crate::consts::PARALLEL_BLOB_THRESHOLD;
use crate::error::Result;
use crate::filters::{gaussian_blur, subtract_level};
use crate::frame::Image;
use crate::geometry::{Point, Rect};
use crate::stats::{border_median, ring_background, star_snr};

use super::centroid::Centroider;
use super::components::{find_clusters, StarBlob};
use super::config::{DegeneratePolicy, DetectionConfig};
use super::fwhm::fwhm;
use super::hfd::hfd;
use super::threshold::{apply_threshold, Thresholder};

/// A detected and measured star.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Sub-pixel center, inside `bounds`.
    pub centroid: Point<f64>,
    /// Bounding box of the source blob.
    pub bounds: Rect<i32>,
    pub pixel_count: usize,
    /// Brightest blob sample.
    pub peak: f32,
    /// Local sky level around the blob.
    pub background: f32,
    /// Sky noise (standard deviation) around the blob.
    pub noise: f32,
    /// Background-subtracted sum over the blob pixels.
    pub flux: f64,
    pub hfd: f64,
    pub fwhm: f64,
    pub snr: f64,
}

impl Star {
    /// Same star in a coordinate system shifted by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Star {
        Star {
            centroid: self.centroid.translated(dx as f64, dy as f64),
            bounds: self.bounds.translated(dx, dy),
            ..self.clone()
        }
    }

    /// Same star after resizing the image by `ratio` (pixel-center mapping).
    pub fn scaled(&self, ratio: f64) -> Star {
        let map = |v: f64| (v + 0.5) * ratio - 0.5;
        let x0 = (self.bounds.x as f64 * ratio).floor() as i32;
        let y0 = (self.bounds.y as f64 * ratio).floor() as i32;
        let x1 = (self.bounds.right() as f64 * ratio).ceil() as i32;
        let y1 = (self.bounds.bottom() as f64 * ratio).ceil() as i32;
        Star {
            centroid: Point::new(map(self.centroid.x), map(self.centroid.y)),
            bounds: Rect::new(x0, y0, (x1 - x0).max(1), (y1 - y0).max(1)),
            hfd: self.hfd * ratio,
            fwhm: self.fwhm * ratio,
            ..self.clone()
        }
    }
}

/// Everything one detection pass found.
#[derive(Clone, Debug, PartialEq)]
pub struct StarField {
    /// Stars in row-major order of their first blob pixel.
    pub stars: Vec<Star>,
    /// Image-level sky estimate (border median).
    pub background: f32,
    /// Threshold separating star pixels from the sky.
    pub threshold: f32,
}

/// Detect and measure the stars in `image`.
///
/// Pipeline: bad pixel interpolation -> background subtraction -> optional
/// blur -> threshold -> cluster -> centroid, HFD and FWHM per blob. The
/// input image is not modified. An image without stars yields an empty list.
pub fn detect(image: &Image, config: &DetectionConfig) -> Result<StarField> {
    let corrected = match &config.bad_pixels {
        Some(bp) => Some(interpolate_bad_pixels(image, bp)?),
        None => None,
    };
    let measured_on = corrected.as_ref().unwrap_or(image);

    let background = border_median(measured_on);
    let subtracted = config
        .subtract_background
        .then(|| subtract_level(measured_on, background));
    let leveled = subtracted.as_ref().unwrap_or(measured_on);

    let blurred = config
        .blur_sigma
        .filter(|&s| s > 0.0)
        .map(|s| gaussian_blur(leveled, s));
    let thresholded_on = blurred.as_ref().unwrap_or(leveled);

    let threshold = config.threshold.threshold(thresholded_on, None)?;
    let mask = apply_threshold(thresholded_on, &thresholded_on.bounds(), threshold);
    let blobs = find_clusters(&mask, &config.cluster);

    let results: Vec<Result<Star>> = if blobs.len() >= PARALLEL_BLOB_THRESHOLD {
        blobs
            .par_iter()
            .map(|blob| measure_star(measured_on, blob, config))
            .collect()
    } else {
        blobs
            .iter()
            .map(|blob| measure_star(measured_on, blob, config))
            .collect()
    };

    let mut stars = Vec::with_capacity(results.len());
    let mut skipped = 0usize;
    for (blob, result) in blobs.iter().zip(results) {
        match result {
            Ok(star) => stars.push(star),
            Err(e) if e.is_degenerate() && config.degenerate == DegeneratePolicy::Skip => {
                debug!(bounds = ?blob.bounds(), error = %e, "Skipping degenerate blob");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        stars = stars.len(),
        skipped,
        threshold,
        background,
        method = config.threshold.name(),
        "Star detection complete"
    );
    Ok(StarField {
        stars,
        background,
        threshold,
    })
}

/// Detect and measure the stars in `image`; see [`detect`].
pub fn detect_stars(image: &Image, config: &DetectionConfig) -> Result<Vec<Star>> {
    detect(image, config).map(|field| field.stars)
}

/// Centroid, photometry and shape of one blob.
pub fn measure_star(image: &Image, blob: &StarBlob, config: &DetectionConfig) -> Result<Star> {
    let centroid = config.centroid.centroid(image, blob)?;
    let window = blob.bounds().grow(config.centroid.window_padding as i32);
    let ring = ring_background(image, &window, 1);

    let mut peak = f32::NEG_INFINITY;
    let mut flux = 0.0f64;
    for p in blob.pixels() {
        let v = image.data[[p.y as usize, p.x as usize]];
        peak = peak.max(v);
        flux += (v - ring.median).max(0.0) as f64;
    }

    let hfd = hfd(image, centroid, ring.median, &config.hfd)?;
    let fwhm = fwhm(image, centroid, ring.median, &config.fwhm)?.value;
    let snr = star_snr((peak - ring.median) as f64, ring.stddev as f64);

    Ok(Star {
        centroid,
        bounds: blob.bounds(),
        pixel_count: blob.len(),
        peak,
        background: ring.median,
        noise: ring.stddev,
        flux,
        hfd,
        fwhm,
        snr,
    })
}
