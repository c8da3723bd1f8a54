use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BAD_PIXEL_CORE_SIZE, DEFAULT_BAD_PIXEL_THRESHOLD, PARALLEL_PIXEL_THRESHOLD,
};
use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;
use crate::stats::median;

/// Which deviations from the local median count as defects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadPixelDirection {
    /// Pixels brighter than the median (hot pixels).
    Hot,
    /// Pixels darker than the median (cold/dead pixels).
    Cold,
    #[default]
    Both,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BadPixelConfig {
    /// Absolute deviation from the local median, in sample units.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Median filter side length: 3, 5, 7 or 9.
    #[serde(default = "default_core_size")]
    pub core_size: usize,
    #[serde(default)]
    pub direction: BadPixelDirection,
}

fn default_threshold() -> f32 {
    DEFAULT_BAD_PIXEL_THRESHOLD
}
fn default_core_size() -> usize {
    DEFAULT_BAD_PIXEL_CORE_SIZE
}

impl Default for BadPixelConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BAD_PIXEL_THRESHOLD,
            core_size: DEFAULT_BAD_PIXEL_CORE_SIZE,
            direction: BadPixelDirection::default(),
        }
    }
}

impl BadPixelConfig {
    fn validate(&self) -> Result<()> {
        if !matches!(self.core_size, 3 | 5 | 7 | 9) {
            return Err(StarmathError::invalid_parameter(
                Component::BadPixels,
                format!("core size must be 3, 5, 7 or 9, got {}", self.core_size),
            ));
        }
        if !(self.threshold >= 0.0) {
            return Err(StarmathError::invalid_parameter(
                Component::BadPixels,
                format!("threshold must be non-negative, got {}", self.threshold),
            ));
        }
        Ok(())
    }

    fn is_bad(&self, value: f32, median: f32) -> bool {
        match self.direction {
            BadPixelDirection::Hot => value - median > self.threshold,
            BadPixelDirection::Cold => median - value > self.threshold,
            BadPixelDirection::Both => (value - median).abs() > self.threshold,
        }
    }
}

/// Replace defective pixels with the median of their neighbourhood.
///
/// The neighbourhood includes the pixel itself; image borders are extended by
/// clamping. Medians are taken from the input, so corrections never feed into
/// each other.
pub fn interpolate_bad_pixels(image: &Image, config: &BadPixelConfig) -> Result<Image> {
    config.validate()?;
    let (h, w) = image.data.dim();
    let radius = config.core_size / 2;

    let correct_row = |row: usize| -> (Vec<f32>, usize) {
        let mut window = Vec::with_capacity(config.core_size * config.core_size);
        let mut fixed = 0;
        let out = (0..w)
            .map(|col| {
                window.clear();
                for k in 0..config.core_size {
                    let r = (row + k).saturating_sub(radius).min(h - 1);
                    for l in 0..config.core_size {
                        let c = (col + l).saturating_sub(radius).min(w - 1);
                        window.push(image.data[[r, c]]);
                    }
                }
                let v = image.data[[row, col]];
                let m = median(&mut window).unwrap_or(v);
                if config.is_bad(v, m) {
                    fixed += 1;
                    m
                } else {
                    v
                }
            })
            .collect();
        (out, fixed)
    };

    let rows: Vec<(Vec<f32>, usize)> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(correct_row).collect()
    } else {
        (0..h).map(correct_row).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    let mut total_fixed = 0;
    for (row, (row_data, fixed)) in rows.into_iter().enumerate() {
        total_fixed += fixed;
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }

    tracing::debug!(pixels = total_fixed, "Bad pixels interpolated");
    Ok(Image::new(result, image.bit_depth))
}
