use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TARGET_BACKGROUND, EPSILON, MIN_MAD, SHADOWS_CLIPPING_MADS};
use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;
use crate::stats::{median, median_absolute_deviation, min_max};

/// Maps an image of any depth to an 8-bit display image.
pub trait Stretcher {
    fn name(&self) -> &'static str;
    fn stretch(&self, image: &Image) -> Result<Image>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StretchMethod {
    /// Automatic midtone transfer stretch: shadows clipped below the
    /// histogram peak, midtones chosen so the median lands on
    /// `target_background`.
    MidtoneBalance {
        #[serde(default = "default_target_background")]
        target_background: f32,
    },
    /// Linear stretch: maps [black_point, white_point] to [0, 255].
    Linear { black_point: f32, white_point: f32 },
}

fn default_target_background() -> f32 {
    DEFAULT_TARGET_BACKGROUND
}

impl Default for StretchMethod {
    fn default() -> Self {
        Self::MidtoneBalance {
            target_background: DEFAULT_TARGET_BACKGROUND,
        }
    }
}

impl Stretcher for StretchMethod {
    fn name(&self) -> &'static str {
        match self {
            Self::MidtoneBalance { .. } => "midtone-balance",
            Self::Linear { .. } => "linear",
        }
    }

    fn stretch(&self, image: &Image) -> Result<Image> {
        if image.is_empty() {
            return Err(StarmathError::invalid_region(
                Component::Stretcher,
                "image has zero area",
            ));
        }
        let data = match *self {
            Self::MidtoneBalance { target_background } => {
                if !(target_background > 0.0 && target_background < 1.0) {
                    return Err(StarmathError::invalid_parameter(
                        Component::Stretcher,
                        format!("target background must lie in (0, 1), got {target_background}"),
                    ));
                }
                let normalized = normalize(image);
                let (m, shadows) = midtones_balance(&normalized, target_background);
                tracing::debug!(midtones = m, shadows, "Midtone balance");
                normalized.mapv(|v| 255.0 * midtone_transfer(v, m, shadows, 1.0))
            }
            Self::Linear {
                black_point,
                white_point,
            } => {
                let range = white_point - black_point;
                let range = if range.abs() < EPSILON { 1.0 } else { range };
                image
                    .data
                    .mapv(|v| 255.0 * ((v - black_point) / range).clamp(0.0, 1.0))
            }
        };
        Ok(Image::new(data.mapv(|v| v.round()), 8))
    }
}

/// Midtone transfer function on `[lo, hi]`, defined for `0 <= x <= 1`.
pub fn midtone_transfer(x: f32, m: f32, lo: f32, hi: f32) -> f32 {
    if x <= lo {
        return 0.0;
    }
    if x >= hi {
        return 1.0;
    }
    let xp = (x - lo) / (hi - lo);
    ((m - 1.0) * xp) / ((2.0 * m - 1.0) * xp - m)
}

/// Min-max normalization to [0, 1]. A flat image maps to 0.
fn normalize(image: &Image) -> ndarray::Array2<f32> {
    let (lo, hi) = min_max(image.data.iter()).unwrap_or((0.0, 0.0));
    let range = hi - lo;
    if range < EPSILON {
        return image.data.mapv(|_| 0.0);
    }
    image.data.mapv(|v| (v - lo) / range)
}

/// Midtones balance `m` and shadows clipping point of a normalized image.
fn midtones_balance(normalized: &ndarray::Array2<f32>, target_background: f32) -> (f32, f32) {
    let mut values: Vec<f32> = normalized.iter().copied().collect();
    let med = median(&mut values).unwrap_or(0.0);
    let mad = match median_absolute_deviation(&values, med) {
        Some(mad) if mad > 0.0 => mad,
        _ => MIN_MAD,
    };
    let shadows = (med - SHADOWS_CLIPPING_MADS * mad).max(0.0);
    let m = midtone_transfer(med - shadows, target_background, 0.0, 1.0);
    (m, shadows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mtf_fixed_points() {
        assert_eq!(midtone_transfer(0.0, 0.3, 0.0, 1.0), 0.0);
        assert_eq!(midtone_transfer(1.0, 0.3, 0.0, 1.0), 1.0);
        // The midtones balance maps itself to one half.
        assert!((midtone_transfer(0.3, 0.3, 0.0, 1.0) - 0.5).abs() < 1e-6);
    }
}
