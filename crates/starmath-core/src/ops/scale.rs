use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleDirection {
    /// Multiply the image size by the factor.
    Up,
    /// Divide the image size by the factor.
    Down,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Area averaging when shrinking, bilinear when enlarging.
    #[default]
    Auto,
    NearestNeighbor,
    Bilinear,
    AreaAverage,
}

/// Output/input size ratio for a direction and factor.
pub fn effective_ratio(direction: ScaleDirection, factor: f32) -> Result<f64> {
    if !(factor > 0.0 && factor.is_finite()) {
        return Err(StarmathError::invalid_parameter(
            Component::Scale,
            format!("scale factor must be positive, got {factor}"),
        ));
    }
    Ok(match direction {
        ScaleDirection::Up => factor as f64,
        ScaleDirection::Down => 1.0 / factor as f64,
    })
}

/// Resize by `factor` in `direction`. The output is
/// `floor(w * ratio) x floor(h * ratio)`, at least 1x1.
pub fn scale(
    image: &Image,
    direction: ScaleDirection,
    factor: f32,
    interpolation: Interpolation,
) -> Result<Image> {
    let ratio = effective_ratio(direction, factor)?;
    if image.is_empty() {
        return Err(StarmathError::invalid_region(
            Component::Scale,
            "image has zero area",
        ));
    }
    let (h, w) = image.data.dim();
    let out_w = ((w as f64 * ratio).floor() as usize).max(1);
    let out_h = ((h as f64 * ratio).floor() as usize).max(1);

    let method = match interpolation {
        Interpolation::Auto if ratio < 1.0 => Interpolation::AreaAverage,
        Interpolation::Auto => Interpolation::Bilinear,
        other => other,
    };

    let data = match method {
        Interpolation::NearestNeighbor => resample(&image.data, out_w, out_h, nearest_taps),
        Interpolation::Bilinear => resample(&image.data, out_w, out_h, linear_taps),
        Interpolation::AreaAverage | Interpolation::Auto => {
            resample(&image.data, out_w, out_h, area_taps)
        }
    };
    tracing::debug!(
        from = ?(w, h),
        to = ?(out_w, out_h),
        method = ?method,
        "Image scaled"
    );
    Ok(Image::new(data, image.bit_depth))
}

/// Source sample weights contributing to one output sample along one axis.
type Taps = Vec<(usize, f64)>;

/// Separable resampling: per-axis tap tables, applied as an outer product.
fn resample(
    data: &Array2<f32>,
    out_w: usize,
    out_h: usize,
    taps: fn(usize, usize, usize) -> Taps,
) -> Array2<f32> {
    let (h, w) = data.dim();
    let col_taps: Vec<Taps> = (0..out_w).map(|i| taps(i, w, out_w)).collect();
    let row_taps: Vec<Taps> = (0..out_h).map(|i| taps(i, h, out_h)).collect();

    Array2::from_shape_fn((out_h, out_w), |(row, col)| {
        let mut sum = 0.0f64;
        for &(sr, wr) in &row_taps[row] {
            for &(sc, wc) in &col_taps[col] {
                sum += data[[sr, sc]] as f64 * wr * wc;
            }
        }
        sum as f32
    })
}

/// Center of output pixel `i` in source coordinates.
fn source_center(i: usize, src: usize, dst: usize) -> f64 {
    (i as f64 + 0.5) * src as f64 / dst as f64 - 0.5
}

fn nearest_taps(i: usize, src: usize, dst: usize) -> Taps {
    let s = source_center(i, src, dst).round().clamp(0.0, (src - 1) as f64);
    vec![(s as usize, 1.0)]
}

fn linear_taps(i: usize, src: usize, dst: usize) -> Taps {
    let s = source_center(i, src, dst).clamp(0.0, (src - 1) as f64);
    let lo = s.floor() as usize;
    let hi = (lo + 1).min(src - 1);
    let frac = s - lo as f64;
    if hi == lo || frac == 0.0 {
        vec![(lo, 1.0)]
    } else {
        vec![(lo, 1.0 - frac), (hi, frac)]
    }
}

/// Coverage-weighted average of the source interval under output pixel `i`.
fn area_taps(i: usize, src: usize, dst: usize) -> Taps {
    let step = src as f64 / dst as f64;
    let start = i as f64 * step;
    let end = ((i + 1) as f64 * step).min(src as f64);
    let mut taps = Vec::new();
    let mut s = start.floor() as usize;
    while (s as f64) < end && s < src {
        let overlap = (end.min(s as f64 + 1.0) - start.max(s as f64)).max(0.0);
        if overlap > 0.0 {
            taps.push((s, overlap / (end - start)));
        }
        s += 1;
    }
    if taps.is_empty() {
        taps.push((s.min(src - 1), 1.0));
    }
    taps
}
