use serde::{Deserialize, Serialize};

use crate::consts::GAUSSIAN_FWHM_FACTOR;
use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;
use crate::geometry::Point;

use super::config::{FwhmConfig, FwhmMethod};

/// FWHM along the row and column through the centroid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FwhmMeasurement {
    pub horizontal: f64,
    pub vertical: f64,
    /// Mean of both axes.
    pub value: f64,
}

/// Full width at half maximum of the star at `center`.
///
/// Flat-topped (saturated) profiles give a best-effort width; only a profile
/// with no signal above background is an error.
pub fn fwhm(
    image: &Image,
    center: Point<f64>,
    background: f32,
    config: &FwhmConfig,
) -> Result<FwhmMeasurement> {
    let bg = if config.subtract_background {
        background
    } else {
        0.0
    };
    let pixel = center.round();
    if image.get(pixel.x, pixel.y).is_none() {
        return Err(StarmathError::degenerate_star(
            Component::Fwhm,
            format!("center ({:.2}, {:.2}) lies outside the image", center.x, center.y),
        ));
    }
    let half = (config.window.max(3) / 2) as i32;

    let row: Vec<f64> = (pixel.x - half..=pixel.x + half)
        .filter_map(|x| image.get(x, pixel.y))
        .map(|v| (v - bg) as f64)
        .collect();
    let col: Vec<f64> = (pixel.y - half..=pixel.y + half)
        .filter_map(|y| image.get(pixel.x, y))
        .map(|v| (v - bg) as f64)
        .collect();

    let horizontal = profile_width(&row, config.method)?;
    let vertical = profile_width(&col, config.method)?;
    Ok(FwhmMeasurement {
        horizontal,
        vertical,
        value: (horizontal + vertical) / 2.0,
    })
}

/// Width of a 1-D background-subtracted profile at half its peak.
pub fn profile_width(profile: &[f64], method: FwhmMethod) -> Result<f64> {
    let Some((peak_idx, peak)) = profile
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
    else {
        return Err(StarmathError::degenerate_star(Component::Fwhm, "empty profile"));
    };
    if !(peak > 0.0) {
        return Err(StarmathError::degenerate_star(
            Component::Fwhm,
            "no pixel above background",
        ));
    }

    let crossing = half_max_crossing(profile, peak_idx, peak);
    match method {
        FwhmMethod::HalfMaxCrossing => Ok(crossing),
        FwhmMethod::GaussianFit => Ok(gaussian_fit(profile, peak_idx, peak).unwrap_or(crossing)),
    }
}

fn half_max_crossing(profile: &[f64], peak_idx: usize, peak: f64) -> f64 {
    let half = peak / 2.0;

    // Walk outward until the profile drops below half; interpolate between
    // the last sample above and the first below. A profile that never drops
    // reaches the window edge.
    let mut left = 0.0;
    for i in (0..peak_idx).rev() {
        if profile[i] < half {
            let (lo, hi) = (profile[i], profile[i + 1]);
            left = i as f64 + (half - lo) / (hi - lo);
            break;
        }
    }
    let mut right = (profile.len() - 1) as f64;
    for i in peak_idx + 1..profile.len() {
        if profile[i] < half {
            let (hi, lo) = (profile[i - 1], profile[i]);
            right = (i - 1) as f64 + (hi - half) / (hi - lo);
            break;
        }
    }
    right - left
}

/// Fit `ln I = a + b x + c x^2` to the samples above a tenth of the peak
/// contiguous with it. Returns `None` unless the parabola opens downward.
fn gaussian_fit(profile: &[f64], peak_idx: usize, peak: f64) -> Option<f64> {
    let floor = peak * 0.1;
    let mut start = peak_idx;
    while start > 0 && profile[start - 1] > floor {
        start -= 1;
    }
    let mut end = peak_idx;
    while end + 1 < profile.len() && profile[end + 1] > floor {
        end += 1;
    }
    if end - start < 2 {
        return None;
    }

    // Weighted by I^2 so the noisy wings count less than the core.
    let mut m = [[0.0f64; 3]; 3];
    let mut rhs = [0.0f64; 3];
    for (i, &v) in profile.iter().enumerate().take(end + 1).skip(start) {
        let x = i as f64 - peak_idx as f64;
        let w = v * v;
        let y = v.ln();
        let powers = [1.0, x, x * x];
        for r in 0..3 {
            for c in 0..3 {
                m[r][c] += w * powers[r] * powers[c];
            }
            rhs[r] += w * powers[r] * y;
        }
    }

    let [_, _, c] = solve3(m, rhs)?;
    if !(c < 0.0) {
        return None;
    }
    let sigma = (-1.0 / (2.0 * c)).sqrt();
    Some(GAUSSIAN_FWHM_FACTOR * sigma)
}

/// Solve a 3x3 linear system by Gaussian elimination with partial pivoting.
fn solve3(mut m: [[f64; 3]; 3], mut rhs: [f64; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let pivot = (col..3).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot][col].abs() < 1e-12 {
            return None;
        }
        m.swap(col, pivot);
        rhs.swap(col, pivot);
        for row in col + 1..3 {
            let f = m[row][col] / m[col][col];
            for k in col..3 {
                m[row][k] -= f * m[col][k];
            }
            rhs[row] -= f * rhs[col];
        }
    }
    let mut out = [0.0f64; 3];
    for row in (0..3).rev() {
        let mut acc = rhs[row];
        for k in row + 1..3 {
            acc -= m[row][k] * out[k];
        }
        out[row] = acc / m[row][row];
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian_profile(sigma: f64, len: usize) -> Vec<f64> {
        let c = (len / 2) as f64;
        (0..len)
            .map(|i| 100.0 * (-(i as f64 - c).powi(2) / (2.0 * sigma * sigma)).exp())
            .collect()
    }

    #[test]
    fn test_gaussian_fit_is_exact_on_gaussian() {
        let width = profile_width(&gaussian_profile(2.0, 25), FwhmMethod::GaussianFit).unwrap();
        assert!((width - GAUSSIAN_FWHM_FACTOR * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_top_reaches_window_edge() {
        let width = profile_width(&[5.0; 7], FwhmMethod::HalfMaxCrossing).unwrap();
        assert_eq!(width, 6.0);
    }

    #[test]
    fn test_no_signal_is_degenerate() {
        let err = profile_width(&[0.0, -1.0, 0.0], FwhmMethod::HalfMaxCrossing).unwrap_err();
        assert!(err.is_degenerate());
    }
}
