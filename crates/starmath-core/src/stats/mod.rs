pub mod average;
pub mod background;
pub mod histogram;
pub mod snr;

pub use average::average;
pub use background::{border_median, ring_background, RingBackground};
pub use histogram::Histogram;
pub use snr::{snr, star_snr};

use crate::frame::Image;
use crate::geometry::Rect;

/// Mean and population standard deviation.
pub fn mean_stddev<'a>(values: impl IntoIterator<Item = &'a f32>) -> (f64, f64) {
    // Welford, so a single pass is numerically stable on large frames.
    let mut n = 0u64;
    let mut mean = 0.0f64;
    let mut m2 = 0.0f64;
    for &v in values {
        n += 1;
        let delta = v as f64 - mean;
        mean += delta / n as f64;
        m2 += delta * (v as f64 - mean);
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    (mean, (m2 / n as f64).sqrt())
}

pub fn mean<'a>(values: impl IntoIterator<Item = &'a f32>) -> f64 {
    mean_stddev(values).0
}

/// Median of `values`, reordering the slice. Even counts average the two
/// middle samples.
pub fn median(values: &mut [f32]) -> Option<f32> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        return Some(upper);
    }
    let lower_max = lower.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    Some((lower_max + upper) / 2.0)
}

/// Median absolute deviation around `center`.
pub fn median_absolute_deviation(values: &[f32], center: f32) -> Option<f32> {
    let mut deviations: Vec<f32> = values.iter().map(|v| (v - center).abs()).collect();
    median(&mut deviations)
}

pub fn min_max<'a>(values: impl IntoIterator<Item = &'a f32>) -> Option<(f32, f32)> {
    values.into_iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Samples inside `region` clipped to the image, row-major.
pub fn region_values(image: &Image, region: &Rect<i32>) -> Vec<f32> {
    let Some(clipped) = region.intersect(&image.bounds()) else {
        return Vec::new();
    };
    let mut values = Vec::with_capacity(clipped.area() as usize);
    for y in clipped.y..clipped.bottom() {
        for x in clipped.x..clipped.right() {
            values.push(image.data[[y as usize, x as usize]]);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut [5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_mean_stddev() {
        let (m, s) = mean_stddev(&[2.0f32, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((m - 5.0).abs() < 1e-12);
        assert!((s - 2.0).abs() < 1e-12);
    }
}
