use ndarray::{Array2, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;
use crate::geometry::Rect;
use crate::stats::{mean_stddev, min_max, region_values, Histogram};

use super::config::ThresholdMethod;

/// Binary foreground/background mask, same shape as the image.
pub type Mask = Array2<bool>;

/// Turns an intensity image into a foreground/background mask.
pub trait Thresholder {
    fn name(&self) -> &'static str;

    /// Threshold value for `region` (whole image if `None`).
    fn threshold(&self, image: &Image, region: Option<&Rect<i32>>) -> Result<f32>;

    /// Pixels inside `region` brighter than the threshold are foreground.
    /// Pixels outside `region` are background.
    fn compute(&self, image: &Image, region: Option<&Rect<i32>>) -> Result<Mask> {
        let t = self.threshold(image, region)?;
        let area = match region {
            Some(r) => clip_region(image, r)?,
            None => image.bounds(),
        };
        Ok(apply_threshold(image, &area, t))
    }
}

impl Thresholder for ThresholdMethod {
    fn name(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Otsu { .. } => "otsu",
            Self::MaxEntropy { .. } => "max-entropy",
            Self::MeanPlusSigma { .. } => "mean+sigma",
            Self::Fixed(_) => "fixed",
        }
    }

    fn threshold(&self, image: &Image, region: Option<&Rect<i32>>) -> Result<f32> {
        let values = match region {
            Some(r) => region_values(image, &clip_region(image, r)?),
            None => {
                if image.is_empty() {
                    return Err(StarmathError::invalid_region(
                        Component::Thresholder,
                        "image has zero area",
                    ));
                }
                image.data.iter().copied().collect()
            }
        };

        let t = match self {
            Self::Mean => mean_stddev(values.iter()).0 as f32,
            Self::MeanPlusSigma { sigma } => {
                let (mean, std) = mean_stddev(values.iter());
                (mean + *sigma as f64 * std) as f32
            }
            Self::Fixed(v) => *v,
            Self::Otsu { bins } => {
                histogram_threshold(&values, *bins, otsu_bin)?
            }
            Self::MaxEntropy { bins } => {
                histogram_threshold(&values, *bins, max_entropy_bin)?
            }
        };
        tracing::debug!(method = self.name(), threshold = t, "Threshold computed");
        Ok(t)
    }
}

/// Validate `region` against the image and clip it to the image bounds.
fn clip_region(image: &Image, region: &Rect<i32>) -> Result<Rect<i32>> {
    if region.is_empty() {
        return Err(StarmathError::invalid_region(
            Component::Thresholder,
            format!("region {region:?} has zero area"),
        ));
    }
    region.intersect(&image.bounds()).ok_or_else(|| {
        StarmathError::invalid_region(
            Component::Thresholder,
            format!("region {region:?} lies outside the image"),
        )
    })
}

/// Foreground = pixels inside `area` strictly brighter than `t`.
pub(crate) fn apply_threshold(image: &Image, area: &Rect<i32>, t: f32) -> Mask {
    let (x0, y0) = (area.x as usize, area.y as usize);
    let (x1, y1) = (area.right() as usize, area.bottom() as usize);
    let mut mask = Mask::from_elem(image.data.dim(), false);
    let zip = Zip::indexed(&mut mask).and(&image.data);
    let classify = |(row, col): (usize, usize), m: &mut bool, &v: &f32| {
        *m = row >= y0 && row < y1 && col >= x0 && col < x1 && v > t;
    };
    if image.data.len() >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(classify);
    } else {
        zip.for_each(classify);
    }
    mask
}

/// Run a histogram split policy and map the winning bin back to a sample
/// value: the largest sample that falls in the background class. A flat
/// region yields its maximum, so nothing is foreground.
fn histogram_threshold(
    values: &[f32],
    bins: usize,
    split: fn(&Histogram) -> Option<usize>,
) -> Result<f32> {
    if bins < 2 {
        return Err(StarmathError::invalid_parameter(
            Component::Thresholder,
            format!("histogram needs at least 2 bins, got {bins}"),
        ));
    }
    let Some((_, max)) = min_max(values) else {
        return Err(StarmathError::invalid_region(
            Component::Thresholder,
            "region has no samples",
        ));
    };

    let hist = Histogram::from_values(values, bins);
    let Some(best) = split(&hist) else {
        return Ok(max);
    };

    let t = values
        .iter()
        .copied()
        .filter(|&v| hist.bin_index(v) <= best)
        .fold(f32::NEG_INFINITY, f32::max);
    Ok(if t.is_finite() { t } else { max })
}

/// Otsu's method: the bin maximizing between-class variance. `None` if the
/// histogram has a single occupied bin.
fn otsu_bin(hist: &Histogram) -> Option<usize> {
    let (first, last) = hist.occupied_range()?;
    if first == last {
        return None;
    }

    let counts = hist.counts();
    let total = hist.total() as f64;
    let sum_all: f64 = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;
    let mut best_variance = -1.0f64;
    let mut best_bin = first;

    for (i, &count) in counts.iter().enumerate().take(last) {
        weight_bg += count as f64;
        sum_bg += i as f64 * count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between_variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);

        if between_variance > best_variance {
            best_variance = between_variance;
            best_bin = i;
        }
    }

    Some(best_bin)
}

/// Kapur's maximum entropy method. `None` if the histogram has a single
/// occupied bin.
fn max_entropy_bin(hist: &Histogram) -> Option<usize> {
    let (first, last) = hist.occupied_range()?;
    if first == last {
        return None;
    }

    let total = hist.total() as f64;
    let p: Vec<f64> = hist.counts().iter().map(|&c| c as f64 / total).collect();
    let plogp = |x: f64| if x > 0.0 { x * x.ln() } else { 0.0 };

    // Class entropy with mass P and sum(p ln p) = S is ln(P) - S / P.
    let total_plogp: f64 = p.iter().map(|&x| plogp(x)).sum();
    let mut mass_bg = 0.0f64;
    let mut plogp_bg = 0.0f64;
    let mut best_entropy = f64::NEG_INFINITY;
    let mut best_bin = first;

    for (t, &pt) in p.iter().enumerate().take(last).skip(first) {
        mass_bg += pt;
        plogp_bg += plogp(pt);
        let mass_fg = 1.0 - mass_bg;
        if mass_bg <= 0.0 || mass_fg <= 0.0 {
            continue;
        }
        let entropy_bg = mass_bg.ln() - plogp_bg / mass_bg;
        let entropy_fg = mass_fg.ln() - (total_plogp - plogp_bg) / mass_fg;
        let entropy = entropy_bg + entropy_fg;
        if entropy > best_entropy {
            best_entropy = entropy;
            best_bin = t;
        }
    }

    Some(best_bin)
}
