use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;
use crate::geometry::{Point, Rect};
use crate::stats::ring_background;

use super::components::StarBlob;
use super::config::{CentroidConfig, CentroidMethod};

/// Sub-pixel star position estimator.
pub trait Centroider {
    fn name(&self) -> &'static str;

    /// Sub-pixel centroid of `blob`, always inside the blob's bounds.
    fn centroid(&self, image: &Image, blob: &StarBlob) -> Result<Point<f64>>;
}

impl Centroider for CentroidConfig {
    fn name(&self) -> &'static str {
        self.method.name()
    }

    fn centroid(&self, image: &Image, blob: &StarBlob) -> Result<Point<f64>> {
        weighted_centroid(image, blob, self.method, self.window_padding)
    }
}

impl Centroider for CentroidMethod {
    fn name(&self) -> &'static str {
        match self {
            Self::CenterOfGravity => "center-of-gravity",
            Self::IntensityWeighted => "intensity-weighted",
        }
    }

    fn centroid(&self, image: &Image, blob: &StarBlob) -> Result<Point<f64>> {
        CentroidConfig {
            method: *self,
            ..Default::default()
        }
        .centroid(image, blob)
    }
}

/// Background-subtracted weighted mean position over the padded blob window.
///
/// The background is the median of the one-pixel ring around the window.
fn weighted_centroid(
    image: &Image,
    blob: &StarBlob,
    method: CentroidMethod,
    padding: usize,
) -> Result<Point<f64>> {
    let bounds = blob.bounds();
    let window = bounds
        .grow(padding as i32)
        .intersect(&image.bounds())
        .ok_or_else(|| {
            StarmathError::degenerate_blob(
                Component::Centroider,
                format!("blob {bounds:?} lies outside the image"),
            )
        })?;
    let background = ring_background(image, &window, 1).median;

    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut sum_weight = 0.0f64;

    for y in window.y..window.bottom() {
        for x in window.x..window.right() {
            let v = (image.data[[y as usize, x as usize]] - background).max(0.0) as f64;
            let weight = match method {
                CentroidMethod::CenterOfGravity => v,
                CentroidMethod::IntensityWeighted => v * v,
            };
            sum_x += x as f64 * weight;
            sum_y += y as f64 * weight;
            sum_weight += weight;
        }
    }

    if !(sum_weight > 0.0) {
        return Err(StarmathError::degenerate_blob(
            Component::Centroider,
            format!("no flux above background {background} in {window:?}"),
        ));
    }

    Ok(clamp_to(
        Point::new(sum_x / sum_weight, sum_y / sum_weight),
        &bounds,
    ))
}

/// Clamp a position into the pixel extent of `rect` (inclusive).
fn clamp_to(p: Point<f64>, rect: &Rect<i32>) -> Point<f64> {
    Point::new(
        p.x.clamp(rect.x as f64, (rect.right() - 1) as f64),
        p.y.clamp(rect.y as f64, (rect.bottom() - 1) as f64),
    )
}
