use crate::consts::MAX_HFD_DIAMETER_FRACTION;
use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;
use crate::geometry::{Point, Rect, Size};

use super::config::HfdConfig;

/// Half flux diameter of the star at `center`.
///
/// `HFD = k * sum(I * d) / sum(I)` over the pixels of a circular window of
/// `outer_diameter`, where `d` is the distance of the pixel center from
/// `center` and `k` is the configured scale constant. With background
/// subtraction enabled `I = max(v - background, 0)`. The window is clipped to
/// the image.
pub fn hfd(
    image: &Image,
    center: Point<f64>,
    background: f32,
    config: &HfdConfig,
) -> Result<f64> {
    if config.outer_diameter == 0 {
        return Err(StarmathError::invalid_parameter(
            Component::Hfd,
            "outer diameter must be positive",
        ));
    }
    let radius = config.outer_diameter as f64 / 2.0;
    let bg = if config.subtract_background {
        background
    } else {
        0.0
    };

    let reach = radius.ceil() as i32 + 1;
    let window = Rect::from_center_point(center.round(), Size::square(2 * reach + 1));
    let Some(window) = window.intersect(&image.bounds()) else {
        return Err(StarmathError::degenerate_star(
            Component::Hfd,
            format!("center ({:.2}, {:.2}) lies outside the image", center.x, center.y),
        ));
    };

    let mut sum = 0.0f64;
    let mut sum_dist = 0.0f64;
    for y in window.y..window.bottom() {
        for x in window.x..window.right() {
            let d = (x as f64 - center.x).hypot(y as f64 - center.y);
            if d > radius {
                continue;
            }
            let v = (image.data[[y as usize, x as usize]] - bg).max(0.0) as f64;
            sum += v;
            sum_dist += v * d;
        }
    }

    if !(sum > 0.0) {
        return Err(StarmathError::degenerate_star(
            Component::Hfd,
            format!("zero flux around ({:.2}, {:.2})", center.x, center.y),
        ));
    }

    let value = config.scale_constant * sum_dist / sum;
    if value > max_hfd_limit(config.outer_diameter) {
        tracing::debug!(hfd = value, "HFD close to window size; star may be clipped");
    }
    Ok(value)
}

/// Largest plausible HFD for a window of `outer_diameter` pixels.
pub fn max_hfd_limit(outer_diameter: usize) -> f64 {
    MAX_HFD_DIAMETER_FRACTION * outer_diameter as f64
}
