use crate::consts::BACKGROUND_BORDER_STRIP_WIDTH;
use crate::frame::Image;
use crate::geometry::{Point, Rect};

use super::{mean_stddev, median};

/// Local sky level around a region.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RingBackground {
    pub median: f32,
    pub stddev: f32,
    pub samples: usize,
}

/// Image background as the median of the border strip.
pub fn border_median(image: &Image) -> f32 {
    let (h, w) = image.data.dim();
    let strip = BACKGROUND_BORDER_STRIP_WIDTH.min(h / 2).min(w / 2);
    if strip == 0 {
        let mut all: Vec<f32> = image.data.iter().copied().collect();
        return median(&mut all).unwrap_or(0.0);
    }

    let mut border_pixels = Vec::with_capacity(2 * strip * (h + w));
    for row in 0..h {
        for col in 0..w {
            if row < strip || row >= h - strip || col < strip || col >= w - strip {
                border_pixels.push(image.data[[row, col]]);
            }
        }
    }
    median(&mut border_pixels).unwrap_or(0.0)
}

/// Median and spread of the `width`-pixel ring just outside `region`,
/// clipped to the image.
///
/// When the ring falls entirely outside the image the outermost pixels of
/// the region itself are used instead.
pub fn ring_background(image: &Image, region: &Rect<i32>, width: i32) -> RingBackground {
    let bounds = image.bounds();
    let mut ring = collect_ring(image, &region.grow(width.max(1)), region, &bounds);
    if ring.is_empty() {
        ring = collect_ring(image, region, &region.shrink(1), &bounds);
    }
    if ring.is_empty() {
        return RingBackground::default();
    }

    let (_, stddev) = mean_stddev(ring.iter());
    let samples = ring.len();
    let median = median(&mut ring).unwrap_or(0.0);
    RingBackground {
        median,
        stddev: stddev as f32,
        samples,
    }
}

/// Pixels inside `outer` but not inside `inner`, clipped to `bounds`.
fn collect_ring(
    image: &Image,
    outer: &Rect<i32>,
    inner: &Rect<i32>,
    bounds: &Rect<i32>,
) -> Vec<f32> {
    let Some(clipped) = outer.intersect(bounds) else {
        return Vec::new();
    };
    let mut values = Vec::new();
    for y in clipped.y..clipped.bottom() {
        for x in clipped.x..clipped.right() {
            if !inner.is_empty() && inner.contains_point(&Point::new(x, y)) {
                continue;
            }
            values.push(image.data[[y as usize, x as usize]]);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_ring_ignores_region_pixels() {
        let mut data = Array2::<f32>::from_elem((9, 9), 10.0);
        for y in 3..6 {
            for x in 3..6 {
                data[[y, x]] = 1000.0;
            }
        }
        let bg = ring_background(&Image::new(data, 16), &Rect::new(3, 3, 3, 3), 1);
        assert_eq!(bg.median, 10.0);
        assert_eq!(bg.stddev, 0.0);
        assert_eq!(bg.samples, 16);
    }
}
