use ndarray::Array2;
use num_traits::{Bounded, NumCast, ToPrimitive};

use crate::geometry::{Rect, Size};

/// A single-channel image.
///
/// Samples keep their native range: 0..=255 for 8-bit data, 0..=65535 for
/// 16-bit data, arbitrary values for 32-bit float data.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Numeric depth of the samples (8, 16 or 32)
    pub bit_depth: u8,
}

impl Image {
    pub fn new(data: Array2<f32>, bit_depth: u8) -> Self {
        Self { data, bit_depth }
    }

    pub fn zeros(width: usize, height: usize, bit_depth: u8) -> Self {
        Self::new(Array2::zeros((height, width)), bit_depth)
    }

    /// Build an image from row-major samples of any primitive numeric type.
    ///
    /// Returns `None` when `samples.len() != width * height`.
    pub fn from_samples<T: ToPrimitive>(
        width: usize,
        height: usize,
        bit_depth: u8,
        samples: &[T],
    ) -> Option<Self> {
        if samples.len() != width * height {
            return None;
        }
        let values: Vec<f32> = samples
            .iter()
            .map(|s| s.to_f32().unwrap_or(0.0))
            .collect();
        Array2::from_shape_vec((height, width), values)
            .ok()
            .map(|data| Self::new(data, bit_depth))
    }

    /// Row-major samples converted to `T`, clamped to `T`'s range.
    pub fn to_samples<T: NumCast + Bounded + Copy>(&self) -> Vec<T> {
        let lo = T::min_value().to_f64().unwrap_or(f64::MIN);
        let hi = T::max_value().to_f64().unwrap_or(f64::MAX);
        self.data
            .iter()
            .map(|&v| {
                let v = if v.is_finite() { v as f64 } else { 0.0 };
                let clamped = v.round().clamp(lo, hi);
                T::from(clamped).unwrap_or_else(T::min_value)
            })
            .collect()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn size(&self) -> Size<usize> {
        Size::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Full-image rectangle.
    pub fn bounds(&self) -> Rect<i32> {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    /// Sample at column `x`, row `y`, or `None` outside the image.
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        if x < 0 || y < 0 {
            return None;
        }
        self.data.get((y as usize, x as usize)).copied()
    }

    pub fn same_size(&self, other: &Image) -> bool {
        self.data.dim() == other.data.dim()
    }

    /// Copy of `rect`; pixels outside the image are zero.
    pub fn crop(&self, rect: &Rect<i32>) -> Image {
        let w = rect.width.max(0) as usize;
        let h = rect.height.max(0) as usize;
        let mut out = Array2::<f32>::zeros((h, w));
        if let Some(overlap) = rect.intersect(&self.bounds()) {
            for y in overlap.y..overlap.y + overlap.height {
                for x in overlap.x..overlap.x + overlap.width {
                    out[[(y - rect.y) as usize, (x - rect.x) as usize]] =
                        self.data[[y as usize, x as usize]];
                }
            }
        }
        Image::new(out, self.bit_depth)
    }
}

impl From<Array2<f32>> for Image {
    fn from(data: Array2<f32>) -> Self {
        Image::new(data, 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_samples_clamps() {
        let img = Image::from_samples(3, 1, 16, &[-4.0f32, 300.0, 70_000.0]).unwrap();
        assert_eq!(img.to_samples::<u8>(), vec![0, 255, 255]);
        assert_eq!(img.to_samples::<u16>(), vec![0, 300, 65535]);
    }

    #[test]
    fn test_crop_zero_fills_outside() {
        let img = Image::from_samples(2, 2, 8, &[1u8, 2, 3, 4]).unwrap();
        let cropped = img.crop(&Rect::new(-1, 0, 3, 2));
        assert_eq!(cropped.to_samples::<u8>(), vec![0, 1, 2, 0, 3, 4]);
    }
}
