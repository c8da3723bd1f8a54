use ndarray::Array2;

use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;

/// Pixel-wise mean of a set of equally sized images.
pub fn average(images: &[Image]) -> Result<Image> {
    let Some(first) = images.first() else {
        return Err(StarmathError::invalid_parameter(
            Component::Statistics,
            "cannot average an empty image set",
        ));
    };

    let (h, w) = first.data.dim();
    let mut sum = Array2::<f64>::zeros((h, w));
    for img in images {
        if !img.same_size(first) {
            return Err(StarmathError::DimensionMismatch {
                component: Component::Statistics,
                expected_width: w,
                expected_height: h,
                actual_width: img.width(),
                actual_height: img.height(),
            });
        }
        sum.zip_mut_with(&img.data, |acc, &v| *acc += v as f64);
    }

    let n = images.len() as f64;
    let data = sum.mapv(|v| (v / n) as f32);
    Ok(Image::new(data, first.bit_depth))
}
