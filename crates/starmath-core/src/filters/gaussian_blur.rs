use ndarray::{Array2, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::frame::Image;

/// Separable Gaussian blur with clamped borders.
pub fn gaussian_blur(image: &Image, sigma: f32) -> Image {
    Image::new(gaussian_blur_array(&image.data, sigma), image.bit_depth)
}

/// Apply Gaussian blur to a raw array. A non-positive sigma is a no-op.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    if !(sigma > 0.0) || data.is_empty() {
        return data.clone();
    }
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve(data, &kernel, Axis(1));
    convolve(&row_pass, &kernel, Axis(0))
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / s2).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// 1-D convolution along `axis` (1 = along rows, 0 = along columns).
fn convolve(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() as isize / 2;
    let along_rows = axis == Axis(1);
    let limit = (if along_rows { w } else { h }) as isize;

    let row_values = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let offset = ki as isize - radius;
                    let (r, c) = if along_rows {
                        (row, (col as isize + offset).clamp(0, limit - 1) as usize)
                    } else {
                        ((row as isize + offset).clamp(0, limit - 1) as usize, col)
                    };
                    sum += data[[r, c]] * kv;
                }
                sum
            })
            .collect()
    };

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(row_values).collect()
    } else {
        (0..h).map(row_values).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (mut dst, src) in result.axis_iter_mut(Axis(0)).zip(rows) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s;
        }
    }
    result
}
