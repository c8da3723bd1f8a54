#![allow(dead_code)]

use ndarray::Array2;

use starmath_core::detection::Mask;
use starmath_core::frame::Image;

/// Flat 16-bit image.
pub fn flat_image(width: usize, height: usize, level: f32) -> Image {
    Image::new(Array2::from_elem((height, width), level), 16)
}

/// Add a circular Gaussian star centered at `(cx, cy)` (pixel-center
/// coordinates: pixel `(x, y)` is sampled at exactly `(x, y)`).
pub fn add_gaussian_star(image: &mut Image, cx: f64, cy: f64, sigma: f64, amplitude: f64) {
    let s2 = 2.0 * sigma * sigma;
    for ((row, col), v) in image.data.indexed_iter_mut() {
        let dx = col as f64 - cx;
        let dy = row as f64 - cy;
        *v += (amplitude * (-(dx * dx + dy * dy) / s2).exp()) as f32;
    }
}

/// Flat background with one Gaussian star per `(cx, cy, sigma, amplitude)`.
pub fn star_field(
    width: usize,
    height: usize,
    background: f32,
    stars: &[(f64, f64, f64, f64)],
) -> Image {
    let mut image = flat_image(width, height, background);
    for &(cx, cy, sigma, amplitude) in stars {
        add_gaussian_star(&mut image, cx, cy, sigma, amplitude);
    }
    image
}

/// Two well separated intensity populations: even pixels in 90..=110,
/// odd pixels in 900..=1100.
pub fn bimodal_image(width: usize, height: usize) -> Image {
    let data = Array2::from_shape_fn((height, width), |(row, col)| {
        let i = row * width + col;
        if i % 2 == 0 {
            90.0 + (i % 21) as f32
        } else {
            900.0 + (i % 201) as f32
        }
    });
    Image::new(data, 16)
}

/// Mask from rows of text; `#` is foreground.
pub fn mask_from(rows: &[&str]) -> Mask {
    let h = rows.len();
    let w = rows.first().map_or(0, |r| r.len());
    Array2::from_shape_fn((h, w), |(row, col)| rows[row].as_bytes()[col] == b'#')
}

/// Normalized cross-correlation of two equally sized images.
pub fn ncc(a: &Image, b: &Image) -> f64 {
    let n = a.data.len() as f64;
    let ma = a.data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mb = b.data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (&x, &y) in a.data.iter().zip(b.data.iter()) {
        let dx = x as f64 - ma;
        let dy = y as f64 - mb;
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    cov / (va * vb).sqrt()
}

/// Position of the brightest pixel as `(x, y)`.
pub fn argmax(image: &Image) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_v = f32::NEG_INFINITY;
    for ((row, col), &v) in image.data.indexed_iter() {
        if v > best_v {
            best_v = v;
            best = (col, row);
        }
    }
    best
}
