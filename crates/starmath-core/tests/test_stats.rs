mod common;

use approx::assert_relative_eq;

use starmath_core::error::StarmathError;
use starmath_core::geometry::Rect;
use starmath_core::stats::{
    average, border_median, mean_stddev, median, median_absolute_deviation, ring_background,
    snr, star_snr, Histogram,
};

use common::{flat_image, star_field};

// ---------------------------------------------------------------------------
// Basic statistics
// ---------------------------------------------------------------------------

#[test]
fn test_median_absolute_deviation() {
    let values = [1.0f32, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];
    let mut sorted = values;
    let m = median(&mut sorted).unwrap();
    assert_eq!(m, 2.0);
    assert_eq!(median_absolute_deviation(&values, m), Some(1.0));
}

#[test]
fn test_mean_stddev_of_constant() {
    let (m, s) = mean_stddev(&[7.0f32; 10]);
    assert_relative_eq!(m, 7.0);
    assert_eq!(s, 0.0);
}

#[test]
fn test_histogram_bins() {
    let values = [0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    let hist = Histogram::from_values(&values, 5);
    assert_eq!(hist.num_bins(), 5);
    assert_eq!(hist.bounds(), (0.0, 10.0));
    assert_eq!(hist.total(), 11);
    // The maximum lands in the last bin.
    assert_eq!(hist.bin_index(10.0), 4);
    assert_eq!(hist.counts(), &[2, 2, 2, 2, 3]);
    assert_eq!(hist.occupied_range(), Some((0, 4)));
}

// ---------------------------------------------------------------------------
// SNR
// ---------------------------------------------------------------------------

#[test]
fn test_snr_flat_image_is_zero() {
    assert_eq!(snr(&flat_image(16, 16, 0.0)), 0.0);
    assert_eq!(snr(&flat_image(16, 16, 65535.0)), 0.0);
}

#[test]
fn test_snr_positive_for_textured_image() {
    let img = star_field(32, 32, 100.0, &[(16.0, 16.0, 2.0, 500.0)]);
    assert!(snr(&img) > 0.0);
}

#[test]
fn test_star_snr_zero_noise() {
    assert_eq!(star_snr(100.0, 0.0), f64::INFINITY);
    assert_eq!(star_snr(0.0, 0.0), 0.0);
    assert_relative_eq!(star_snr(100.0, 4.0), 25.0);
}

// ---------------------------------------------------------------------------
// Background estimates
// ---------------------------------------------------------------------------

#[test]
fn test_border_median_ignores_central_star() {
    let img = star_field(64, 64, 250.0, &[(32.0, 32.0, 2.0, 5000.0)]);
    assert_relative_eq!(border_median(&img), 250.0, epsilon = 1e-3);
}

#[test]
fn test_ring_background_clipped_at_edge() {
    let mut img = flat_image(10, 10, 40.0);
    for y in 0..3 {
        for x in 0..3 {
            img.data[[y, x]] = 900.0;
        }
    }
    let bg = ring_background(&img, &Rect::new(0, 0, 3, 3), 1);
    assert_eq!(bg.median, 40.0);
    assert_eq!(bg.samples, 7);
}

#[test]
fn test_ring_background_falls_back_to_region_edge() {
    let img = flat_image(6, 6, 12.0);
    let bg = ring_background(&img, &img.bounds(), 2);
    assert_eq!(bg.median, 12.0);
    assert_eq!(bg.samples, 20);
}

// ---------------------------------------------------------------------------
// Averaging
// ---------------------------------------------------------------------------

#[test]
fn test_average_of_frames() {
    let frames = [flat_image(4, 3, 10.0), flat_image(4, 3, 20.0), flat_image(4, 3, 60.0)];
    let avg = average(&frames).unwrap();
    assert_eq!((avg.width(), avg.height()), (4, 3));
    assert!(avg.data.iter().all(|&v| (v - 30.0).abs() < 1e-5));
}

#[test]
fn test_average_rejects_mixed_sizes() {
    let frames = [flat_image(4, 3, 1.0), flat_image(3, 4, 1.0)];
    let err = average(&frames).unwrap_err();
    assert!(matches!(err, StarmathError::DimensionMismatch { .. }));
}

#[test]
fn test_average_rejects_empty_set() {
    let err = average(&[]).unwrap_err();
    assert!(matches!(err, StarmathError::InvalidParameter { .. }));
}
