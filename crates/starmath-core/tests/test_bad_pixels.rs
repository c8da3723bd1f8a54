mod common;

use starmath_core::bad_pixels::{interpolate_bad_pixels, BadPixelConfig, BadPixelDirection};
use starmath_core::error::StarmathError;

use common::{flat_image, star_field};

fn config(direction: BadPixelDirection) -> BadPixelConfig {
    BadPixelConfig {
        threshold: 100.0,
        direction,
        ..Default::default()
    }
}

#[test]
fn test_hot_pixel_replaced() {
    let mut img = flat_image(16, 16, 200.0);
    img.data[[5, 7]] = 5000.0;
    let out = interpolate_bad_pixels(&img, &config(BadPixelDirection::Both)).unwrap();
    assert_eq!(out.data[[5, 7]], 200.0);
    assert!(out.data.iter().all(|&v| v == 200.0));
}

#[test]
fn test_hot_pixel_in_corner() {
    let mut img = flat_image(8, 8, 50.0);
    img.data[[0, 0]] = 4000.0;
    let out = interpolate_bad_pixels(&img, &config(BadPixelDirection::Hot)).unwrap();
    assert_eq!(out.data[[0, 0]], 50.0);
}

#[test]
fn test_cold_pixel_respects_direction() {
    let mut img = flat_image(10, 10, 1000.0);
    img.data[[4, 4]] = 0.0;

    let hot_only = interpolate_bad_pixels(&img, &config(BadPixelDirection::Hot)).unwrap();
    assert_eq!(hot_only.data[[4, 4]], 0.0);

    let cold = interpolate_bad_pixels(&img, &config(BadPixelDirection::Cold)).unwrap();
    assert_eq!(cold.data[[4, 4]], 1000.0);
}

#[test]
fn test_small_deviation_kept() {
    let mut img = flat_image(10, 10, 300.0);
    img.data[[2, 3]] = 350.0;
    let out = interpolate_bad_pixels(&img, &config(BadPixelDirection::Both)).unwrap();
    assert_eq!(out.data[[2, 3]], 350.0);
}

#[test]
fn test_broad_star_survives() {
    let img = star_field(48, 48, 100.0, &[(24.0, 24.0, 2.5, 3000.0)]);
    let cfg = BadPixelConfig {
        threshold: 500.0,
        core_size: 5,
        ..Default::default()
    };
    let out = interpolate_bad_pixels(&img, &cfg).unwrap();
    // The peak may be trimmed slightly but the star must remain.
    assert!(out.data[[24, 24]] > 2000.0);
    assert_eq!(out.bit_depth, img.bit_depth);
}

#[test]
fn test_invalid_core_size() {
    let img = flat_image(8, 8, 1.0);
    for core_size in [0, 1, 4, 11] {
        let cfg = BadPixelConfig {
            core_size,
            ..Default::default()
        };
        let err = interpolate_bad_pixels(&img, &cfg).unwrap_err();
        assert!(matches!(err, StarmathError::InvalidParameter { .. }));
    }
}

#[test]
fn test_single_pixel_image() {
    let img = flat_image(1, 1, 77.0);
    let out = interpolate_bad_pixels(&img, &BadPixelConfig::default()).unwrap();
    assert_eq!(out.data[[0, 0]], 77.0);
}
