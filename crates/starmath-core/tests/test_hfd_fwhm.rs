mod common;

use approx::assert_relative_eq;

use starmath_core::detection::{fwhm, hfd, max_hfd_limit, FwhmConfig, FwhmMethod, HfdConfig};
use starmath_core::error::StarmathError;
use starmath_core::geometry::Point;

use common::{flat_image, star_field};

const SIGMA_TO_FWHM: f64 = 2.354_820_045;

fn hfd_config(outer_diameter: usize) -> HfdConfig {
    HfdConfig {
        outer_diameter,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// HFD
// ---------------------------------------------------------------------------

#[test]
fn test_hfd_of_gaussian() {
    let img = star_field(64, 64, 0.0, &[(32.0, 32.0, 2.0, 1000.0)]);
    let value = hfd(&img, Point::new(32.0, 32.0), 0.0, &hfd_config(41)).unwrap();
    // 2 * mean radius of a 2-D Gaussian = 2 * sigma * sqrt(pi / 2)
    assert_relative_eq!(value, 2.5066 * 2.0, max_relative = 0.05);
}

#[test]
fn test_hfd_of_flat_disk() {
    let img = flat_image(64, 64, 10.0);
    let config = HfdConfig {
        subtract_background: false,
        ..hfd_config(41)
    };
    let value = hfd(&img, Point::new(32.0, 32.0), 0.0, &config).unwrap();
    assert_relative_eq!(value, 41.0 * 2.0 / 3.0, max_relative = 0.02);
}

#[test]
fn test_hfd_background_subtraction() {
    let img = star_field(64, 64, 500.0, &[(30.0, 33.0, 1.5, 2000.0)]);
    let center = Point::new(30.0, 33.0);
    let with_bg = hfd(&img, center, 500.0, &hfd_config(25)).unwrap();
    let config = HfdConfig {
        subtract_background: false,
        ..hfd_config(25)
    };
    let without_bg = hfd(&img, center, 500.0, &config).unwrap();
    assert_relative_eq!(with_bg, 2.5066 * 1.5, max_relative = 0.05);
    assert!(without_bg > with_bg * 2.0);
}

#[test]
fn test_hfd_scale_constant() {
    let img = star_field(48, 48, 0.0, &[(24.0, 24.0, 2.0, 1000.0)]);
    let center = Point::new(24.0, 24.0);
    let k2 = hfd(&img, center, 0.0, &hfd_config(25)).unwrap();
    let config = HfdConfig {
        scale_constant: 1.0,
        ..hfd_config(25)
    };
    let k1 = hfd(&img, center, 0.0, &config).unwrap();
    assert_relative_eq!(k2, 2.0 * k1, max_relative = 1e-9);
}

#[test]
fn test_hfd_grows_with_star_size() {
    let center = Point::new(32.0, 32.0);
    let narrow = star_field(64, 64, 0.0, &[(32.0, 32.0, 1.5, 1000.0)]);
    let wide = star_field(64, 64, 0.0, &[(32.0, 32.0, 3.0, 1000.0)]);
    let a = hfd(&narrow, center, 0.0, &hfd_config(31)).unwrap();
    let b = hfd(&wide, center, 0.0, &hfd_config(31)).unwrap();
    assert!(b > a);
}

#[test]
fn test_hfd_zero_flux_is_degenerate() {
    let img = flat_image(32, 32, 100.0);
    let err = hfd(&img, Point::new(16.0, 16.0), 100.0, &hfd_config(15)).unwrap_err();
    assert!(matches!(err, StarmathError::DegenerateStar { .. }));
}

#[test]
fn test_hfd_zero_diameter_rejected() {
    let img = flat_image(8, 8, 1.0);
    let err = hfd(&img, Point::new(4.0, 4.0), 0.0, &hfd_config(0)).unwrap_err();
    assert!(matches!(err, StarmathError::InvalidParameter { .. }));
}

#[test]
fn test_max_hfd_limit() {
    assert_relative_eq!(max_hfd_limit(25), 25.0 * 0.353_553, max_relative = 1e-9);
}

// ---------------------------------------------------------------------------
// FWHM
// ---------------------------------------------------------------------------

#[test]
fn test_fwhm_half_max_crossing() {
    let img = star_field(64, 64, 100.0, &[(32.0, 32.0, 2.0, 1000.0)]);
    let m = fwhm(&img, Point::new(32.0, 32.0), 100.0, &FwhmConfig::default()).unwrap();
    assert_relative_eq!(m.horizontal, SIGMA_TO_FWHM * 2.0, max_relative = 0.05);
    assert_relative_eq!(m.vertical, SIGMA_TO_FWHM * 2.0, max_relative = 0.05);
    assert_relative_eq!(m.value, (m.horizontal + m.vertical) / 2.0);
}

#[test]
fn test_fwhm_gaussian_fit() {
    let img = star_field(64, 64, 0.0, &[(32.0, 32.0, 2.5, 1000.0)]);
    let config = FwhmConfig {
        method: FwhmMethod::GaussianFit,
        ..Default::default()
    };
    let m = fwhm(&img, Point::new(32.0, 32.0), 0.0, &config).unwrap();
    assert_relative_eq!(m.value, SIGMA_TO_FWHM * 2.5, max_relative = 1e-3);
}

#[test]
fn test_fwhm_elongated_star() {
    let mut img = flat_image(64, 64, 0.0);
    for ((row, col), v) in img.data.indexed_iter_mut() {
        let dx = col as f64 - 32.0;
        let dy = row as f64 - 32.0;
        *v = (1000.0 * (-(dx * dx) / 18.0 - (dy * dy) / 4.5).exp()) as f32;
    }
    let m = fwhm(&img, Point::new(32.0, 32.0), 0.0, &FwhmConfig::default()).unwrap();
    assert!(m.horizontal > m.vertical * 1.5);
}

#[test]
fn test_fwhm_without_signal_is_degenerate() {
    let img = flat_image(32, 32, 100.0);
    let err = fwhm(&img, Point::new(16.0, 16.0), 100.0, &FwhmConfig::default()).unwrap_err();
    assert!(err.is_degenerate());
}

#[test]
fn test_fwhm_center_outside_image() {
    let img = flat_image(16, 16, 100.0);
    let err = fwhm(&img, Point::new(40.0, 2.0), 0.0, &FwhmConfig::default()).unwrap_err();
    assert!(err.is_degenerate());
}
