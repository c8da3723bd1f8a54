mod common;

use approx::assert_relative_eq;

use starmath_core::bad_pixels::BadPixelConfig;
use starmath_core::detection::{
    detect, detect_stars, CentroidConfig, CentroidMethod, DetectionConfig, ThresholdMethod,
};
use starmath_core::geometry::Point;

use common::{flat_image, star_field};

fn two_stars() -> starmath_core::Image {
    star_field(
        96,
        64,
        100.0,
        &[(24.4, 30.6, 1.5, 800.0), (70.2, 33.1, 1.5, 1200.0)],
    )
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[test]
fn test_detects_two_stars() {
    let field = detect(&two_stars(), &DetectionConfig::default()).unwrap();
    assert_eq!(field.stars.len(), 2);
    assert_relative_eq!(field.background, 100.0, epsilon = 1e-3);

    let (a, b) = (&field.stars[0], &field.stars[1]);
    assert!(a.centroid.distance(&Point::new(24.4, 30.6)) < 0.1);
    assert!(b.centroid.distance(&Point::new(70.2, 33.1)) < 0.1);
    assert!(a.bounds.y <= b.bounds.y);
    assert!(a.bounds.intersect(&b.bounds).is_none());
}

#[test]
fn test_star_measurements() {
    let stars = detect_stars(&two_stars(), &DetectionConfig::default()).unwrap();
    for star in &stars {
        assert!(star.bounds.contains_point(&star.centroid.round()));
        assert_relative_eq!(star.background, 100.0, epsilon = 0.5);
        assert_relative_eq!(star.hfd, 2.5066 * 1.5, max_relative = 0.1);
        assert_relative_eq!(star.fwhm, 2.3548 * 1.5, max_relative = 0.1);
        assert!(star.flux > 0.0);
        assert!(star.snr > 0.0);
        assert!(star.pixel_count >= 3);
    }
    assert!(stars[1].flux > stars[0].flux);
    assert!(stars[1].peak > stars[0].peak);
}

#[test]
fn test_flat_image_has_no_stars() {
    let field = detect(&flat_image(48, 48, 321.0), &DetectionConfig::default()).unwrap();
    assert!(field.stars.is_empty());
}

#[test]
fn test_detection_leaves_input_untouched() {
    let img = two_stars();
    let before = img.clone();
    let config = DetectionConfig {
        bad_pixels: Some(BadPixelConfig::default()),
        blur_sigma: Some(1.0),
        ..Default::default()
    };
    detect(&img, &config).unwrap();
    assert_eq!(img, before);
}

#[test]
fn test_many_stars_in_grid() {
    let mut stars = Vec::new();
    for (j, &y) in [20.0, 60.0, 100.0].iter().enumerate() {
        for (i, &x) in [20.0, 60.0, 100.0].iter().enumerate() {
            stars.push((x + 0.3, y - 0.2, 1.6, 600.0 + 100.0 * (3 * j + i) as f64));
        }
    }
    let img = star_field(120, 120, 200.0, &stars);
    let found = detect_stars(&img, &DetectionConfig::default()).unwrap();
    assert_eq!(found.len(), 9);
    for &(x, y, _, _) in &stars {
        let truth = Point::new(x, y);
        assert!(
            found.iter().any(|s| s.centroid.distance(&truth) < 0.1),
            "no star found near ({x}, {y})"
        );
    }
}

#[test]
fn test_hot_block_removed_by_bad_pixel_pass() {
    let mut img = two_stars();
    for (r, c) in [(10, 50), (10, 51), (11, 50), (11, 51)] {
        img.data[[r, c]] = 5000.0;
    }
    let plain_config = DetectionConfig {
        threshold: ThresholdMethod::Fixed(100.0),
        ..Default::default()
    };
    let plain = detect_stars(&img, &plain_config).unwrap();
    assert_eq!(plain.len(), 3);

    let config = DetectionConfig {
        bad_pixels: Some(BadPixelConfig::default()),
        ..plain_config
    };
    let cleaned = detect_stars(&img, &config).unwrap();
    assert_eq!(cleaned.len(), 2);
}

#[test]
fn test_threshold_and_centroid_variants_agree() {
    let img = two_stars();
    let config = DetectionConfig {
        threshold: ThresholdMethod::MeanPlusSigma { sigma: 3.0 },
        centroid: CentroidConfig {
            method: CentroidMethod::IntensityWeighted,
            ..Default::default()
        },
        ..Default::default()
    };
    let stars = detect_stars(&img, &config).unwrap();
    assert_eq!(stars.len(), 2);
    assert!(stars[0].centroid.distance(&Point::new(24.4, 30.6)) < 0.1);
}
