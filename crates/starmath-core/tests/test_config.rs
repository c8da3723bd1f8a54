use std::path::PathBuf;

use starmath_core::bad_pixels::{BadPixelConfig, BadPixelDirection};
use starmath_core::detection::{
    CentroidMethod, DegeneratePolicy, DetectionConfig, FwhmMethod, ThresholdMethod,
};
use starmath_core::filters::StretchMethod;
use starmath_core::geometry::Size;
use starmath_core::pipeline::views::StarSelection;
use starmath_core::pipeline::{PipelineConfig, ViewStep};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_detection_config_defaults() {
    let config = DetectionConfig::default();
    assert_eq!(config.threshold, ThresholdMethod::Otsu { bins: 256 });
    assert!(config.subtract_background);
    assert!(config.bad_pixels.is_none());
    assert_eq!(config.cluster.cluster_radius, 1);
    assert_eq!(config.cluster.min_pixels, 3);
    assert_eq!(config.centroid.method, CentroidMethod::CenterOfGravity);
    assert_eq!(config.hfd.outer_diameter, 25);
    assert_eq!(config.hfd.scale_constant, 2.0);
    assert_eq!(config.fwhm.method, FwhmMethod::HalfMaxCrossing);
    assert_eq!(config.degenerate, DegeneratePolicy::Skip);
}

#[test]
fn test_bad_pixel_config_defaults() {
    let config = BadPixelConfig::default();
    assert_eq!(config.threshold, 500.0);
    assert_eq!(config.core_size, 3);
    assert_eq!(config.direction, BadPixelDirection::Both);
}

// ---------------------------------------------------------------------------
// serde
// ---------------------------------------------------------------------------

#[test]
fn test_detection_config_from_partial_json() {
    let json = r#"{
        "threshold": { "MeanPlusSigma": {} },
        "hfd": { "outer_diameter": 31 },
        "degenerate": "Fail"
    }"#;
    let config: DetectionConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.threshold, ThresholdMethod::MeanPlusSigma { sigma: 3.0 });
    assert_eq!(config.hfd.outer_diameter, 31);
    assert_eq!(config.hfd.scale_constant, 2.0);
    assert_eq!(config.degenerate, DegeneratePolicy::Fail);
    assert_eq!(config.cluster, DetectionConfig::default().cluster);
}

#[test]
fn test_empty_json_is_default() {
    let config: DetectionConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, DetectionConfig::default());
}

#[test]
fn test_parse_pipeline_toml() {
    let text = r#"
        input = "lights/m13_001.fits"
        output = "out/m13.png"
        allow_override = true

        [[steps]]
        [steps.InterpolateBadPixels]
        threshold = 300.0

        [[steps]]
        [steps.DetectStars]
        blur_sigma = 1.0
        [steps.DetectStars.threshold.MaxEntropy]
        bins = 128

        [[steps]]
        [steps.CenterOnStar]
        selection = "HighestSnr"
        size = { width = 48, height = 48 }

        [[steps]]
        Stretch = { MidtoneBalance = {} }
    "#;
    let config = PipelineConfig::from_toml(text).unwrap();
    assert_eq!(config.input, PathBuf::from("lights/m13_001.fits"));
    assert_eq!(config.output, Some(PathBuf::from("out/m13.png")));
    assert!(config.allow_override);
    assert_eq!(config.steps.len(), 4);

    match &config.steps[0] {
        ViewStep::InterpolateBadPixels(bp) => {
            assert_eq!(bp.threshold, 300.0);
            assert_eq!(bp.core_size, 3);
        }
        other => panic!("unexpected step {other:?}"),
    }
    match &config.steps[1] {
        ViewStep::DetectStars(detection) => {
            assert_eq!(detection.blur_sigma, Some(1.0));
            assert_eq!(detection.threshold, ThresholdMethod::MaxEntropy { bins: 128 });
        }
        other => panic!("unexpected step {other:?}"),
    }
    assert_eq!(
        config.steps[2],
        ViewStep::CenterOnStar {
            selection: StarSelection::HighestSnr,
            size: Some(Size::square(48)),
        }
    );
    assert_eq!(config.steps[3], ViewStep::Stretch(StretchMethod::default()));

    let pipeline = config.build().unwrap();
    assert_eq!(
        pipeline.stage_names(),
        vec!["interpolate_bad_pixels", "detect_stars", "center_on_star", "stretch"]
    );
}

#[test]
fn test_default_pipeline_toml_roundtrip() {
    let config = PipelineConfig::default();
    let text = toml::to_string(&config).unwrap();
    let back = PipelineConfig::from_toml(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_unknown_step_rejected() {
    let text = r#"
        input = "a.fits"
        [[steps]]
        Sharpen = { amount = 2.0 }
    "#;
    assert!(PipelineConfig::from_toml(text).is_err());
}

#[test]
fn test_load_missing_config() {
    let err = PipelineConfig::load(std::path::Path::new("/nonexistent/pipeline.toml")).unwrap_err();
    assert!(matches!(
        err,
        starmath_core::StarmathError::UnreadableSource { .. }
    ));
}

#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.toml");
    std::fs::write(
        &path,
        "input = \"frame.fits\"\n[[steps]]\nScaleDown = { factor = 2.0 }\n",
    )
    .unwrap();
    let config = PipelineConfig::load(&path).unwrap();
    assert_eq!(config.output, None);
    assert_eq!(config.steps.len(), 1);
    assert_eq!(config.build().unwrap().stage_names(), vec!["scale_down"]);
}
