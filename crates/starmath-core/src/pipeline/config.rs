use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bad_pixels::BadPixelConfig;
use crate::detection::{DetectionConfig, ThresholdMethod};
use crate::error::{Result, StarmathError};
use crate::filters::StretchMethod;
use crate::geometry::{Rect, Size};
use crate::ops::{ArithmeticOp, Interpolation};

use super::views::StarSelection;

/// A whole pipeline run: source image, ordered steps, optional output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub allow_override: bool,
    #[serde(default)]
    pub steps: Vec<ViewStep>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.fits"),
            output: Some(PathBuf::from("output.png")),
            allow_override: false,
            steps: vec![
                ViewStep::InterpolateBadPixels(BadPixelConfig::default()),
                ViewStep::DetectStars(DetectionConfig::default()),
                ViewStep::CenterOnStar {
                    selection: StarSelection::Brightest,
                    size: Some(Size::square(64)),
                },
                ViewStep::Stretch(StretchMethod::default()),
            ],
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML pipeline description.
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StarmathError::UnreadableSource {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|e| StarmathError::UnreadableSource {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Right-hand side of an arithmetic step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OperandStep {
    Scalar(f32),
    /// Image file loaded when the pipeline is built.
    Image(PathBuf),
}

/// One configurable pipeline view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ViewStep {
    Arithmetic {
        op: ArithmeticOp,
        operand: OperandStep,
    },
    ScaleUp {
        factor: f32,
        #[serde(default)]
        interpolation: Interpolation,
    },
    ScaleDown {
        factor: f32,
        #[serde(default)]
        interpolation: Interpolation,
    },
    Crop(Rect<i32>),
    CropFromCenter(Size<i32>),
    Stretch(StretchMethod),
    SubtractBackground(ThresholdMethod),
    InterpolateBadPixels(BadPixelConfig),
    Blur {
        sigma: f32,
    },
    DetectStars(DetectionConfig),
    CenterOnStar {
        #[serde(default)]
        selection: StarSelection,
        #[serde(default)]
        size: Option<Size<i32>>,
    },
    Write {
        path: PathBuf,
        #[serde(default)]
        allow_override: bool,
    },
}
