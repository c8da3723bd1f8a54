//! Built-in pipeline views.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bad_pixels::{interpolate_bad_pixels, BadPixelConfig};
use crate::detection::{detect, DetectionConfig, Star, ThresholdMethod};
use crate::error::{Component, Result, StarmathError};
use crate::filters::{gaussian_blur, subtract_background, StretchMethod, Stretcher};
use crate::geometry::{Point, Rect, Size};
use crate::io;
use crate::ops::scale::effective_ratio;
use crate::ops::{self, centered_rect, ArithmeticOp, Interpolation, Operand, ScaleDirection};

use super::types::PipelineResult;
use super::view::View;

/// Element-wise arithmetic against a scalar or a same-size image.
pub struct Arithmetic {
    pub op: ArithmeticOp,
    pub operand: Operand,
}

pub fn add(operand: impl Into<Operand>) -> Arithmetic {
    Arithmetic {
        op: ArithmeticOp::Add,
        operand: operand.into(),
    }
}

pub fn subtract(operand: impl Into<Operand>) -> Arithmetic {
    Arithmetic {
        op: ArithmeticOp::Subtract,
        operand: operand.into(),
    }
}

pub fn multiply_by(operand: impl Into<Operand>) -> Arithmetic {
    Arithmetic {
        op: ArithmeticOp::Multiply,
        operand: operand.into(),
    }
}

pub fn divide_by(operand: impl Into<Operand>) -> Arithmetic {
    Arithmetic {
        op: ArithmeticOp::Divide,
        operand: operand.into(),
    }
}

impl View for Arithmetic {
    fn name(&self) -> &str {
        self.op.name()
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let PipelineResult {
            image,
            stars,
            background,
        } = value;
        let image = ops::apply_arithmetic(image, self.op, &self.operand)?;
        Ok(PipelineResult {
            image,
            stars,
            background,
        })
    }
}

/// Resize by a factor; attached stars are mapped to the new grid.
pub struct Scale {
    pub direction: ScaleDirection,
    pub factor: f32,
    pub interpolation: Interpolation,
}

pub fn scale_up(factor: f32) -> Scale {
    Scale {
        direction: ScaleDirection::Up,
        factor,
        interpolation: Interpolation::Auto,
    }
}

pub fn scale_down(factor: f32) -> Scale {
    Scale {
        direction: ScaleDirection::Down,
        factor,
        interpolation: Interpolation::Auto,
    }
}

impl Scale {
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}

impl View for Scale {
    fn name(&self) -> &str {
        match self.direction {
            ScaleDirection::Up => "scale_up",
            ScaleDirection::Down => "scale_down",
        }
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let ratio = effective_ratio(self.direction, self.factor)?;
        let image = ops::scale(&value.image, self.direction, self.factor, self.interpolation)?;
        let stars = value
            .stars
            .map(|stars| stars.iter().map(|s| s.scaled(ratio)).collect());
        Ok(PipelineResult {
            image,
            stars,
            background: value.background,
        })
    }
}

/// Cut a rectangle out of the image (zero-filled outside).
pub struct Crop {
    pub rect: Rect<i32>,
}

impl View for Crop {
    fn name(&self) -> &str {
        "crop"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        crop_result(value, &self.rect)
    }
}

/// Cut a window of `size` around the image center.
pub struct CropFromCenter {
    pub size: Size<i32>,
}

impl View for CropFromCenter {
    fn name(&self) -> &str {
        "crop_from_center"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let rect = centered_rect(&value.image, self.size);
        crop_result(value, &rect)
    }
}

/// Crop the image and move attached stars into the crop's coordinates,
/// dropping stars whose centroid falls outside.
fn crop_result(value: PipelineResult, rect: &Rect<i32>) -> Result<PipelineResult> {
    let image = ops::crop(&value.image, rect)?;
    let area = Rect::new(0.0, 0.0, rect.width as f64, rect.height as f64);
    let stars = value.stars.map(|stars| {
        stars
            .iter()
            .map(|s| s.translated(-rect.x, -rect.y))
            .filter(|s| area.contains_point(&s.centroid))
            .collect()
    });
    Ok(PipelineResult {
        image,
        stars,
        background: value.background,
    })
}

/// Map the image to 8-bit for display.
pub struct Stretch {
    pub method: StretchMethod,
}

impl View for Stretch {
    fn name(&self) -> &str {
        "stretch"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let image = self.method.stretch(&value.image)?;
        Ok(value.with_image(image))
    }
}

/// Remove the sky level found by a thresholder and record it.
pub struct SubtractBackground {
    pub method: ThresholdMethod,
}

impl View for SubtractBackground {
    fn name(&self) -> &str {
        "subtract_background"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let (image, level) = subtract_background(&value.image, &self.method)?;
        Ok(PipelineResult {
            image,
            stars: value.stars,
            background: Some(level),
        })
    }
}

pub struct InterpolateBadPixels {
    pub config: BadPixelConfig,
}

impl View for InterpolateBadPixels {
    fn name(&self) -> &str {
        "interpolate_bad_pixels"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let image = interpolate_bad_pixels(&value.image, &self.config)?;
        Ok(value.with_image(image))
    }
}

pub struct Blur {
    pub sigma: f32,
}

impl View for Blur {
    fn name(&self) -> &str {
        "blur"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let image = gaussian_blur(&value.image, self.sigma);
        Ok(value.with_image(image))
    }
}

/// Detect stars and attach them to the value. The image is unchanged.
pub struct DetectStars {
    pub config: DetectionConfig,
}

impl View for DetectStars {
    fn name(&self) -> &str {
        "detect_stars"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let field = detect(&value.image, &self.config)?;
        Ok(PipelineResult {
            image: value.image,
            stars: Some(field.stars),
            background: Some(field.background),
        })
    }
}

/// Which attached star to center on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StarSelection {
    /// Largest background-subtracted flux.
    #[default]
    Brightest,
    HighestSnr,
    /// Position in the attached star list.
    Index(usize),
}

impl StarSelection {
    /// Index of the selected star. Ties go to the earlier star.
    pub fn select(&self, stars: &[Star]) -> Result<usize> {
        if stars.is_empty() {
            return Err(StarmathError::NoStarsDetected {
                component: Component::Pipeline,
            });
        }
        let best_by = |key: fn(&Star) -> f64| {
            stars
                .iter()
                .enumerate()
                .fold(0, |best, (i, s)| if key(s) > key(&stars[best]) { i } else { best })
        };
        match *self {
            Self::Brightest => Ok(best_by(|s| s.flux)),
            Self::HighestSnr => Ok(best_by(|s| s.snr)),
            Self::Index(i) if i < stars.len() => Ok(i),
            Self::Index(i) => Err(StarmathError::invalid_parameter(
                Component::Pipeline,
                format!("star index {i} out of range ({} stars)", stars.len()),
            )),
        }
    }
}

/// Re-center the image on one of the attached stars.
///
/// The window keeps the image size unless `size` is given; parts outside
/// the source are zero-filled. Attached stars move into the new window.
pub struct CenterOnStar {
    pub selection: StarSelection,
    pub size: Option<Size<i32>>,
}

impl View for CenterOnStar {
    fn name(&self) -> &str {
        "center_on_star"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        let index = self.selection.select(value.stars())?;
        let star = &value.stars()[index];
        let center: Point<i32> = star.centroid.round();
        let size = self.size.unwrap_or(Size::new(
            value.image.width() as i32,
            value.image.height() as i32,
        ));
        debug!(
            index,
            x = star.centroid.x,
            y = star.centroid.y,
            "Centering on star"
        );
        let rect = Rect::from_center_point(center, size);
        crop_result(value, &rect)
    }
}

/// Write a copy of the image and pass the value on unchanged.
pub struct Tee {
    pub path: PathBuf,
    pub allow_override: bool,
}

impl View for Tee {
    fn name(&self) -> &str {
        "write"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        io::write(&value.image, &self.path, self.allow_override)?;
        Ok(value)
    }
}
