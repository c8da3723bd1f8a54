//! Built-in terminal actions.

use std::path::PathBuf;

use crate::consts::DEFAULT_STAR_CROP_BORDER;
use crate::detection::{detect_stars, DetectionConfig, Star};
use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;
use crate::geometry::Rect;
use crate::io;
use crate::ops::crop_regions;

use super::types::PipelineResult;
use super::view::Action;

/// Write the final image.
pub struct Write {
    pub path: PathBuf,
    pub allow_override: bool,
}

impl Action for Write {
    type Output = ();

    fn name(&self) -> &str {
        "write"
    }

    fn apply(&self, value: PipelineResult) -> Result<()> {
        io::write(&value.image, &self.path, self.allow_override)
    }
}

/// Extract the star list: detect afresh with `config`, or hand back the
/// stars attached by an earlier view when `config` is `None`.
#[derive(Default)]
pub struct ExtractStars {
    pub config: Option<DetectionConfig>,
}

impl Action for ExtractStars {
    type Output = Vec<Star>;

    fn name(&self) -> &str {
        "detect_stars"
    }

    fn apply(&self, value: PipelineResult) -> Result<Vec<Star>> {
        match &self.config {
            Some(config) => detect_stars(&value.image, config),
            None => value.stars.ok_or(StarmathError::NoStarsDetected {
                component: Component::Pipeline,
            }),
        }
    }
}

/// One square cut-out per attached star: the star's bounds expanded to a
/// square and grown by `border` pixels.
pub struct CropStars {
    pub border: i32,
}

impl Default for CropStars {
    fn default() -> Self {
        Self {
            border: DEFAULT_STAR_CROP_BORDER,
        }
    }
}

impl CropStars {
    pub fn regions(&self, stars: &[Star]) -> Vec<Rect<i32>> {
        stars
            .iter()
            .map(|s| s.bounds.expand_to_square().grow(self.border))
            .collect()
    }
}

impl Action for CropStars {
    type Output = Vec<Image>;

    fn name(&self) -> &str {
        "crop_stars"
    }

    fn apply(&self, value: PipelineResult) -> Result<Vec<Image>> {
        let Some(stars) = &value.stars else {
            return Err(StarmathError::NoStarsDetected {
                component: Component::Pipeline,
            });
        };
        crop_regions(&value.image, &self.regions(stars))
    }
}

/// Return the final value as is.
pub struct Collect;

impl Action for Collect {
    type Output = PipelineResult;

    fn name(&self) -> &str {
        "collect"
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        Ok(value)
    }
}
