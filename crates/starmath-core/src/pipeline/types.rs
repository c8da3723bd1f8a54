use crate::detection::Star;
use crate::frame::Image;

/// The value threaded through a pipeline: an image plus side metadata
/// attached by enrichment views.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineResult {
    pub image: Image,
    /// Stars from the most recent detection, in image coordinates.
    pub stars: Option<Vec<Star>>,
    /// Most recent sky level estimate.
    pub background: Option<f32>,
}

impl PipelineResult {
    pub fn new(image: Image) -> Self {
        Self {
            image,
            stars: None,
            background: None,
        }
    }

    /// Replace the image, keeping the metadata.
    pub fn with_image(self, image: Image) -> Self {
        Self { image, ..self }
    }

    /// Attached stars, empty if none were attached.
    pub fn stars(&self) -> &[Star] {
        self.stars.as_deref().unwrap_or(&[])
    }
}

impl From<Image> for PipelineResult {
    fn from(image: Image) -> Self {
        Self::new(image)
    }
}

/// Thread-safe progress reporting for pipeline runs.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// Stage `index` (0-based) of `total` named `name` has started.
    fn begin_stage(&self, _index: usize, _name: &str, _total: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
