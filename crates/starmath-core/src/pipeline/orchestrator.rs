use tracing::{debug, info, warn};

use crate::error::Result;

use super::types::{NoOpReporter, PipelineResult, ProgressReporter};
use super::view::{Action, View};

/// An ordered chain of views.
///
/// Each run is an independent left-to-right traversal: every view receives
/// exactly the value its predecessor returned, and the first failure aborts
/// the run. The pipeline keeps no state between runs.
#[derive(Default)]
pub struct Pipeline {
    views: Vec<Box<dyn View>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("views", &self.views.iter().map(|v| v.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a view.
    #[must_use]
    pub fn then(mut self, view: impl View + 'static) -> Self {
        self.views.push(Box::new(view));
        self
    }

    pub fn push(&mut self, view: Box<dyn View>) {
        self.views.push(view);
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.views.iter().map(|v| v.name()).collect()
    }

    /// Run every view on `input`.
    pub fn run(&self, input: impl Into<PipelineResult>) -> Result<PipelineResult> {
        self.run_reported(input, &NoOpReporter)
    }

    /// Run every view on `input`, reporting each stage.
    pub fn run_reported(
        &self,
        input: impl Into<PipelineResult>,
        reporter: &dyn ProgressReporter,
    ) -> Result<PipelineResult> {
        let total = self.views.len();
        let mut value = input.into();

        for (index, view) in self.views.iter().enumerate() {
            reporter.begin_stage(index, view.name(), total);
            value = view.apply(value).inspect_err(|e| {
                warn!(stage = view.name(), index, error = %e, "Pipeline stage failed");
            })?;
            debug!(
                stage = view.name(),
                width = value.image.width(),
                height = value.image.height(),
                stars = value.stars.as_ref().map(Vec::len),
                "Stage complete"
            );
            reporter.finish_stage();
        }

        info!(stages = total, "Pipeline complete");
        Ok(value)
    }

    /// Run every view, then hand the result to a terminal `action`.
    pub fn run_into<A: Action>(
        &self,
        input: impl Into<PipelineResult>,
        action: &A,
    ) -> Result<A::Output> {
        let value = self.run(input)?;
        action.apply(value).inspect_err(|e| {
            warn!(action = action.name(), error = %e, "Pipeline action failed");
        })
    }
}
