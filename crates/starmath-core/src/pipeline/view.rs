use crate::error::Result;

use super::types::PipelineResult;

/// A chainable stage: receives the previous stage's value and returns the
/// next one.
pub trait View: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, value: PipelineResult) -> Result<PipelineResult>;
}

/// A terminal stage: consumes the value and produces a result or side effect.
pub trait Action {
    type Output;
    fn name(&self) -> &str;
    fn apply(&self, value: PipelineResult) -> Result<Self::Output>;
}

/// A view built from a closure.
pub struct FnView<F> {
    name: String,
    f: F,
}

impl<F> FnView<F>
where
    F: Fn(PipelineResult) -> Result<PipelineResult> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> View for FnView<F>
where
    F: Fn(PipelineResult) -> Result<PipelineResult> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: PipelineResult) -> Result<PipelineResult> {
        (self.f)(value)
    }
}

/// An action built from a closure.
pub struct FnAction<F> {
    name: String,
    f: F,
}

impl<F, T> FnAction<F>
where
    F: Fn(PipelineResult) -> Result<T>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F, T> Action for FnAction<F>
where
    F: Fn(PipelineResult) -> Result<T>,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: PipelineResult) -> Result<T> {
        (self.f)(value)
    }
}
