use tracing::info;

use crate::error::Result;
use crate::io;
use crate::ops::{Operand, ScaleDirection};

use super::config::{OperandStep, PipelineConfig, ViewStep};
use super::orchestrator::Pipeline;
use super::types::{PipelineResult, ProgressReporter};
use super::view::View;
use super::views::{
    Arithmetic, Blur, CenterOnStar, Crop, CropFromCenter, DetectStars, InterpolateBadPixels,
    Scale, Stretch, SubtractBackground, Tee,
};

/// Turn one configured step into a view. Image operands are loaded here.
pub fn build_view(step: &ViewStep) -> Result<Box<dyn View>> {
    let view: Box<dyn View> = match step {
        ViewStep::Arithmetic { op, operand } => {
            let operand = match operand {
                OperandStep::Scalar(v) => Operand::Scalar(*v),
                OperandStep::Image(path) => Operand::from(io::read(path)?),
            };
            Box::new(Arithmetic { op: *op, operand })
        }
        ViewStep::ScaleUp {
            factor,
            interpolation,
        } => Box::new(Scale {
            direction: ScaleDirection::Up,
            factor: *factor,
            interpolation: *interpolation,
        }),
        ViewStep::ScaleDown {
            factor,
            interpolation,
        } => Box::new(Scale {
            direction: ScaleDirection::Down,
            factor: *factor,
            interpolation: *interpolation,
        }),
        ViewStep::Crop(rect) => Box::new(Crop { rect: *rect }),
        ViewStep::CropFromCenter(size) => Box::new(CropFromCenter { size: *size }),
        ViewStep::Stretch(method) => Box::new(Stretch {
            method: method.clone(),
        }),
        ViewStep::SubtractBackground(method) => Box::new(SubtractBackground {
            method: method.clone(),
        }),
        ViewStep::InterpolateBadPixels(config) => Box::new(InterpolateBadPixels {
            config: config.clone(),
        }),
        ViewStep::Blur { sigma } => Box::new(Blur { sigma: *sigma }),
        ViewStep::DetectStars(config) => Box::new(DetectStars {
            config: config.clone(),
        }),
        ViewStep::CenterOnStar { selection, size } => Box::new(CenterOnStar {
            selection: *selection,
            size: *size,
        }),
        ViewStep::Write {
            path,
            allow_override,
        } => Box::new(Tee {
            path: path.clone(),
            allow_override: *allow_override,
        }),
    };
    Ok(view)
}

impl PipelineConfig {
    /// Build the configured view chain.
    pub fn build(&self) -> Result<Pipeline> {
        let mut pipeline = Pipeline::new();
        for step in &self.steps {
            pipeline.push(build_view(step)?);
        }
        Ok(pipeline)
    }

    /// Read the input, run the chain and write the output if configured.
    pub fn run_reported(&self, reporter: &dyn ProgressReporter) -> Result<PipelineResult> {
        let pipeline = self.build()?;
        let input = io::read(&self.input)?;
        info!(
            input = %self.input.display(),
            stages = pipeline.len(),
            "Starting pipeline"
        );
        let result = pipeline.run_reported(input, reporter)?;
        if let Some(output) = &self.output {
            io::write(&result.image, output, self.allow_override)?;
        }
        Ok(result)
    }
}
