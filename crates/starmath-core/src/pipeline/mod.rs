pub mod actions;
pub mod config;
mod helpers;
mod orchestrator;
mod types;
mod view;
pub mod views;

pub use config::{OperandStep, PipelineConfig, ViewStep};
pub use helpers::build_view;
pub use orchestrator::Pipeline;
pub use types::{PipelineResult, ProgressReporter};
pub use view::{Action, FnAction, FnView, View};
