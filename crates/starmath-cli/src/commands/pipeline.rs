use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use starmath_core::pipeline::{PipelineConfig, ProgressReporter};

use crate::summary::{print_pipeline_summary, print_star_table};

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline config file (TOML); the default pipeline is used if omitted
    pub config: Option<PathBuf>,

    /// Input image, overriding the config
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file path, overriding the config
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace existing output files
    #[arg(long)]
    pub force: bool,
}

/// Drives an indicatif bar from pipeline stage events.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, index: usize, name: &str, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(index as u64);
        self.bar.set_message(name.to_string());
    }

    fn finish_stage(&self) {
        self.bar.inc(1);
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => PipelineConfig::load(path)
            .with_context(|| format!("Invalid pipeline config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(ref input) = args.input {
        config.input = input.clone();
    }
    if let Some(ref output) = args.output {
        config.output = Some(output.clone());
    }
    config.allow_override |= args.force;

    print_pipeline_summary(&config);

    let bar = ProgressBar::new(config.steps.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { bar };

    let result = config.run_reported(&reporter)?;
    reporter.bar.finish_with_message("Done");

    if result.stars.is_some() {
        println!();
        print_star_table(result.stars(), result.background, Some(10));
    }
    if let Some(ref output) = config.output {
        println!("\nOutput saved to {}", output.display());
    }

    Ok(())
}
