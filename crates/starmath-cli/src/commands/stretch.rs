use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use starmath_core::filters::{StretchMethod, Stretcher};
use starmath_core::io;

#[derive(Args)]
pub struct StretchArgs {
    /// Input image (FITS, TIFF or PNG)
    pub file: PathBuf,

    /// Target background level of the automatic stretch (0-1)
    #[arg(long, default_value = "0.25")]
    pub target: f32,

    /// Linear stretch instead: "black,white" in sample units
    #[arg(long)]
    pub linear: Option<String>,

    /// Replace the output file if it exists
    #[arg(long)]
    pub force: bool,

    /// Output file path
    #[arg(short, long, default_value = "stretched.png")]
    pub output: PathBuf,
}

pub fn run(args: &StretchArgs) -> Result<()> {
    let image = io::read(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let method = match args.linear {
        Some(ref points) => {
            let parts: Vec<f32> = points
                .split(',')
                .map(|s| s.trim().parse::<f32>())
                .collect::<std::result::Result<_, _>>()
                .context("Invalid linear stretch format (expected 'black,white')")?;
            let &[black_point, white_point] = parts.as_slice() else {
                anyhow::bail!("Linear stretch needs exactly two values, got {}", parts.len());
            };
            StretchMethod::Linear {
                black_point,
                white_point,
            }
        }
        None => StretchMethod::MidtoneBalance {
            target_background: args.target,
        },
    };

    println!(
        "Stretching {}x{} image ({})",
        image.width(),
        image.height(),
        method.name()
    );
    let stretched = method.stretch(&image)?;
    io::write(&stretched, &args.output, args.force)?;
    println!("Saved to {}", args.output.display());

    Ok(())
}
