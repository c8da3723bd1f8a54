use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use starmath_core::io;
use starmath_core::stats::{border_median, mean_stddev, min_max, snr};

#[derive(Args)]
pub struct InfoArgs {
    /// Input image (FITS, TIFF or PNG)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let image = io::read(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", image.width(), image.height());
    println!("Bit depth:   {}", image.bit_depth);

    if let Some((lo, hi)) = min_max(image.data.iter()) {
        let (mean, stddev) = mean_stddev(image.data.iter());
        println!("Range:       {lo} .. {hi}");
        println!("Mean:        {mean:.3}");
        println!("Std dev:     {stddev:.3}");
        println!("Background:  {:.3}", border_median(&image));
        println!("SNR:         {:.3}", snr(&image));
    }

    Ok(())
}
