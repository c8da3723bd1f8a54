use crate::frame::Image;

use super::mean_stddev;

/// Image-level signal to noise ratio: mean over standard deviation.
///
/// A zero-variance image (all black, all white, any flat level) has no
/// measurable noise and reports 0.
pub fn snr(image: &Image) -> f64 {
    let (mean, stddev) = mean_stddev(image.data.iter());
    if stddev > 0.0 {
        mean / stddev
    } else {
        0.0
    }
}

/// Star SNR from background-subtracted signal and background noise.
///
/// Zero noise yields infinity for a positive signal and 0 otherwise.
pub fn star_snr(signal: f64, noise: f64) -> f64 {
    if noise > 0.0 {
        signal / noise
    } else if signal > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}
