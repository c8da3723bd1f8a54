use crate::detection::Thresholder;
use crate::error::Result;
use crate::frame::Image;

/// Remove the sky level found by `thresholder`: samples below the threshold
/// become 0, the rest have the threshold subtracted.
///
/// Returns the new image and the threshold that was removed.
pub fn subtract_background(
    image: &Image,
    thresholder: &dyn Thresholder,
) -> Result<(Image, f32)> {
    let t = thresholder.threshold(image, None)?;
    let data = image.data.mapv(|v| if v < t { 0.0 } else { v - t });
    tracing::debug!(method = thresholder.name(), level = t, "Background subtracted");
    Ok((Image::new(data, image.bit_depth), t))
}

/// Subtract a constant sky level, clamping at zero.
pub fn subtract_level(image: &Image, level: f32) -> Image {
    Image::new(image.data.mapv(|v| (v - level).max(0.0)), image.bit_depth)
}
