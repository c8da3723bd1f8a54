use crate::error::{Component, Result, StarmathError};
use crate::frame::Image;
use crate::geometry::{Rect, Size};

/// Cut `rect` out of the image. Parts outside the image are zero-filled.
pub fn crop(image: &Image, rect: &Rect<i32>) -> Result<Image> {
    if rect.is_empty() {
        return Err(StarmathError::invalid_region(
            Component::Crop,
            format!("crop region {rect:?} has zero area"),
        ));
    }
    Ok(image.crop(rect))
}

/// Cut a window of `size` centered on the image center.
pub fn crop_from_center(image: &Image, size: Size<i32>) -> Result<Image> {
    crop(image, &centered_rect(image, size))
}

/// Window of `size` centered on the image center.
pub fn centered_rect(image: &Image, size: Size<i32>) -> Rect<i32> {
    Rect::from_center_point(image.bounds().center(), size)
}

/// One cut-out per rect, in order.
pub fn crop_regions(image: &Image, rects: &[Rect<i32>]) -> Result<Vec<Image>> {
    rects.iter().map(|r| crop(image, r)).collect()
}
