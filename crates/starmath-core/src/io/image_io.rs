use std::path::Path;

use image::{ColorType, DynamicImage, ImageBuffer, ImageFormat, Luma};

use crate::error::Result;
use crate::frame::Image;

use super::{unreadable, write_failed};

/// Load a TIFF/PNG (or any format the `image` crate decodes) as grayscale,
/// keeping the native sample range.
pub fn load_image(path: &Path) -> Result<Image> {
    let img = image::open(path).map_err(|e| unreadable(path, e))?;
    let (w, h) = (img.width() as usize, img.height() as usize);

    let loaded = match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => {
            Image::from_samples(w, h, 8, img.to_luma8().as_raw())
        }
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => {
            Image::from_samples(w, h, 16, img.to_luma16().as_raw())
        }
        _ => Image::from_samples(w, h, 32, img.to_luma32f().as_raw()),
    };
    loaded.ok_or_else(|| unreadable(path, "decoded sample count does not match dimensions"))
}

/// Save as 16-bit (or 8-bit for 8-bit images) grayscale TIFF. Samples are
/// clamped to the integer range.
pub fn save_tiff(image: &Image, path: &Path) -> Result<()> {
    save_integer(image, path, ImageFormat::Tiff)
}

/// Save as 8- or 16-bit grayscale PNG.
pub fn save_png(image: &Image, path: &Path) -> Result<()> {
    save_integer(image, path, ImageFormat::Png)
}

fn save_integer(image: &Image, path: &Path, format: ImageFormat) -> Result<()> {
    let (w, h) = (image.width() as u32, image.height() as u32);
    let dynamic = if image.bit_depth == 8 {
        ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w, h, image.to_samples::<u8>())
            .map(DynamicImage::ImageLuma8)
    } else {
        ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w, h, image.to_samples::<u16>())
            .map(DynamicImage::ImageLuma16)
    };
    let dynamic =
        dynamic.ok_or_else(|| write_failed(path, "sample count does not match dimensions"))?;
    dynamic
        .save_with_format(path, format)
        .map_err(|e| write_failed(path, e))
}
