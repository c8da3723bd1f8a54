pub mod fits;
pub mod image_io;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, StarmathError};
use crate::frame::Image;

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn is_fits(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("fits" | "fit" | "fts"))
}

pub(crate) fn unreadable(path: &Path, reason: impl Display) -> StarmathError {
    StarmathError::UnreadableSource {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

pub(crate) fn write_failed(path: &Path, reason: impl Display) -> StarmathError {
    StarmathError::WriteError {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read an image, choosing the decoder from the file extension.
pub fn read(path: &Path) -> Result<Image> {
    if !path.is_file() {
        return Err(unreadable(path, "no such file"));
    }
    let image = if is_fits(path) {
        fits::load_fits(path)?
    } else {
        image_io::load_image(path)?
    };
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        bit_depth = image.bit_depth,
        "Image loaded"
    );
    Ok(image)
}

/// Write an image, choosing the encoder from the file extension.
///
/// Fails if the file exists and `allow_override` is false. Missing parent
/// directories are created.
pub fn write(image: &Image, path: &Path, allow_override: bool) -> Result<()> {
    if path.exists() && !allow_override {
        return Err(write_failed(path, "file exists and overriding is disabled"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_failed(path, e))?;
    }

    match extension(path).as_deref() {
        Some("fits" | "fit" | "fts") => fits::save_fits(image, path)?,
        Some("tif" | "tiff") => image_io::save_tiff(image, path)?,
        Some("png") => image_io::save_png(image, path)?,
        other => {
            return Err(write_failed(
                path,
                format!("unsupported file extension {other:?}"),
            ))
        }
    }
    info!(path = %path.display(), "Image written");
    Ok(())
}

/// Image files in `dir` whose extension is one of `extensions`
/// (case-insensitive), sorted by path.
pub fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| unreadable(dir, e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| match extension(p) {
            Some(ext) => extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)),
            None => false,
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Numbered output path: `pattern` with the first `{}` replaced by `index`
/// zero-padded to three digits, e.g. `img_{}.fits` -> `img_007.fits`.
pub fn numbered_path(dir: &Path, pattern: &str, index: usize) -> PathBuf {
    dir.join(pattern.replacen("{}", &format!("{index:03}"), 1))
}
