use std::fs;
use std::path::Path;

use image::{self, ImageError, RgbImage};

use crate::error::PredictError;

/// Reads an image from disk as rgb8, failing with
/// [`PredictError::InvalidImage`] when the file is missing or its bytes do
/// not decode.
pub fn read_image_as_rgb8(filepath: &Path) -> Result<RgbImage, PredictError> {
    image::open(filepath)
        .map(|img| img.into_rgb8())
        .map_err(|source| PredictError::InvalidImage {
            path: filepath.to_path_buf(),
            source,
        })
}

/// Writes an rgb8 image to disk, creating missing parent directories first.
/// The encoding is chosen from the file extension.
pub fn save_image(image: &RgbImage, filepath: &Path) -> Result<(), ImageError> {
    if let Some(parent) = filepath.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ImageError::IoError)?;
        }
    }
    image.save(filepath)
}
