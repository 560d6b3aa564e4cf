use image::RgbImage;
use thiserror::Error;

use crate::annotations::detection::RawDetection;

/// Failures raised by a [`Detector`] backend.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("The inference session failed.")]
    Session(#[from] ort::Error),
    #[error("The inference session lock was poisoned by a panicking thread.")]
    PoisonedSession,
    #[error("The model returned output the decoder does not understand: {0}")]
    MalformedOutput(String),
}

/// A black-box detection model.
///
/// Implementations take an image tile and return every candidate detection
/// scoring at or above `conf_threshold`, with boxes in the tile's own pixel
/// coordinates. `class_names` gives meaning to the class ids carried by the
/// returned detections.
pub trait Detector {
    fn infer(
        &self,
        tile: &RgbImage,
        conf_threshold: f32,
    ) -> Result<Vec<RawDetection>, DetectorError>;

    fn class_names(&self) -> &[String];
}
