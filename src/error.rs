use std::path::PathBuf;

use thiserror::Error;

use crate::object_detection::detector::DetectorError;

/// Rejections raised while validating prediction settings, before any tile
/// is cut or any inference is run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Tile size ({tile_size}) is outside the supported range [{min}, {max}].")]
    TileSizeOutOfRange { tile_size: u32, min: u32, max: u32 },
    #[error("Overlap proportion ({overlap}) is outside the supported range [0.0, 0.9].")]
    OverlapOutOfRange { overlap: f32 },
    #[error("Confidence threshold ({threshold}) is outside the supported range [0.0, 1.0].")]
    ConfidenceThresholdOutOfRange { threshold: f32 },
    #[error("Tile size ({tile_size}) with overlap proportion ({overlap}) leaves a zero stride between tiles.")]
    ZeroStride { tile_size: u32, overlap: f32 },
}

/// A failed prediction run. Every variant is terminal: the run that raised
/// it produced no detections and no annotated image.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Could not load image {path:?}.")]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Inference failed while processing a tile.")]
    Inference(#[from] DetectorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_offending_value() {
        let err = ConfigError::TileSizeOutOfRange {
            tile_size: 16,
            min: 32,
            max: 2048,
        };
        assert_eq!(
            err.to_string(),
            "Tile size (16) is outside the supported range [32, 2048]."
        );

        let err = ConfigError::OverlapOutOfRange { overlap: 0.95 };
        assert!(err.to_string().contains("0.95"));
    }

    #[test]
    fn invalid_configuration_displays_the_inner_rejection() {
        let err = PredictError::from(ConfigError::ConfidenceThresholdOutOfRange { threshold: 1.5 });
        assert_eq!(
            err.to_string(),
            "Confidence threshold (1.5) is outside the supported range [0.0, 1.0]."
        );
    }
}
