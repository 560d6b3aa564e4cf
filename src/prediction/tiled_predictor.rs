use std::path::Path;
use std::time::Instant;

use ab_glyph::FontVec;
use image::RgbImage;
use tracing::{debug, info};

use crate::annotations::detection::{Detection, RawDetection};
use crate::annotations::severity::Severity;
use crate::error::{ConfigError, PredictError};
use crate::image_utils::image_io::read_image_as_rgb8;
use crate::image_utils::tiling::split_image;
use crate::object_detection::detector::Detector;
use crate::object_detection::object_detection_utils::non_maximum_suppression;
use crate::prediction::annotate::{draw_detections, load_system_font};
use crate::prediction::disease_catalog::DiseaseCatalog;

/// IoU above which two pooled detections count as the same object.
pub const NMS_IOU_THRESHOLD: f32 = 0.45;

const MIN_TILE_SIZE: u32 = 32;
const MAX_TILE_SIZE: u32 = 2048;

/// Settings for a [`TiledPredictor`], checked once at construction.
#[derive(Clone, Copy, Debug)]
pub struct PredictorConfig {
    /// Side length of the square tiles the image is cut into.
    pub tile_size: u32,
    /// Fraction of a tile shared with its neighbors, in `[0.0, 0.9]`.
    pub overlap: f32,
    /// Detections scoring below this are dropped at inference time.
    pub conf_threshold: f32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig {
            tile_size: 640,
            overlap: 0.2,
            conf_threshold: 0.25,
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TILE_SIZE..=MAX_TILE_SIZE).contains(&self.tile_size) {
            return Err(ConfigError::TileSizeOutOfRange {
                tile_size: self.tile_size,
                min: MIN_TILE_SIZE,
                max: MAX_TILE_SIZE,
            });
        }
        if !(0.0..=0.9).contains(&self.overlap) {
            return Err(ConfigError::OverlapOutOfRange {
                overlap: self.overlap,
            });
        }
        if !(0.0..=1.0).contains(&self.conf_threshold) {
            return Err(ConfigError::ConfidenceThresholdOutOfRange {
                threshold: self.conf_threshold,
            });
        }
        Ok(())
    }
}

/// Everything one prediction run produces: the detections that survived the
/// cross-tile merge, and a copy of the input image with them drawn on.
pub struct Prediction {
    pub annotated_image: RgbImage,
    pub detections: Vec<Detection>,
}

/// Runs a detection model over large images by tiling.
///
/// Detection models take a fixed, fairly small input, so a large photo run
/// through one directly loses its small lesions to downscaling. The
/// predictor instead cuts the image into overlapping tiles, runs the
/// detector on each, shifts the per-tile boxes back into image coordinates
/// and merges duplicates from the overlap bands with non maximum
/// suppression. A run either completes fully or fails with the first error,
/// there are no partial results.
pub struct TiledPredictor<D: Detector> {
    detector: D,
    config: PredictorConfig,
    catalog: DiseaseCatalog,
    font: Option<FontVec>,
}

impl<D: Detector> TiledPredictor<D> {
    pub fn new(detector: D, config: PredictorConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(detector, config, DiseaseCatalog::default())
    }

    pub fn with_catalog(
        detector: D,
        config: PredictorConfig,
        catalog: DiseaseCatalog,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(TiledPredictor {
            detector,
            config,
            catalog,
            font: load_system_font(),
        })
    }

    /// Runs the full pipeline on an in-memory image.
    pub fn predict(&self, image: &RgbImage) -> Result<Prediction, PredictError> {
        let started = Instant::now();
        let tiles = split_image(image, self.config.tile_size, self.config.overlap)?;
        debug!(
            "Split {}x{} image into {} tiles",
            image.width(),
            image.height(),
            tiles.len()
        );

        let mut pooled: Vec<RawDetection> = Vec::new();
        for tile in &tiles {
            let raw = self.detector.infer(&tile.pixels, self.config.conf_threshold)?;
            debug!(
                "Tile at ({}, {}) produced {} detections",
                tile.placement.x1,
                tile.placement.y1,
                raw.len()
            );
            pooled.extend(
                raw.iter()
                    .map(|det| det.translate(tile.placement.x1 as f32, tile.placement.y1 as f32)),
            );
        }

        let detections = if pooled.is_empty() {
            Vec::new()
        } else {
            non_maximum_suppression(pooled, NMS_IOU_THRESHOLD)
                .into_iter()
                .map(|raw| self.structure(raw))
                .collect()
        };

        let annotated_image = draw_detections(image, &detections, self.font.as_ref());
        info!(
            "Found {} detections in {:.2?}",
            detections.len(),
            started.elapsed()
        );
        Ok(Prediction {
            annotated_image,
            detections,
        })
    }

    /// Reads an image from disk and runs the full pipeline on it.
    pub fn predict_file(&self, image_path: &Path) -> Result<Prediction, PredictError> {
        let image = read_image_as_rgb8(image_path)?;
        self.predict(&image)
    }

    fn structure(&self, raw: RawDetection) -> Detection {
        let original_class = match self.detector.class_names().get(raw.class_id) {
            Some(name) => name.clone(),
            None => raw.class_id.to_string(),
        };
        let label = self.catalog.label_for(&original_class);
        Detection {
            label,
            original_class,
            confidence: raw.confidence,
            bbox: raw.bbox,
            severity: Severity::from_confidence(raw.confidence),
        }
    }
}
