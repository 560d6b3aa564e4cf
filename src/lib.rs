//! Tiled plant disease detection.
//!
//! Detection models take a small fixed-size input, so running one directly
//! over a large field photo shrinks small lesions past recognition. This
//! crate cuts the image into overlapping fixed-size tiles, runs a detection
//! model on each tile, shifts the per-tile boxes back into image
//! coordinates, merges duplicates with non maximum suppression and reports
//! each surviving detection with a human-readable disease label, a severity
//! bucket derived from its confidence, and an annotated copy of the image.

pub mod annotations;
pub mod error;
pub mod image_utils;
pub mod object_detection;
pub mod prediction;

pub use annotations::bounding_box::BoundingBox;
pub use annotations::detection::{Detection, RawDetection};
pub use annotations::severity::Severity;
pub use error::{ConfigError, PredictError};
pub use object_detection::detector::{Detector, DetectorError};
pub use object_detection::yolov8::Yolov8Detector;
pub use prediction::disease_catalog::DiseaseCatalog;
pub use prediction::tiled_predictor::{
    NMS_IOU_THRESHOLD, Prediction, PredictorConfig, TiledPredictor,
};
