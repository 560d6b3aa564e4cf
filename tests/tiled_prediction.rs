use image::{Rgb, RgbImage};
use serde_json::json;
use tempfile::tempdir;

use leafspot::{
    BoundingBox, Detector, DetectorError, PredictError, PredictorConfig, RawDetection, Severity,
    TiledPredictor,
};

/// Reports one fixed box per tile, whatever the pixels say.
struct OneBoxDetector {
    confidence: f32,
    class_names: Vec<String>,
}

impl OneBoxDetector {
    fn new(confidence: f32) -> Self {
        OneBoxDetector {
            confidence,
            class_names: vec![String::from("Cf_r_spot")],
        }
    }
}

impl Detector for OneBoxDetector {
    fn infer(
        &self,
        _tile: &RgbImage,
        _conf_threshold: f32,
    ) -> Result<Vec<RawDetection>, DetectorError> {
        Ok(vec![RawDetection::new(
            BoundingBox::new(10.0, 10.0, 30.0, 30.0),
            self.confidence,
            0,
        )])
    }

    fn class_names(&self) -> &[String] {
        &self.class_names
    }
}

struct SilentDetector;

impl Detector for SilentDetector {
    fn infer(
        &self,
        _tile: &RgbImage,
        _conf_threshold: f32,
    ) -> Result<Vec<RawDetection>, DetectorError> {
        Ok(Vec::new())
    }

    fn class_names(&self) -> &[String] {
        &[]
    }
}

fn leaf_image() -> RgbImage {
    let mut image = RgbImage::from_pixel(100, 80, Rgb([30, 90, 30]));
    image.put_pixel(50, 40, Rgb([200, 180, 40]));
    image
}

#[test]
fn predicts_from_a_file_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaf.png");
    leaf_image().save(&path).unwrap();

    let predictor =
        TiledPredictor::new(OneBoxDetector::new(0.7), PredictorConfig::default()).unwrap();
    let prediction = predictor.predict_file(&path).unwrap();

    assert_eq!(prediction.detections.len(), 1);
    let det = &prediction.detections[0];
    assert_eq!(det.bbox, BoundingBox::new(10.0, 10.0, 30.0, 30.0));
    assert_eq!(det.label, "Cauliflower Ring Spot Disease");
    assert_eq!(det.original_class, "Cf_r_spot");
    assert_eq!(det.severity, Severity::Medium);

    assert_eq!(prediction.annotated_image.dimensions(), (100, 80));
    assert_eq!(
        prediction.annotated_image.get_pixel(10, 10),
        &Rgb([0, 255, 0])
    );
}

#[test]
fn missing_file_fails_with_invalid_image() {
    let predictor =
        TiledPredictor::new(OneBoxDetector::new(0.7), PredictorConfig::default()).unwrap();
    let result = predictor.predict_file(std::path::Path::new("./no_such_leaf.png"));
    assert!(matches!(result, Err(PredictError::InvalidImage { .. })));
}

#[test]
fn no_detections_returns_the_input_image_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaf.png");
    let image = leaf_image();
    image.save(&path).unwrap();

    let predictor = TiledPredictor::new(SilentDetector, PredictorConfig::default()).unwrap();
    let prediction = predictor.predict_file(&path).unwrap();
    assert!(prediction.detections.is_empty());
    assert_eq!(prediction.annotated_image, image);
}

#[test]
fn detection_records_serialize_with_wire_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaf.png");
    leaf_image().save(&path).unwrap();

    let predictor =
        TiledPredictor::new(OneBoxDetector::new(0.7), PredictorConfig::default()).unwrap();
    let prediction = predictor.predict_file(&path).unwrap();

    let records = serde_json::to_value(&prediction.detections).unwrap();
    let record = &records[0];
    assert_eq!(record["class"], json!("Cauliflower Ring Spot Disease"));
    assert_eq!(record["original_class"], json!("Cf_r_spot"));
    assert_eq!(record["bbox"], json!([10.0, 10.0, 30.0, 30.0]));
    assert_eq!(record["severity"], json!("Medium"));
    let confidence = record["confidence"].as_f64().unwrap();
    assert!((confidence - 0.7).abs() < 1e-6);
}
