use std::borrow::Cow;
use std::path::Path;

use image::{RgbImage, imageops};
use ndarray::{Axis, Ix3};
use ort::inputs;
use ort::value::TensorRef;
use tracing::debug;

use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::RawDetection;
use crate::image_utils::image_conversion::convert_rgb_image_to_owned_array;
use crate::object_detection::detector::{Detector, DetectorError};
use crate::object_detection::ort_inference_session::OrtInferenceSession;

/// A YOLOv8 detection model running on onnxruntime.
///
/// The model is expected to take a normalized `(1, 3, input_height,
/// input_width)` tensor named `images` and produce a `(1, 4 + classes,
/// anchors)` tensor named `output0`, the layout ultralytics uses when
/// exporting to ONNX. Tiles of any size are accepted; they are resized to
/// the model's input size and the decoded boxes are scaled back, so the
/// coordinates returned are always in the tile's own pixel space.
pub struct Yolov8Detector {
    ort_session: OrtInferenceSession,
    class_names: Vec<String>,
    input_width: u32,
    input_height: u32,
    model_name: String,
}

impl Yolov8Detector {
    pub fn new(
        model_path: &Path,
        class_names: Vec<String>,
        input_width: u32,
        input_height: u32,
        model_name: String,
    ) -> ort::Result<Self> {
        let ort_session = OrtInferenceSession::new(model_path)?;
        debug!("Loaded detection model {} from {:?}", model_name, model_path);
        Ok(Yolov8Detector {
            ort_session,
            class_names,
            input_width,
            input_height,
            model_name,
        })
    }
}

impl Detector for Yolov8Detector {
    fn infer(
        &self,
        tile: &RgbImage,
        conf_threshold: f32,
    ) -> Result<Vec<RawDetection>, DetectorError> {
        let (tile_width, tile_height) = tile.dimensions();
        let input_image: Cow<'_, RgbImage> =
            if tile.dimensions() == (self.input_width, self.input_height) {
                Cow::Borrowed(tile)
            } else {
                Cow::Owned(imageops::resize(
                    tile,
                    self.input_width,
                    self.input_height,
                    imageops::FilterType::Triangle,
                ))
            };
        let input_array = convert_rgb_image_to_owned_array(&input_image);

        let mut session = self
            .ort_session
            .session
            .lock()
            .map_err(|_| DetectorError::PoisonedSession)?;
        let outputs =
            session.run(inputs!["images" => TensorRef::from_array_view(&input_array)?])?;
        let output = outputs["output0"].try_extract_array::<f32>()?;
        let output_shape = output.shape().to_vec();
        let output = output.into_dimensionality::<Ix3>().map_err(|_| {
            DetectorError::MalformedOutput(format!(
                "{}: expected a (1, attributes, anchors) output, got shape {:?}",
                self.model_name, output_shape
            ))
        })?;
        if output.shape()[0] != 1 || output.shape()[1] < 5 {
            return Err(DetectorError::MalformedOutput(format!(
                "{}: expected a single image with at least 5 attributes per anchor, got shape {:?}",
                self.model_name, output_shape
            )));
        }

        let width_ratio = tile_width as f32 / self.input_width as f32;
        let height_ratio = tile_height as f32 / self.input_height as f32;
        let mut detections: Vec<RawDetection> = Vec::new();
        for anchor in output.index_axis(Axis(0), 0).axis_iter(Axis(1)) {
            let best = anchor
                .iter()
                .skip(4) // skips bounding box coords.
                .copied()
                .enumerate()
                .reduce(|accum, candidate| if candidate.1 > accum.1 { candidate } else { accum });
            let Some((class_id, confidence)) = best else {
                continue;
            };
            if confidence < conf_threshold {
                continue;
            }
            let (x, y, w, h) = (anchor[0], anchor[1], anchor[2], anchor[3]);
            let bbox = BoundingBox::new(
                ((x - w / 2.0) * width_ratio).clamp(0.0, tile_width as f32),
                ((y - h / 2.0) * height_ratio).clamp(0.0, tile_height as f32),
                ((x + w / 2.0) * width_ratio).clamp(0.0, tile_width as f32),
                ((y + h / 2.0) * height_ratio).clamp(0.0, tile_height as f32),
            );
            detections.push(RawDetection::new(bbox, confidence, class_id));
        }
        Ok(detections)
    }

    fn class_names(&self) -> &[String] {
        &self.class_names
    }
}
