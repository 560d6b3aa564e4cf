use serde::{Deserialize, Serialize};

use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::severity::Severity;

/// A single box produced by the detector for one tile, before any
/// post-processing.
///
/// Coordinates are in the coordinate system of whatever image the detector
/// was handed. `class_id` indexes into the detector's class list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawDetection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: usize,
}

impl RawDetection {
    pub const fn new(bbox: BoundingBox, confidence: f32, class_id: usize) -> Self {
        RawDetection {
            bbox,
            confidence,
            class_id,
        }
    }

    /// Shifts the box by `(dx, dy)`, e.g. from tile-local coordinates into
    /// the coordinate system of the full image the tile was cut from.
    pub fn translate(&self, dx: f32, dy: f32) -> RawDetection {
        RawDetection {
            bbox: self.bbox.translate(dx, dy),
            ..*self
        }
    }
}

/// A fully resolved detection in full-image coordinates.
///
/// `label` carries the human-readable disease description looked up from the
/// catalog, while `original_class` keeps the raw model class name so the
/// mapping stays auditable. Serializes with the label under the key `class`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub label: String,
    pub original_class: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
    pub severity: Severity,
}

impl Detection {
    /// The text drawn next to the box on the annotated image, e.g.
    /// `"Cauliflower Black Rot Disease (High) 0.91"`.
    pub fn annotation_label(&self) -> String {
        format!("{} ({}) {:.2}", self.label, self.severity, self.confidence)
    }
}
