use serde::{Deserialize, Serialize};
use std::fmt;

/// How far along a detected disease is judged to be.
///
/// The bucket is a pure function of the detection confidence: a model that is
/// very sure about a lesion has typically been shown a well-developed one, so
/// confidence doubles as a coarse severity proxy. Serializes to the bucket
/// name (`"High"`, `"Medium"`, `"Low"`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Buckets a confidence score: `>= 0.85` is High, `>= 0.65` Medium,
    /// anything below that Low.
    pub fn from_confidence(confidence: f32) -> Severity {
        if confidence >= 0.85 {
            Severity::High
        } else if confidence >= 0.65 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
        }
    }
}
