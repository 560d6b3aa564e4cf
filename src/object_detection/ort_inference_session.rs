use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;

/// An onnxruntime inference session.
///
/// The detector backends in this crate are wrappers around an ONNX inference
/// session that handles running the model on hardware. Running a session
/// needs exclusive access, so it sits behind a mutex and a shared detector
/// can serve callers from more than one thread.
pub struct OrtInferenceSession {
    pub session: Mutex<Session>,
}

impl OrtInferenceSession {
    pub fn new(model_path: &Path) -> ort::Result<Self> {
        let session = Session::builder()?.commit_from_file(model_path)?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}
