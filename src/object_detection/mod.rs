pub mod detector;
pub mod object_detection_utils;
pub mod ort_inference_session;
pub mod yolov8;
