use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info};
use walkdir::WalkDir;

use leafspot::image_utils::image_io::save_image;
use leafspot::object_detection::object_detection_utils::read_classes_txt_file;
use leafspot::prediction::tiled_predictor::Prediction;
use leafspot::{DiseaseCatalog, PredictorConfig, TiledPredictor, Yolov8Detector};

/// Tiled plant disease detection over large images.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the ONNX detection model.
    #[arg(long, value_name = "FILE", default_value = "./data/models/cauliflower.onnx")]
    model: PathBuf,

    /// File with one class name per line, ordered by model class id.
    #[arg(
        long,
        value_name = "FILE",
        default_value = "./data/model_metadata/cauliflower-classes.txt"
    )]
    classes: PathBuf,

    /// Optional JSON file overriding the built-in disease description catalog.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Image file, or directory of images, to run detection on.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory the annotated images and detection records are written to.
    #[arg(long, value_name = "DIR", default_value = "./predictions")]
    output: PathBuf,

    /// Side length of the square tiles the image is cut into.
    #[arg(long, default_value_t = 640, value_name = "PIXELS")]
    tile_size: u32,

    /// Fraction of a tile shared with its neighbors (0.0 - 0.9).
    #[arg(long, default_value_t = 0.2, value_name = "FRACTION")]
    overlap: f32,

    /// Confidence threshold below which detections are dropped (0.0 - 1.0).
    #[arg(long, default_value_t = 0.25, value_name = "THRESHOLD")]
    conf_threshold: f32,

    /// Side length of the square input the model was exported with.
    #[arg(long, default_value_t = 640, value_name = "PIXELS")]
    model_input_size: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if !args.model.exists() {
        return Err(
            format!("Model path does not exist, or cannot be read: {:?}", args.model).into(),
        );
    }
    if !args.classes.exists() {
        return Err(
            format!("Classes path does not exist, or cannot be read: {:?}", args.classes).into(),
        );
    }
    if !args.input.exists() {
        return Err(
            format!("Input path does not exist, or cannot be read: {:?}", args.input).into(),
        );
    }

    let detector = Yolov8Detector::new(
        &args.model,
        read_classes_txt_file(&args.classes)?,
        args.model_input_size,
        args.model_input_size,
        "cauliflower yolov8 onnx".to_string(),
    )?;
    let catalog = match &args.catalog {
        Some(path) => DiseaseCatalog::from_json_file(path)?,
        None => DiseaseCatalog::default(),
    };
    let config = PredictorConfig {
        tile_size: args.tile_size,
        overlap: args.overlap,
        conf_threshold: args.conf_threshold,
    };
    let predictor = TiledPredictor::with_catalog(detector, config, catalog)?;

    let image_paths = collect_image_paths(&args.input);
    if image_paths.is_empty() {
        info!("No images found under {:?}", args.input);
        return Ok(());
    }

    let mut failures = 0_usize;
    for path in &image_paths {
        match predictor.predict_file(path) {
            Ok(prediction) => write_outputs(path, &prediction, &args.output)?,
            Err(err) => {
                error!("{:?}: {}", path, err);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return Err(format!("{} of {} images failed", failures, image_paths.len()).into());
    }
    Ok(())
}

/// A single image path as-is, or every image file under a directory in path
/// order.
fn collect_image_paths(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    let mut paths: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_image_extension(path))
        .collect();
    paths.sort();
    paths
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "bmp" | "webp"
            )
        })
}

/// Writes `<stem>_detected.<ext>` and `<stem>_detections.json` into the
/// output directory.
fn write_outputs(
    image_path: &Path,
    prediction: &Prediction,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let stem = image_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");
    let extension = image_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png");

    let annotated_path = output_dir.join(format!("{}_detected.{}", stem, extension));
    save_image(&prediction.annotated_image, &annotated_path)?;
    let records_path = output_dir.join(format!("{}_detections.json", stem));
    fs::write(
        &records_path,
        serde_json::to_string_pretty(&prediction.detections)?,
    )?;
    info!(
        "{:?}: {} detections -> {:?}",
        image_path,
        prediction.detections.len(),
        annotated_path
    );
    Ok(())
}
