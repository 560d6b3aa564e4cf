use ab_glyph::{Font, FontVec, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{info, warn};

use crate::annotations::detection::Detection;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const LABEL_BACKGROUND_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

const BOX_THICKNESS: i32 = 2;

const LABEL_SCALE: f32 = 16.0;

/// Vertical gap between a box corner and its label baseline.
const LABEL_OFFSET: i32 = 10;

const LABEL_PADDING: i32 = 2;

/// Tries to load a font from the usual system locations. Returns `None` when
/// no parseable font is installed, in which case annotated images carry
/// bounding boxes without text labels.
pub fn load_system_font() -> Option<FontVec> {
    let font_paths = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in &font_paths {
        if let Ok(font_data) = std::fs::read(path)
            && let Ok(font) = FontVec::try_from_vec(font_data)
        {
            info!("Loaded system font: {}", path);
            return Some(font);
        }
    }

    warn!("No system font found, annotated images will carry boxes without labels");
    None
}

/// Draws every detection onto a copy of `image`: a green box around the
/// region, and when a font is available, the detection's label on a filled
/// background. Labels sit above the box when there is room, below it
/// otherwise.
pub fn draw_detections(
    image: &RgbImage,
    detections: &[Detection],
    font: Option<&FontVec>,
) -> RgbImage {
    let mut annotated = image.clone();
    for detection in detections {
        draw_box(&mut annotated, detection);
        if let Some(font) = font {
            draw_label(&mut annotated, detection, font);
        }
    }
    annotated
}

fn draw_box(image: &mut RgbImage, detection: &Detection) {
    let left = detection.bbox.x1 as i32;
    let top = detection.bbox.y1 as i32;
    let width = ((detection.bbox.x2 as i32) - left).max(1) as u32;
    let height = ((detection.bbox.y2 as i32) - top).max(1) as u32;

    for thickness in 0..BOX_THICKNESS {
        let ring = Rect::at(left - thickness, top - thickness).of_size(
            width + (2 * thickness) as u32,
            height + (2 * thickness) as u32,
        );
        draw_hollow_rect_mut(image, ring, BOX_COLOR);
    }
}

fn draw_label(image: &mut RgbImage, detection: &Detection, font: &FontVec) {
    let label = detection.annotation_label();
    let label_width = measure_text_width(&label, font, LABEL_SCALE).ceil() as i32;
    let label_height = LABEL_SCALE as i32;

    let text_x = detection.bbox.x1 as i32;
    let anchor_y = detection.bbox.y1 as i32;
    let baseline_y = if anchor_y - LABEL_OFFSET > label_height {
        anchor_y - LABEL_OFFSET
    } else {
        anchor_y + LABEL_OFFSET + label_height
    };
    let text_top = baseline_y - label_height;

    let background = Rect::at(text_x, text_top - LABEL_PADDING).of_size(
        label_width.max(1) as u32,
        (label_height + 2 * LABEL_PADDING) as u32,
    );
    draw_filled_rect_mut(image, background, LABEL_BACKGROUND_COLOR);
    draw_text_mut(
        image,
        LABEL_TEXT_COLOR,
        text_x,
        text_top,
        LABEL_SCALE,
        font,
        &label,
    );
}

fn measure_text_width(text: &str, font: &FontVec, scale: f32) -> f32 {
    let scaled_font = font.as_scaled(scale);
    text.chars()
        .map(|ch| scaled_font.h_advance(scaled_font.scaled_glyph(ch).id))
        .sum()
}
