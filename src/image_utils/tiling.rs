use image::{Rgb, RgbImage, imageops};
use itertools::iproduct;

use crate::error::ConfigError;
use crate::image_utils::padding::pad_right_bottom_rgb8;

/// Fill for the bottom/right padding of edge tiles. Mid-gray is the letterbox
/// convention detection models are trained against, so padded regions do not
/// read as strong edges.
pub const TILE_PAD_COLOR: Rgb<u8> = Rgb([114, 114, 114]);

/// Where a tile's pixels came from in the source image.
///
/// The region is the un-padded crop `[x1, x2) x [y1, y2)` in original-image
/// pixel coordinates. Detections made on the tile move back into image space
/// by adding `(x1, y1)` to their corners.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TilePlacement {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl TilePlacement {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// A fixed-size square crop of the source image, padded wherever the image
/// ran out of pixels.
#[derive(Clone, Debug)]
pub struct Tile {
    pub pixels: RgbImage,
    pub placement: TilePlacement,
}

/// Splits an image into overlapping `tile_size` square tiles in raster-scan
/// order (rows top to bottom, columns left to right).
///
/// Candidate tile origins advance by `floor(tile_size * (1 - overlap))`
/// pixels. A tile that would hang past the far edge is pulled back flush
/// against it, so consecutive tiles overlap there even when `overlap` is
/// zero; origins whose pulled-back placement was already emitted are
/// dropped. When the image is smaller than one tile the crop is padded on
/// the bottom/right with [`TILE_PAD_COLOR`] up to exactly
/// `tile_size x tile_size`.
pub fn split_image(
    image: &RgbImage,
    tile_size: u32,
    overlap: f32,
) -> Result<Vec<Tile>, ConfigError> {
    let stride = (tile_size as f32 * (1.0 - overlap)) as u32;
    if stride == 0 {
        return Err(ConfigError::ZeroStride { tile_size, overlap });
    }
    let (width, height) = image.dimensions();

    let mut placements: Vec<TilePlacement> = Vec::new();
    for (y, x) in iproduct!(
        (0..height).step_by(stride as usize),
        (0..width).step_by(stride as usize)
    ) {
        let x2 = (x + tile_size).min(width);
        let y2 = (y + tile_size).min(height);
        let x1 = if x2 == width {
            x2.saturating_sub(tile_size)
        } else {
            x
        };
        let y1 = if y2 == height {
            y2.saturating_sub(tile_size)
        } else {
            y
        };
        let placement = TilePlacement { x1, y1, x2, y2 };
        if !placements.contains(&placement) {
            placements.push(placement);
        }
    }

    let tiles = placements
        .into_iter()
        .map(|placement| {
            let crop = imageops::crop_imm(
                image,
                placement.x1,
                placement.y1,
                placement.width(),
                placement.height(),
            )
            .to_image();
            let pixels = if placement.width() != tile_size || placement.height() != tile_size {
                pad_right_bottom_rgb8(&crop, tile_size, tile_size, TILE_PAD_COLOR)
            } else {
                crop
            };
            Tile { pixels, placement }
        })
        .collect();
    Ok(tiles)
}
