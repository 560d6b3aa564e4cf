use image::{Rgb, RgbImage, imageops};

/// Grows an rgb8 image to `new_width x new_height` by filling the new pixels
/// on the right and bottom with `fill`, keeping the original anchored at the
/// top-left.
pub fn pad_right_bottom_rgb8(
    original_image: &RgbImage,
    new_width: u32,
    new_height: u32,
    fill: Rgb<u8>,
) -> RgbImage {
    let mut padded_image = RgbImage::from_pixel(new_width, new_height, fill);
    imageops::replace(&mut padded_image, original_image, 0, 0);
    padded_image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_right_and_bottom_with_fill() {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
        img.put_pixel(1, 1, Rgb([1, 2, 3]));
        let padded = pad_right_bottom_rgb8(&img, 4, 3, Rgb([114, 114, 114]));
        assert_eq!(padded.dimensions(), (4, 3));
        assert_eq!(padded.get_pixel(0, 0), &Rgb([10, 20, 30]));
        assert_eq!(padded.get_pixel(1, 1), &Rgb([1, 2, 3]));
        assert_eq!(padded.get_pixel(2, 0), &Rgb([114, 114, 114]));
        assert_eq!(padded.get_pixel(0, 2), &Rgb([114, 114, 114]));
        assert_eq!(padded.get_pixel(3, 2), &Rgb([114, 114, 114]));
    }

    #[test]
    fn padding_to_the_same_size_is_identity() {
        let img = RgbImage::from_pixel(3, 3, Rgb([5, 5, 5]));
        let padded = pad_right_bottom_rgb8(&img, 3, 3, Rgb([114, 114, 114]));
        assert_eq!(padded, img);
    }
}
