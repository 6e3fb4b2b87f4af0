use std::path::Path;

use image::{GrayImage, ImageResult, Luma};
use ndarray::Array2;

use super::stretch::{sqrt_stretch, to_u8};

/// Convert an 8-bit array into a grayscale image; array row 0 becomes image
/// row 0
pub fn array2_to_gray_image(arr: &Array2<u8>) -> GrayImage {
    let (height, width) = arr.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([arr[[y as usize, x as usize]]])
    })
}

/// Save a sqrt-stretched 8-bit PNG preview of `data`.
///
/// FITS rows increase northward, so rows are flipped to put north at the top
/// of the picture.
pub fn save_preview_png(data: &Array2<f64>, path: &Path) -> ImageResult<()> {
    let mut pixels = to_u8(&sqrt_stretch(data));
    pixels.invert_axis(ndarray::Axis(0));
    array2_to_gray_image(&pixels.as_standard_layout().to_owned()).save(path)
}
