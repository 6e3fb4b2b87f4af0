//! Display helpers for cutouts

pub mod image;
pub mod stretch;

pub use image::{array2_to_gray_image, save_preview_png};
pub use stretch::{sqrt_stretch, to_u8};
