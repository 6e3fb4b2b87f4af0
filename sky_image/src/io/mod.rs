//! File input and output

pub mod fits;

pub use fits::{read_image_with_wcs, write_image_with_wcs, FitsError};
