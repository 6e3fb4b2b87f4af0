//! FITS images with a TAN world-coordinate mapping
//!
//! Array row `r` holds FITS image row `r + 1` (no vertical flip), so array
//! indices line up with the zero-based pixel coordinates of [`Wcs`].

use std::path::Path;

use fitsio::compat::fitsfile::FitsFile;
use fitsio::compat::hdu::FitsHdu;
use fitsio::compat::images::{ImageDescription, ImageType, ReadImage, WriteImage};
use log::{debug, warn};
use ndarray::Array2;
use thiserror::Error;

use crate::wcs::{Wcs, WcsError};

#[derive(Error, Debug)]
pub enum FitsError {
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::compat::errors::Error),
    #[error("HDU not found: {0}")]
    HduNotFound(String),
    #[error("Invalid data type in HDU: {0}")]
    InvalidDataType(String),
    #[error("Invalid WCS: {0}")]
    Wcs(#[from] WcsError),
}

/// Read a 2D image and its WCS.
///
/// With `hdu_index == None` the first HDU holding a two-dimensional image is
/// used.
pub fn read_image_with_wcs<P: AsRef<Path>>(
    path: P,
    hdu_index: Option<usize>,
) -> Result<(Array2<f64>, Wcs), FitsError> {
    let fptr = FitsFile::open(&path)?;

    let (index, hdu) = match hdu_index {
        Some(index) => (
            index,
            fptr.hdu(index)
                .map_err(|_| FitsError::HduNotFound(format!("index {index}")))?,
        ),
        None => find_image_hdu(&fptr)?,
    };

    let naxis = hdu.read_key::<i64>(&fptr, "NAXIS").unwrap_or(0);
    if naxis != 2 {
        return Err(FitsError::InvalidDataType(format!(
            "HDU {index} has NAXIS = {naxis}, expected 2"
        )));
    }
    let naxis1 = hdu.read_key::<i64>(&fptr, "NAXIS1")? as usize;
    let naxis2 = hdu.read_key::<i64>(&fptr, "NAXIS2")? as usize;

    let pixels = f64::read_image(&fptr, &hdu)?;
    let data = Array2::from_shape_vec((naxis2, naxis1), pixels).map_err(|_| {
        FitsError::InvalidDataType(format!(
            "Cannot reshape HDU {index} to {naxis2}x{naxis1}"
        ))
    })?;

    for key in ["CTYPE1", "CTYPE2"] {
        match hdu.read_key::<String>(&fptr, key) {
            Ok(ctype) if !ctype.trim().ends_with("-TAN") => {
                return Err(WcsError::UnsupportedProjection(ctype.trim().to_string()).into());
            }
            Ok(_) => {}
            Err(_) => warn!("{key} missing in HDU {index}; assuming a TAN projection"),
        }
    }

    let wcs = Wcs::from_header(|key| hdu.read_key::<f64>(&fptr, key).ok())?;
    debug!(
        "Read {}x{} image from HDU {} of {}",
        naxis2,
        naxis1,
        index,
        path.as_ref().display()
    );

    Ok((data, wcs))
}

fn find_image_hdu(fptr: &FitsFile) -> Result<(usize, FitsHdu), FitsError> {
    let mut index = 0;
    while let Ok(hdu) = fptr.hdu(index) {
        if hdu.read_key::<i64>(fptr, "NAXIS").unwrap_or(0) == 2 {
            return Ok((index, hdu));
        }
        index += 1;
    }
    Err(FitsError::HduNotFound("no 2D image HDU".to_string()))
}

/// Write a double-precision image HDU carrying the TAN WCS keywords
pub fn write_image_with_wcs<P: AsRef<Path>>(
    path: P,
    data: &Array2<f64>,
    wcs: &Wcs,
    extname: &str,
) -> Result<(), FitsError> {
    let mut fptr = FitsFile::create(&path).overwrite().open()?;

    let (height, width) = data.dim();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: vec![width, height],
    };
    let hdu = fptr.create_image(extname, &description)?;

    let flat: Vec<f64> = data.iter().copied().collect();
    f64::write_image(&mut fptr, &hdu, &flat)?;

    hdu.write_key(&mut fptr, "EXTNAME", &extname.to_string())?;
    hdu.write_key(&mut fptr, "CTYPE1", &"RA---TAN".to_string())?;
    hdu.write_key(&mut fptr, "CTYPE2", &"DEC--TAN".to_string())?;
    for (key, value) in wcs.to_header_cards() {
        hdu.write_key(&mut fptr, key, &value)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{PixelCoord, SkyCoord};
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn sample_wcs() -> Wcs {
        Wcs::new(
            [12.5, 8.0],
            [65.00174, -54.93781],
            [[-1.1e-5, 1.0e-7], [2.0e-7, 1.1e-5]],
        )
        .unwrap()
    }

    #[test]
    fn test_fits_error_display() {
        let error = FitsError::HduNotFound("index 3".to_string());
        assert!(error.to_string().contains("HDU not found: index 3"));

        let error: FitsError = WcsError::MissingKeyword("CRVAL1").into();
        assert!(error.to_string().contains("CRVAL1"));
    }

    #[test]
    fn test_roundtrip_keeps_rows_and_wcs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mosaic.fits");

        let data = Array2::from_shape_fn((7, 11), |(r, c)| (r * 100 + c) as f64);
        let wcs = sample_wcs();
        write_image_with_wcs(&path, &data, &wcs, "SCI").unwrap();

        let (read, read_wcs) = read_image_with_wcs(&path, None).unwrap();

        assert_eq!(read.dim(), (7, 11));
        assert_relative_eq!(read[[0, 0]], 0.0);
        assert_relative_eq!(read[[6, 10]], 610.0);
        assert_relative_eq!(read[[2, 3]], 203.0);

        let pixel = PixelCoord::new(4.0, 3.0);
        let expected = wcs.pixel_to_world(&pixel);
        let actual = read_wcs.pixel_to_world(&pixel);
        assert!(expected.separation_deg(&actual) < 1e-9);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read_image_with_wcs(dir.path().join("absent.fits"), None).is_err());
    }

    #[test]
    fn test_written_cutout_wcs_still_points_at_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cutout.fits");
        let wcs = sample_wcs();
        let target = SkyCoord::from_degrees(65.00174, -54.93781);

        let sub = wcs.sliced(5.0, 2.0);
        write_image_with_wcs(&path, &Array2::zeros((4, 4)), &sub, "CUTOUT").unwrap();
        let (_, read_wcs) = read_image_with_wcs(&path, None).unwrap();

        let pixel = read_wcs.world_to_pixel(&target).unwrap();
        assert_relative_eq!(pixel.x, 11.5 - 5.0, epsilon = 1e-6);
        assert_relative_eq!(pixel.y, 7.0 - 2.0, epsilon = 1e-6);
    }
}
