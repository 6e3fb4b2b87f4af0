//! FITS mosaic to cutout, end to end

use approx::assert_relative_eq;
use ndarray::Array2;
use sky_image::image_proc::save_preview_png;
use sky_image::io::{read_image_with_wcs, write_image_with_wcs};
use sky_image::{cutout, CutoutSize, PixelCoord, SizeUnit, SkyCoord, Wcs};
use tempfile::tempdir;

/// Gaussian source at pixel (x, y) on a flat background
fn star_field(width: usize, height: usize, x: f64, y: f64) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(r, c)| {
        let dx = c as f64 - x;
        let dy = r as f64 - y;
        10.0 + 1000.0 * (-(dx * dx + dy * dy) / (2.0 * 1.5 * 1.5)).exp()
    })
}

#[test]
fn cutout_from_fits_is_centred_on_the_source() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().unwrap();
    let mosaic = dir.path().join("mosaic.fits");

    let wcs = Wcs::north_up(
        PixelCoord::new(60.0, 40.0),
        SkyCoord::from_degrees(65.00174, -54.93781),
        0.04,
    )
    .unwrap();
    let (star_x, star_y) = (83.0, 27.0);
    write_image_with_wcs(&mosaic, &star_field(120, 80, star_x, star_y), &wcs, "SCI").unwrap();

    let (image, read_wcs) = read_image_with_wcs(&mosaic, None).unwrap();
    let star = read_wcs.pixel_to_world(&PixelCoord::new(star_x, star_y));

    // 0.6" at 0.04"/pix is 15 pixels
    let size = CutoutSize::square(0.6, SizeUnit::Arcsec).unwrap();
    let cut = cutout(&image, &read_wcs, &star, &size)
        .unwrap()
        .into_cutout()
        .expect("star is on the image");

    assert_eq!(cut.data.dim(), (15, 15));
    let peak = cut
        .data
        .indexed_iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .unwrap();
    assert_eq!(peak, (7, 7));
    assert_relative_eq!(cut.position_cutout.x, 7.0, epsilon = 1e-6);

    let preview = dir.path().join("star.png");
    save_preview_png(&cut.data, &preview).unwrap();
    assert!(preview.exists());
}

#[test]
fn target_off_the_mosaic_gives_no_cutout() {
    let wcs = Wcs::north_up(
        PixelCoord::new(10.0, 10.0),
        SkyCoord::from_degrees(150.0, 2.0),
        0.1,
    )
    .unwrap();
    let image = Array2::zeros((20, 20));
    let elsewhere = SkyCoord::from_degrees(150.0, 2.01);
    let size = CutoutSize::square(1.0, SizeUnit::Arcsec).unwrap();

    let result = cutout(&image, &wcs, &elsewhere, &size).unwrap();
    assert!(!result.is_valid());
}
