//! Sky image utilities: TAN world-coordinate mapping, cutouts around sky
//! positions, FITS image loading and display previews.
//!
//! ```no_run
//! use sky_image::{cutout, CutoutSize, SizeUnit, SkyCoord};
//! use sky_image::io::read_image_with_wcs;
//!
//! let (image, wcs) = read_image_with_wcs("ngc1566_f555w.fits", None).unwrap();
//! let target: SkyCoord = "65.00174,-54.93781".parse().unwrap();
//! let size = CutoutSize::square(5.0, SizeUnit::Arcsec).unwrap();
//!
//! match cutout(&image, &wcs, &target, &size).unwrap().into_cutout() {
//!     Some(cut) => println!("cutout shape {:?}", cut.data.dim()),
//!     None => println!("target is off the image"),
//! }
//! ```

pub mod coords;
pub mod cutout;
pub mod image_proc;
pub mod io;
pub mod wcs;

pub use coords::{PixelCoord, SkyCoord};
pub use cutout::{
    cutout, cutout_with_config, extract_cutout, Cutout, CutoutConfig, CutoutError, CutoutResult,
    CutoutSize, SizeUnit,
};
pub use wcs::{Wcs, WcsError};
