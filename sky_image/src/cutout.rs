//! Rectangular cutouts around a sky position.
//!
//! A cutout is centred on the pixel that the world-coordinate mapping assigns
//! to the requested sky position. Cells of the cutout that fall past the
//! image edge are filled with a fill value (NaN by default), so a cutout
//! always has exactly the requested shape. Positions that do not project
//! strictly inside the image produce [`CutoutResult::OutOfBounds`] and a
//! logged warning instead of an error.

use log::{debug, warn};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::{PixelCoord, SkyCoord};
use crate::wcs::Wcs;

#[derive(Debug, Error, PartialEq)]
pub enum CutoutError {
    #[error("Cutout size must have one or two elements, got {0}")]
    InvalidShape(usize),

    #[error("Cutout size must be positive and finite, got {0}")]
    InvalidSize(f64),

    #[error("Cutout size {value} {unit} is smaller than one pixel")]
    BelowOnePixel { value: f64, unit: SizeUnit },

    #[error("Cutout of {ny}x{nx} pixels is too large to allocate")]
    TooLarge { ny: usize, nx: usize },
}

/// Default cap on the number of cutout pixels (2 GiB of `f64`)
pub const DEFAULT_MAX_PIXELS: usize = 1 << 28;

/// Unit of a [`CutoutSize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeUnit {
    Pixels,
    Arcsec,
}

impl std::fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeUnit::Pixels => write!(f, "pix"),
            SizeUnit::Arcsec => write!(f, "arcsec"),
        }
    }
}

/// Requested box size, ordered `(ny, nx)` like the array shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoutSize {
    pub ny: f64,
    pub nx: f64,
    pub unit: SizeUnit,
}

impl CutoutSize {
    /// Square box
    pub fn square(side: f64, unit: SizeUnit) -> Result<Self, CutoutError> {
        Self::new(side, side, unit)
    }

    pub fn new(ny: f64, nx: f64, unit: SizeUnit) -> Result<Self, CutoutError> {
        for value in [ny, nx] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CutoutError::InvalidSize(value));
            }
        }
        Ok(Self { ny, nx, unit })
    }

    /// Build from a slice: one value is used for both axes, two values are
    /// read as `[ny, nx]`. Any other length is rejected.
    pub fn from_values(values: &[f64], unit: SizeUnit) -> Result<Self, CutoutError> {
        match values {
            [side] => Self::square(*side, unit),
            [ny, nx] => Self::new(*ny, *nx, unit),
            _ => Err(CutoutError::InvalidShape(values.len())),
        }
    }

    /// Size in whole pixels as `(ny, nx)`, using the WCS pixel scales for
    /// angular sizes
    pub fn to_pixels(&self, wcs: &Wcs) -> Result<(usize, usize), CutoutError> {
        let (ny, nx) = match self.unit {
            SizeUnit::Pixels => (self.ny, self.nx),
            SizeUnit::Arcsec => {
                let (scale_x, scale_y) = wcs.pixel_scales_deg();
                (
                    self.ny / (scale_y * 3600.0),
                    self.nx / (scale_x * 3600.0),
                )
            }
        };

        let round = |pixels: f64, value: f64| {
            let n = pixels.round();
            if n < 1.0 {
                Err(CutoutError::BelowOnePixel {
                    value,
                    unit: self.unit,
                })
            } else {
                Ok(n as usize)
            }
        };

        Ok((round(ny, self.ny)?, round(nx, self.nx)?))
    }
}

/// Cutout tuning knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoutConfig {
    /// Value written into cells that lie outside the source image
    pub fill_value: f64,
    /// Largest accepted `ny * nx`
    pub max_pixels: usize,
}

impl Default for CutoutConfig {
    fn default() -> Self {
        Self {
            fill_value: f64::NAN,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// Extracted sub-image and its mapping
#[derive(Debug, Clone)]
pub struct Cutout<T> {
    pub data: Array2<T>,
    /// Mapping for `data`, shifted to the cutout origin
    pub wcs: Wcs,
    /// Zero-based pixel of the source image that became `data[[0, 0]]`.
    /// May be negative when the box overhangs the lower edges.
    pub origin_original: (i64, i64),
    /// Requested position in source-image pixels
    pub position_original: PixelCoord,
    /// Requested position in cutout pixels
    pub position_cutout: PixelCoord,
}

/// Outcome of a cutout request
#[derive(Debug, Clone)]
pub enum CutoutResult<T> {
    Inside(Cutout<T>),
    /// The position does not project strictly inside the source image
    OutOfBounds,
}

impl<T> CutoutResult<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, CutoutResult::Inside(_))
    }

    pub fn as_cutout(&self) -> Option<&Cutout<T>> {
        match self {
            CutoutResult::Inside(cutout) => Some(cutout),
            CutoutResult::OutOfBounds => None,
        }
    }

    pub fn into_cutout(self) -> Option<Cutout<T>> {
        match self {
            CutoutResult::Inside(cutout) => Some(cutout),
            CutoutResult::OutOfBounds => None,
        }
    }
}

/// Cut a box of `size` centred on `coord` out of `image`, NaN-filling any
/// overhang
pub fn cutout(
    image: &Array2<f64>,
    wcs: &Wcs,
    coord: &SkyCoord,
    size: &CutoutSize,
) -> Result<CutoutResult<f64>, CutoutError> {
    cutout_with_config(image, wcs, coord, size, &CutoutConfig::default())
}

pub fn cutout_with_config(
    image: &Array2<f64>,
    wcs: &Wcs,
    coord: &SkyCoord,
    size: &CutoutSize,
    config: &CutoutConfig,
) -> Result<CutoutResult<f64>, CutoutError> {
    let (ny, nx) = size.to_pixels(wcs)?;
    if ny.checked_mul(nx).map_or(true, |n| n > config.max_pixels) {
        return Err(CutoutError::TooLarge { ny, nx });
    }
    extract_cutout(image.view(), wcs, coord, size, config.fill_value)
}

/// Generic form of [`cutout`] for any pixel type.
///
/// The size is validated before the position, so an invalid size is an
/// error even for positions off the image. Shapes whose byte count does not
/// fit in `isize` are rejected with [`CutoutError::TooLarge`].
pub fn extract_cutout<T: Copy>(
    image: ArrayView2<T>,
    wcs: &Wcs,
    coord: &SkyCoord,
    size: &CutoutSize,
    fill: T,
) -> Result<CutoutResult<T>, CutoutError> {
    let (ny, nx) = size.to_pixels(wcs)?;
    let bytes = ny
        .checked_mul(nx)
        .and_then(|n| n.checked_mul(std::mem::size_of::<T>().max(1)));
    if bytes.map_or(true, |b| b > isize::MAX as usize) {
        return Err(CutoutError::TooLarge { ny, nx });
    }
    let (height, width) = image.dim();

    let position = match wcs.world_to_pixel(coord) {
        Some(p) if is_strictly_inside(&p, width, height) => p,
        Some(p) => {
            warn!(
                "{} projects to pixel ({:.2}, {:.2}), outside the {}x{} image; no cutout made",
                coord, p.x, p.y, width, height
            );
            return Ok(CutoutResult::OutOfBounds);
        }
        None => {
            warn!("{coord} does not project onto the image plane; no cutout made");
            return Ok(CutoutResult::OutOfBounds);
        }
    };

    let x0 = (position.x - nx as f64 / 2.0).ceil() as i64;
    let y0 = (position.y - ny as f64 / 2.0).ceil() as i64;
    debug!("cutout {ny}x{nx} at origin ({x0}, {y0}) around ({:.2}, {:.2})", position.x, position.y);

    let data = Array2::from_shape_fn((ny, nx), |(row, col)| {
        let y = y0 + row as i64;
        let x = x0 + col as i64;
        if (0..height as i64).contains(&y) && (0..width as i64).contains(&x) {
            image[[y as usize, x as usize]]
        } else {
            fill
        }
    });

    Ok(CutoutResult::Inside(Cutout {
        data,
        wcs: wcs.sliced(x0 as f64, y0 as f64),
        origin_original: (x0, y0),
        position_original: position,
        position_cutout: PixelCoord::new(position.x - x0 as f64, position.y - y0 as f64),
    }))
}

/// Open interval check: positions on the image border count as outside
fn is_strictly_inside(p: &PixelCoord, width: usize, height: usize) -> bool {
    p.x > 0.0 && p.x < width as f64 && p.y > 0.0 && p.y < height as f64
}
