//! Gnomonic (TAN) world-coordinate mapping.
//!
//! Implements the FITS WCS pixel ↔ sky transformation for the `RA---TAN` /
//! `DEC--TAN` projection, the projection used by HST drizzled mosaics:
//!
//! ```text
//! (ξ, η) = CD · (p − CRPIX)          intermediate world coordinates, degrees
//! (α, δ) = TAN⁻¹(ξ, η; CRVAL)        gnomonic deprojection about CRVAL
//! ```
//!
//! Pixel positions exchanged with callers are zero-based (array indices),
//! while `crpix` keeps the one-based FITS convention so that header values can
//! be copied in and out unchanged.
//!
//! Reference: Calabretta & Greisen (2002), FITS WCS Paper II, §5.1.3.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::{PixelCoord, SkyCoord};

/// Errors raised while building a [`Wcs`]
#[derive(Debug, Error, PartialEq)]
pub enum WcsError {
    #[error("CD matrix is singular")]
    SingularMatrix,

    #[error("Non-finite WCS parameter: {0}")]
    NonFinite(&'static str),

    #[error("Missing WCS keyword: {0}")]
    MissingKeyword(&'static str),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),
}

/// TAN projection WCS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wcs {
    /// Reference pixel, one-based (CRPIX1, CRPIX2)
    crpix: [f64; 2],
    /// Sky position of the reference pixel in degrees (CRVAL1, CRVAL2)
    crval: [f64; 2],
    /// Pixel to intermediate-world matrix in degrees per pixel, row-major
    /// `[[CD1_1, CD1_2], [CD2_1, CD2_2]]`
    cd: [[f64; 2]; 2],
}

impl Wcs {
    /// Build a WCS from header-style parameters
    ///
    /// # Arguments
    /// * `crpix` - One-based reference pixel
    /// * `crval` - Reference sky position `[ra, dec]` in degrees
    /// * `cd` - CD matrix in degrees per pixel
    pub fn new(crpix: [f64; 2], crval: [f64; 2], cd: [[f64; 2]; 2]) -> Result<Self, WcsError> {
        if !crpix.iter().all(|v| v.is_finite()) {
            return Err(WcsError::NonFinite("CRPIX"));
        }
        if !crval.iter().all(|v| v.is_finite()) {
            return Err(WcsError::NonFinite("CRVAL"));
        }
        if !cd.iter().flatten().all(|v| v.is_finite()) {
            return Err(WcsError::NonFinite("CD"));
        }

        let wcs = Self { crpix, crval, cd };
        if wcs.cd_matrix().try_inverse().is_none() {
            return Err(WcsError::SingularMatrix);
        }
        Ok(wcs)
    }

    /// North-up, east-left WCS with square pixels.
    ///
    /// `center` is the zero-based pixel that maps onto `crval`.
    pub fn north_up(center: PixelCoord, crval: SkyCoord, pixel_scale_arcsec: f64) -> Result<Self, WcsError> {
        let scale_deg = pixel_scale_arcsec / 3600.0;
        Self::new(
            [center.x + 1.0, center.y + 1.0],
            [crval.ra_deg, crval.dec_deg],
            [[-scale_deg, 0.0], [0.0, scale_deg]],
        )
    }

    /// Build a WCS from numeric FITS header keywords.
    ///
    /// Accepts, in order of preference, a CD matrix (`CD1_1`..`CD2_2`),
    /// `CDELTi` with a `PCi_j` matrix, or `CDELTi` with `CROTA2`. Missing
    /// off-diagonal CD / PC terms default to zero and a missing `CROTA2`
    /// to no rotation. Checking `CTYPEi` is up to the caller.
    pub fn from_header<F>(lookup: F) -> Result<Self, WcsError>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let require = |key: &'static str| lookup(key).ok_or(WcsError::MissingKeyword(key));

        let crpix = [require("CRPIX1")?, require("CRPIX2")?];
        let crval = [require("CRVAL1")?, require("CRVAL2")?];

        let cd = if let Some(cd11) = lookup("CD1_1") {
            [
                [cd11, lookup("CD1_2").unwrap_or(0.0)],
                [lookup("CD2_1").unwrap_or(0.0), require("CD2_2")?],
            ]
        } else {
            let cdelt1 = require("CDELT1")?;
            let cdelt2 = require("CDELT2")?;

            let pc = if lookup("PC1_1").is_some() || lookup("PC2_2").is_some() {
                [
                    [lookup("PC1_1").unwrap_or(1.0), lookup("PC1_2").unwrap_or(0.0)],
                    [lookup("PC2_1").unwrap_or(0.0), lookup("PC2_2").unwrap_or(1.0)],
                ]
            } else {
                let rho = lookup("CROTA2").unwrap_or(0.0).to_radians();
                let (sin_rho, cos_rho) = rho.sin_cos();
                // AIPS convention, expressed as a PC matrix
                [
                    [cos_rho, -sin_rho * cdelt2 / cdelt1],
                    [sin_rho * cdelt1 / cdelt2, cos_rho],
                ]
            };

            [
                [cdelt1 * pc[0][0], cdelt1 * pc[0][1]],
                [cdelt2 * pc[1][0], cdelt2 * pc[1][1]],
            ]
        };

        Self::new(crpix, crval, cd)
    }

    /// Header cards describing this WCS, ready to be written back out
    pub fn to_header_cards(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("CRPIX1", self.crpix[0]),
            ("CRPIX2", self.crpix[1]),
            ("CRVAL1", self.crval[0]),
            ("CRVAL2", self.crval[1]),
            ("CD1_1", self.cd[0][0]),
            ("CD1_2", self.cd[0][1]),
            ("CD2_1", self.cd[1][0]),
            ("CD2_2", self.cd[1][1]),
        ]
    }

    pub fn crpix(&self) -> [f64; 2] {
        self.crpix
    }

    pub fn crval(&self) -> SkyCoord {
        SkyCoord::from_degrees(self.crval[0], self.crval[1])
    }

    pub fn cd(&self) -> [[f64; 2]; 2] {
        self.cd
    }

    fn cd_matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.cd[0][0], self.cd[0][1], self.cd[1][0], self.cd[1][1])
    }

    /// Projected pixel scales along the pixel x and y axes, degrees per pixel.
    ///
    /// These are the column norms of the CD matrix.
    pub fn pixel_scales_deg(&self) -> (f64, f64) {
        let x = (self.cd[0][0].powi(2) + self.cd[1][0].powi(2)).sqrt();
        let y = (self.cd[0][1].powi(2) + self.cd[1][1].powi(2)).sqrt();
        (x, y)
    }

    /// Project a sky position to zero-based pixel coordinates.
    ///
    /// Returns `None` when the position lies on or behind the tangent plane
    /// (more than 90° from the reference point).
    pub fn world_to_pixel(&self, coord: &SkyCoord) -> Option<PixelCoord> {
        let (xi, eta) = tan_project(
            coord.ra_rad(),
            coord.dec_rad(),
            self.crval[0].to_radians(),
            self.crval[1].to_radians(),
        )?;

        let inverse = self.cd_matrix().try_inverse()?;
        let offset = inverse * Vector2::new(xi.to_degrees(), eta.to_degrees());

        Some(PixelCoord::new(
            self.crpix[0] - 1.0 + offset.x,
            self.crpix[1] - 1.0 + offset.y,
        ))
    }

    /// Deproject zero-based pixel coordinates onto the sky
    pub fn pixel_to_world(&self, pixel: &PixelCoord) -> SkyCoord {
        let offset = Vector2::new(
            pixel.x - (self.crpix[0] - 1.0),
            pixel.y - (self.crpix[1] - 1.0),
        );
        let intermediate = self.cd_matrix() * offset;

        let (ra, dec) = inverse_tan_project(
            intermediate.x.to_radians(),
            intermediate.y.to_radians(),
            self.crval[0].to_radians(),
            self.crval[1].to_radians(),
        );
        SkyCoord::from_degrees(ra.to_degrees(), dec.to_degrees())
    }

    /// WCS of a sub-image whose zero-based pixel `(x0, y0)` is the origin
    /// of the new array. The offset may be negative for sub-images that
    /// extend past the lower image edge.
    pub fn sliced(&self, x0: f64, y0: f64) -> Wcs {
        Wcs {
            crpix: [self.crpix[0] - x0, self.crpix[1] - y0],
            crval: self.crval,
            cd: self.cd,
        }
    }
}

/// Forward gnomonic projection onto the tangent plane at `(ra0, dec0)`.
///
/// All angles in radians. Returns `(ξ, η)` in radians, or `None` for points
/// on or behind the tangent plane.
fn tan_project(ra: f64, dec: f64, ra0: f64, dec0: f64) -> Option<(f64, f64)> {
    let d_ra = ra - ra0;
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_dec0, cos_dec0) = dec0.sin_cos();
    let cos_d_ra = d_ra.cos();

    let denom = sin_dec * sin_dec0 + cos_dec * cos_dec0 * cos_d_ra;
    if denom <= 1e-12 {
        return None;
    }

    let xi = cos_dec * d_ra.sin() / denom;
    let eta = (sin_dec * cos_dec0 - cos_dec * sin_dec0 * cos_d_ra) / denom;
    Some((xi, eta))
}

/// Inverse gnomonic projection; angles in radians
fn inverse_tan_project(xi: f64, eta: f64, ra0: f64, dec0: f64) -> (f64, f64) {
    let rho = (xi * xi + eta * eta).sqrt();
    if rho < 1e-15 {
        return (ra0, dec0);
    }

    let c = rho.atan();
    let (sin_c, cos_c) = c.sin_cos();
    let (sin_dec0, cos_dec0) = dec0.sin_cos();

    let dec = (cos_c * sin_dec0 + eta * sin_c * cos_dec0 / rho).asin();
    let ra = ra0 + (xi * sin_c).atan2(rho * cos_dec0 * cos_c - eta * sin_dec0 * sin_c);
    (ra, dec)
}
