//! Sky and pixel coordinates

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Equatorial (ICRS) position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyCoord {
    /// Right ascension in degrees, [0, 360)
    pub ra_deg: f64,
    /// Declination in degrees, [-90, 90]
    pub dec_deg: f64,
}

impl SkyCoord {
    /// Create a coordinate from degrees; right ascension is wrapped into [0, 360)
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra_deg: ra_deg.rem_euclid(360.0),
            dec_deg,
        }
    }

    pub fn ra_rad(&self) -> f64 {
        self.ra_deg.to_radians()
    }

    pub fn dec_rad(&self) -> f64 {
        self.dec_deg.to_radians()
    }

    /// Great-circle separation in degrees (haversine form, stable at small angles)
    pub fn separation_deg(&self, other: &SkyCoord) -> f64 {
        let d_dec = other.dec_rad() - self.dec_rad();
        let d_ra = other.ra_rad() - self.ra_rad();
        let a = (d_dec / 2.0).sin().powi(2)
            + self.dec_rad().cos() * other.dec_rad().cos() * (d_ra / 2.0).sin().powi(2);
        (2.0 * a.sqrt().min(1.0).asin()).to_degrees()
    }
}

impl fmt::Display for SkyCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(RA {:.6}°, Dec {:+.6}°)", self.ra_deg, self.dec_deg)
    }
}

/// Parse `"ra,dec"` in degrees
impl FromStr for SkyCoord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err("Coordinates must be in format 'ra,dec' (degrees)".to_string());
        }

        let ra = parts[0]
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid right ascension: {}", parts[0].trim()))?;
        let dec = parts[1]
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid declination: {}", parts[1].trim()))?;

        if !(-90.0..=90.0).contains(&dec) {
            return Err(format!("Declination out of range: {dec}"));
        }

        Ok(SkyCoord::from_degrees(ra, dec))
    }
}

/// Zero-based pixel position; `x` runs along columns, `y` along rows.
///
/// Pixel centers sit on integer values, so the pixel at array index
/// `[row, col]` covers `x` in `[col - 0.5, col + 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: f64,
    pub y: f64,
}

impl PixelCoord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
