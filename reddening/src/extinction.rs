//! Cardelli, Clayton & Mathis (1989) interstellar extinction law.
//!
//! CCM89 parameterises the extinction at any wavelength relative to the
//! visual extinction as
//!
//! ```text
//! A(λ) / A_V = a(x) + b(x) / R_V,     x = 1 / λ[μm]
//! ```
//!
//! with piecewise fits for `a(x)` and `b(x)` over four regimes:
//!
//! | regime        | x [μm⁻¹]       | λ            |
//! |---------------|----------------|--------------|
//! | infrared      | 0.3 ≤ x < 1.1  | 3.3 – 0.91 μm |
//! | optical / NIR | 1.1 ≤ x < 3.3  | 9090 – 3030 Å |
//! | ultraviolet   | 3.3 ≤ x < 8    | 3030 – 1250 Å |
//! | far UV        | 8 ≤ x ≤ 10     | 1250 – 1000 Å |
//!
//! `R_V = A_V / E(B−V)` describes the dust grain population; 3.1 is the
//! diffuse Milky Way average and the default here.
//!
//! The color excess between two bands, the quantity that moves a source in a
//! color-color diagram, is `A(λ1) − A(λ2)`. It is positive whenever λ1 is the
//! bluer band.
//!
//! # Example
//! ```rust
//! use reddening::extinction::Ccm89;
//! use reddening::types::Wavelength;
//!
//! let law = Ccm89::default();
//! let b = Wavelength::from_angstrom(4338.6);
//! let v = Wavelength::from_angstrom(5361.0);
//!
//! // E(B-V) for one magnitude of visual extinction
//! let ebv = law.color_excess(b, v, 1.0).unwrap();
//! assert!(ebv > 0.0);
//! ```

use thiserror::Error;

use crate::types::Wavelength;

/// Diffuse interstellar medium value of `R_V`
pub const DEFAULT_R_V: f64 = 3.1;

/// Valid CCM89 wavenumber range in μm⁻¹
pub const VALID_INVERSE_MICRONS: (f64, f64) = (0.3, 10.0);

#[derive(Debug, Error, PartialEq)]
pub enum ExtinctionError {
    #[error("Wavelength {wavelength} (x = {inverse_microns:.3} um^-1) is outside the CCM89 range 0.3 <= x <= 10")]
    OutOfRange {
        wavelength: Wavelength,
        inverse_microns: f64,
    },

    #[error("R_V must be positive and finite, got {0}")]
    InvalidRv(f64),
}

/// CCM89 law for a fixed `R_V`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ccm89 {
    r_v: f64,
}

impl Default for Ccm89 {
    fn default() -> Self {
        Self { r_v: DEFAULT_R_V }
    }
}

impl Ccm89 {
    pub fn new(r_v: f64) -> Result<Self, ExtinctionError> {
        if !(r_v.is_finite() && r_v > 0.0) {
            return Err(ExtinctionError::InvalidRv(r_v));
        }
        Ok(Self { r_v })
    }

    pub fn r_v(&self) -> f64 {
        self.r_v
    }

    /// `A(λ) / A_V`
    pub fn relative_extinction(&self, wavelength: Wavelength) -> Result<f64, ExtinctionError> {
        let x = wavelength.inverse_microns();
        let (a, b) = ccm89_coefficients(x).ok_or(ExtinctionError::OutOfRange {
            wavelength,
            inverse_microns: x,
        })?;
        Ok(a + b / self.r_v)
    }

    /// `A(λ)` in magnitudes for a visual extinction `av`
    pub fn extinction(&self, wavelength: Wavelength, av: f64) -> Result<f64, ExtinctionError> {
        Ok(av * self.relative_extinction(wavelength)?)
    }

    /// Color excess `A(λ1) − A(λ2)` for a visual extinction `av`.
    ///
    /// Pass the bluer band first to get the usual positive reddening.
    pub fn color_excess(
        &self,
        wave1: Wavelength,
        wave2: Wavelength,
        av: f64,
    ) -> Result<f64, ExtinctionError> {
        Ok(self.extinction(wave1, av)? - self.extinction(wave2, av)?)
    }
}

/// CCM89 color excess at the default `R_V = 3.1`
pub fn color_excess_ccm89(
    wave1: Wavelength,
    wave2: Wavelength,
    av: f64,
) -> Result<f64, ExtinctionError> {
    Ccm89::default().color_excess(wave1, wave2, av)
}

/// CCM89 `a(x)` and `b(x)`; `None` outside 0.3 ≤ x ≤ 10
fn ccm89_coefficients(x: f64) -> Option<(f64, f64)> {
    let (x_min, x_max) = VALID_INVERSE_MICRONS;

    if !(x_min..=x_max).contains(&x) {
        None
    } else if x < 1.1 {
        let xp = x.powf(1.61);
        Some((0.574 * xp, -0.527 * xp))
    } else if x < 3.3 {
        let y = x - 1.82;
        let a = polynomial(
            y,
            &[1.0, 0.17699, -0.50447, -0.02427, 0.72085, 0.01979, -0.77530, 0.32999],
        );
        let b = polynomial(
            y,
            &[0.0, 1.41338, 2.28305, 1.07233, -5.38434, -0.62251, 5.30260, -2.09002],
        );
        Some((a, b))
    } else if x < 8.0 {
        // Far-UV curvature terms only apply beyond the 2175 Å bump
        let (fa, fb) = if x >= 5.9 {
            let t = x - 5.9;
            (
                -0.04473 * t.powi(2) - 0.009779 * t.powi(3),
                0.2130 * t.powi(2) + 0.1207 * t.powi(3),
            )
        } else {
            (0.0, 0.0)
        };
        let a = 1.752 - 0.316 * x - 0.104 / ((x - 4.67).powi(2) + 0.341) + fa;
        let b = -3.090 + 1.825 * x + 1.206 / ((x - 4.62).powi(2) + 0.263) + fb;
        Some((a, b))
    } else {
        let t = x - 8.0;
        Some((
            polynomial(t, &[-1.073, -0.628, 0.137, -0.070]),
            polynomial(t, &[13.670, 4.257, -0.420, 0.374]),
        ))
    }
}

/// Horner evaluation, coefficients in ascending order
fn polynomial(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
