//! Reddening vector in a color-color diagram.
//!
//! Each diagram axis is a color `m(λ1) − m(λ2)`. Dust with visual extinction
//! A_V shifts a source along both axes by the CCM89 color excesses, giving an
//! arrow of components
//!
//! ```text
//! Δx = A(λx1) − A(λx2),    Δy = A(λy1) − A(λy2)
//! ```
//!
//! whose direction is independent of A_V.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bands::BandTable;
use crate::extinction::{Ccm89, ExtinctionError};
use crate::types::Wavelength;
use crate::RenderError;

/// One axis of a color-color diagram, `m(blue) − m(red)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAxis {
    pub blue: Wavelength,
    pub red: Wavelength,
    pub label: String,
}

impl ColorAxis {
    pub fn from_wavelengths(blue: Wavelength, red: Wavelength) -> Self {
        Self {
            label: format!("{:.0}Å − {:.0}Å", blue.angstrom(), red.angstrom()),
            blue,
            red,
        }
    }

    /// Resolve both bands through `table`; the label uses the names as given
    pub fn from_bands(table: &BandTable, blue: &str, red: &str) -> Result<Self, RenderError> {
        let lookup = |key: &str| {
            table
                .wavelength(key)
                .ok_or_else(|| RenderError::UnknownBand(key.to_string()))
        };
        Ok(Self {
            blue: lookup(blue)?,
            red: lookup(red)?,
            label: format!("{} − {}", blue.trim().to_uppercase(), red.trim().to_uppercase()),
        })
    }

    /// Color excess along this axis for visual extinction `av`
    pub fn color_excess(&self, law: &Ccm89, av: f64) -> Result<f64, ExtinctionError> {
        law.color_excess(self.blue, self.red, av)
    }
}

impl fmt::Display for ColorAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Displacement caused by extinction in color-color space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReddeningVector {
    pub dx: f64,
    pub dy: f64,
}

impl ReddeningVector {
    pub fn compute(
        x_axis: &ColorAxis,
        y_axis: &ColorAxis,
        av: f64,
        law: &Ccm89,
    ) -> Result<Self, ExtinctionError> {
        Ok(Self {
            dx: x_axis.color_excess(law, av)?,
            dy: y_axis.color_excess(law, av)?,
        })
    }

    /// `Δy / Δx`, or `None` for a vertical vector
    pub fn slope(&self) -> Option<f64> {
        (self.dx != 0.0).then(|| self.dy / self.dx)
    }

    /// `atan(Δy / Δx)` in degrees, in `[-90, 90]`.
    ///
    /// A vertical vector gives ±90° following the sign of Δy, and a null
    /// vector gives 0°.
    pub fn angle_deg(&self) -> f64 {
        if self.dx == 0.0 {
            if self.dy > 0.0 {
                90.0
            } else if self.dy < 0.0 {
                -90.0
            } else {
                0.0
            }
        } else {
            (self.dy / self.dx).atan().to_degrees()
        }
    }

    pub fn length(&self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Arrow tip for an arrow starting at `origin`
    pub fn tip(&self, origin: (f64, f64)) -> (f64, f64) {
        (origin.0 + self.dx, origin.1 + self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn vi_ub() -> (ColorAxis, ColorAxis) {
        let table = BandTable::default();
        (
            ColorAxis::from_bands(&table, "v", "i").unwrap(),
            ColorAxis::from_bands(&table, "u", "b").unwrap(),
        )
    }

    #[test]
    fn test_vi_ub_vector() {
        let (x, y) = vi_ub();
        let vector = ReddeningVector::compute(&x, &y, 1.0, &Ccm89::default()).unwrap();

        assert_relative_eq!(vector.dx, 0.4603526, epsilon = 1e-6);
        assert_relative_eq!(vector.dy, 0.2835812, epsilon = 1e-6);
        assert_relative_eq!(vector.slope().unwrap(), 0.6160085, epsilon = 1e-6);
        assert_relative_eq!(vector.angle_deg(), 31.633424, epsilon = 1e-5);
        assert_eq!(x.label, "V − I");
    }

    #[test]
    fn test_direction_does_not_depend_on_av() {
        let (x, y) = vi_ub();
        let law = Ccm89::default();
        let one = ReddeningVector::compute(&x, &y, 1.0, &law).unwrap();
        let three = ReddeningVector::compute(&x, &y, 3.0, &law).unwrap();

        assert_relative_eq!(one.angle_deg(), three.angle_deg(), epsilon = 1e-12);
        assert_relative_eq!(three.length(), 3.0 * one.length(), epsilon = 1e-12);
    }

    #[test]
    fn test_equal_axes_give_45_degrees() {
        let b = Wavelength::from_angstrom(4338.6);
        let v = Wavelength::from_angstrom(5361.0);
        let axis = ColorAxis::from_wavelengths(b, v);

        let vector = ReddeningVector::compute(&axis, &axis, 2.0, &Ccm89::default()).unwrap();
        assert_relative_eq!(vector.angle_deg(), 45.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0, 0.5, 90.0, None)]
    #[case(0.0, -0.5, -90.0, None)]
    #[case(0.0, 0.0, 0.0, None)]
    #[case(-1.0, 1.0, -45.0, Some(-1.0))]
    fn test_angle_edge_cases(
        #[case] dx: f64,
        #[case] dy: f64,
        #[case] angle: f64,
        #[case] slope: Option<f64>,
    ) {
        let vector = ReddeningVector { dx, dy };
        assert_relative_eq!(vector.angle_deg(), angle, epsilon = 1e-12);
        assert_eq!(vector.slope(), slope);
    }

    #[test]
    fn test_unknown_band() {
        let result = ColorAxis::from_bands(&BandTable::default(), "v", "K");
        assert!(matches!(result, Err(RenderError::UnknownBand(b)) if b == "K"));
    }

    #[test]
    fn test_tip() {
        let vector = ReddeningVector { dx: 0.5, dy: 0.25 };
        assert_eq!(vector.tip((1.0, -1.0)), (1.5, -0.75));
    }
}
