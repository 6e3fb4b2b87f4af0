//! Typed physical quantities used by the reddening computations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wavelength stored in Ångström
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wavelength(f64);

impl Wavelength {
    pub fn from_angstrom(angstrom: f64) -> Self {
        Self(angstrom)
    }

    pub fn from_microns(microns: f64) -> Self {
        Self(microns * 1e4)
    }

    pub fn angstrom(&self) -> f64 {
        self.0
    }

    pub fn microns(&self) -> f64 {
        self.0 * 1e-4
    }

    /// Wavenumber in inverse microns, the variable the CCM89 fits are
    /// expressed in
    pub fn inverse_microns(&self) -> f64 {
        1.0 / self.microns()
    }
}

impl fmt::Display for Wavelength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} Å", self.0)
    }
}

/// How many decimals an extinction label shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPrecision {
    Integer,
    OneDecimal,
}

/// Visual extinction A_V in magnitudes together with its display precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtinctionMagnitude {
    pub value: f64,
    pub precision: LabelPrecision,
}

impl ExtinctionMagnitude {
    pub fn new(value: f64, precision: LabelPrecision) -> Self {
        Self { value, precision }
    }

    /// Label drawn next to the arrow, e.g. `A_V=2 mag` or `A_V=2.5 mag`.
    ///
    /// Integer precision rounds to the nearest whole magnitude.
    pub fn label(&self) -> String {
        match self.precision {
            LabelPrecision::Integer => format!("A_V={:.0} mag", self.value),
            LabelPrecision::OneDecimal => format!("A_V={:.1} mag", self.value),
        }
    }
}

impl From<i32> for ExtinctionMagnitude {
    fn from(value: i32) -> Self {
        Self::new(value as f64, LabelPrecision::Integer)
    }
}

impl From<f64> for ExtinctionMagnitude {
    fn from(value: f64) -> Self {
        Self::new(value, LabelPrecision::OneDecimal)
    }
}

impl fmt::Display for ExtinctionMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parse `"2"` as an integer magnitude and `"2.5"` (anything with a decimal
/// point or exponent) as a one-decimal magnitude
impl FromStr for ExtinctionMagnitude {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i32>() {
            return Ok(value.into());
        }
        s.parse::<f64>()
            .map(Self::from)
            .map_err(|_| format!("Invalid extinction magnitude: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_wavelength_units() {
        let v = Wavelength::from_angstrom(5500.0);
        assert_relative_eq!(v.microns(), 0.55, epsilon = 1e-12);
        assert_relative_eq!(v.inverse_microns(), 1.0 / 0.55, epsilon = 1e-12);
        assert_relative_eq!(Wavelength::from_microns(0.8).angstrom(), 8000.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(ExtinctionMagnitude::from(2), "A_V=2 mag")]
    #[case(ExtinctionMagnitude::from(2.5), "A_V=2.5 mag")]
    #[case(ExtinctionMagnitude::from(1.0), "A_V=1.0 mag")]
    #[case(ExtinctionMagnitude::new(3.14, LabelPrecision::OneDecimal), "A_V=3.1 mag")]
    fn test_label(#[case] av: ExtinctionMagnitude, #[case] expected: &str) {
        assert_eq!(av.label(), expected);
        assert_eq!(av.to_string(), expected);
    }

    #[test]
    fn test_parse_magnitude() {
        let av: ExtinctionMagnitude = "3".parse().unwrap();
        assert_eq!(av.precision, LabelPrecision::Integer);

        let av: ExtinctionMagnitude = " 1.5 ".parse().unwrap();
        assert_eq!(av.precision, LabelPrecision::OneDecimal);
        assert_relative_eq!(av.value, 1.5);

        assert!("one".parse::<ExtinctionMagnitude>().is_err());
    }
}
