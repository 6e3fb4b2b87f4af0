//! Reddening-vector configuration.
//!
//! Both structs deserialize from partial JSON; missing fields take the
//! defaults documented on each field.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::extinction::DEFAULT_R_V;
use crate::surface::{ArrowStyle, TextStyle};
use crate::types::ExtinctionMagnitude;
use crate::RenderError;

/// Appearance of the arrow and its label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReddeningStyle {
    /// Arrow line width in pixels (default 2)
    pub line_width: f64,
    /// Arrow color (default black)
    pub line_color: String,
    /// Draw the `A_V=... mag` label (default off)
    pub show_text: bool,
    /// Label font size in pixels (default 20)
    pub font_size: f64,
    /// Label color (default black)
    pub text_color: String,
    /// Label anchor offset from the arrow origin along x, data units (default 0.1)
    pub x_text_offset: f64,
    /// Label anchor offset from the arrow origin along y, data units (default -0.3)
    pub y_text_offset: f64,
}

impl Default for ReddeningStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            line_color: "black".to_string(),
            show_text: false,
            font_size: 20.0,
            text_color: "black".to_string(),
            x_text_offset: 0.1,
            y_text_offset: -0.3,
        }
    }
}

impl ReddeningStyle {
    pub fn arrow_style(&self) -> ArrowStyle {
        ArrowStyle {
            line_width: self.line_width,
            color: self.line_color.clone(),
        }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            color: self.text_color.clone(),
        }
    }
}

/// A color given as two band names, bluer band first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPair {
    pub blue: String,
    pub red: String,
}

impl BandPair {
    pub fn new(blue: &str, red: &str) -> Self {
        Self {
            blue: blue.to_string(),
            red: red.to_string(),
        }
    }
}

/// Parse `"v,i"` or `"v-i"`
impl FromStr for BandPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(&[',', '-'][..]).map(str::trim).collect();
        match parts.as_slice() {
            [blue, red] if !blue.is_empty() && !red.is_empty() => Ok(Self::new(blue, red)),
            _ => Err(format!("Color must be given as 'blue,red' or 'blue-red', got '{s}'")),
        }
    }
}

/// Everything needed to place one reddening vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReddeningConfig {
    /// x-axis color (default V − I)
    pub x_color: BandPair,
    /// y-axis color (default U − B)
    pub y_color: BandPair,
    /// Arrow origin in data coordinates (default (0, 0))
    pub origin: (f64, f64),
    /// Visual extinction (default 1 mag, integer label)
    pub av: ExtinctionMagnitude,
    /// Total-to-selective extinction ratio (default 3.1)
    pub r_v: f64,
    pub style: ReddeningStyle,
}

impl Default for ReddeningConfig {
    fn default() -> Self {
        Self {
            x_color: BandPair::new("v", "i"),
            y_color: BandPair::new("u", "b"),
            origin: (0.0, 0.0),
            av: ExtinctionMagnitude::from(1),
            r_v: DEFAULT_R_V,
            style: ReddeningStyle::default(),
        }
    }
}

impl ReddeningConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
