//! Reddening vectors for color-color diagrams.
//!
//! Computes how interstellar dust moves a source in a color-color diagram,
//! using the Cardelli, Clayton & Mathis (1989) extinction law, and draws the
//! displacement as an arrow with an optional `A_V=... mag` label.
//!
//! ```rust
//! use reddening::{render_reddening_vector, BandTable, ColorAxis, ExtinctionMagnitude, ReddeningStyle};
//! use reddening::surface::RecordingSurface;
//!
//! let bands = BandTable::default();
//! let x = ColorAxis::from_bands(&bands, "v", "i").unwrap();
//! let y = ColorAxis::from_bands(&bands, "u", "b").unwrap();
//!
//! let mut surface = RecordingSurface::new();
//! let vector = render_reddening_vector(
//!     &mut surface,
//!     &x,
//!     &y,
//!     (0.0, 0.0),
//!     ExtinctionMagnitude::from(1),
//!     &ReddeningStyle::default(),
//! )
//! .unwrap();
//! assert!(vector.dx > 0.0 && vector.dy > 0.0);
//! ```

use thiserror::Error;

pub mod bands;
pub mod canvas;
pub mod config;
pub mod extinction;
pub mod render;
pub mod surface;
pub mod types;
pub mod vector;

pub use bands::{Band, BandTable};
pub use canvas::SvgCanvas;
pub use config::{BandPair, ReddeningConfig, ReddeningStyle};
pub use extinction::{color_excess_ccm89, Ccm89, ExtinctionError, DEFAULT_R_V};
pub use render::{render_from_config, render_reddening_vector, render_reddening_vector_with_law};
pub use types::{ExtinctionMagnitude, LabelPrecision, Wavelength};
pub use vector::{ColorAxis, ReddeningVector};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Extinction error: {0}")]
    Extinction(#[from] ExtinctionError),

    #[error("Unknown band: {0}")]
    UnknownBand(String),

    #[error("Invalid {axis} range [{lo}, {hi}]")]
    InvalidRange { axis: &'static str, lo: f64, hi: f64 },

    #[error("Canvas {width}x{height} is too small")]
    CanvasTooSmall { width: u32, height: u32 },

    #[error("SVG error: {0}")]
    Svg(#[from] usvg::Error),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
