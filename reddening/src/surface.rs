//! Drawing targets for reddening annotations.
//!
//! Positions are data coordinates of the color-color diagram. Text rotation
//! is an angle measured in data space (the direction `(cos θ, sin θ)` in data
//! units); surfaces with unequal axis scaling map it to the matching screen
//! angle so labels stay parallel to arrows.

use serde::{Deserialize, Serialize};

use crate::RenderError;

/// Stroke settings for an arrow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowStyle {
    /// Line width in screen pixels
    pub line_width: f64,
    /// Any SVG color
    pub color: String,
}

/// Font settings for a text label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in screen pixels
    pub font_size: f64,
    pub color: String,
}

pub trait AnnotationSurface {
    /// Arrow from `from` to `to` with the head at `to`
    fn draw_arrow(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        style: &ArrowStyle,
    ) -> Result<(), RenderError>;

    /// Text whose baseline starts at `anchor`, rotated counter-clockwise by
    /// `rotation_deg` (data space)
    fn draw_text(
        &mut self,
        anchor: (f64, f64),
        text: &str,
        rotation_deg: f64,
        style: &TextStyle,
    ) -> Result<(), RenderError>;
}

/// Single recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Arrow {
        from: (f64, f64),
        to: (f64, f64),
        style: ArrowStyle,
    },
    Text {
        anchor: (f64, f64),
        text: String,
        rotation_deg: f64,
        style: TextStyle,
    },
}

/// Surface that keeps every call, for inspecting what a renderer drew
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arrows(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Arrow { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
    }
}

impl AnnotationSurface for RecordingSurface {
    fn draw_arrow(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        style: &ArrowStyle,
    ) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Arrow {
            from,
            to,
            style: style.clone(),
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        anchor: (f64, f64),
        text: &str,
        rotation_deg: f64,
        style: &TextStyle,
    ) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Text {
            anchor,
            text: text.to_string(),
            rotation_deg,
            style: style.clone(),
        });
        Ok(())
    }
}
