//! SVG color-color canvas rasterised through resvg.
//!
//! The canvas maps a rectangular data window onto a fixed pixel frame with
//! margins for tick labels. Annotations arrive in data coordinates; text
//! rotation is converted from data space to screen space using the axis
//! scales, so a label rotated by the reddening angle stays parallel to the
//! arrow even when the two axes have different units per pixel.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use tiny_skia::{Pixmap, Transform};
use usvg::{fontdb, Options, Tree};

use crate::surface::{AnnotationSurface, ArrowStyle, TextStyle};
use crate::RenderError;

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 25.0;
const MARGIN_TOP: f64 = 25.0;
const MARGIN_BOTTOM: f64 = 75.0;
const FONT_FAMILY: &str = "DejaVu Sans";

/// Data-space plotting surface that renders to SVG and PNG
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: u32,
    height: u32,
    x_range: (f64, f64),
    y_range: (f64, f64),
    invert_y: bool,
    x_label: String,
    y_label: String,
    elements: Vec<String>,
}

impl SvgCanvas {
    /// Canvas of `width` x `height` pixels showing `x_range` by `y_range`
    pub fn new(
        width: u32,
        height: u32,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Result<Self, RenderError> {
        for (axis, (lo, hi)) in [("x", x_range), ("y", y_range)] {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(RenderError::InvalidRange { axis, lo, hi });
            }
        }
        if (width as f64) <= MARGIN_LEFT + MARGIN_RIGHT
            || (height as f64) <= MARGIN_TOP + MARGIN_BOTTOM
        {
            return Err(RenderError::CanvasTooSmall { width, height });
        }

        Ok(Self {
            width,
            height,
            x_range,
            y_range,
            invert_y: false,
            x_label: String::new(),
            y_label: String::new(),
            elements: Vec::new(),
        })
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    /// Let y grow downwards, the usual orientation for U−B style axes
    pub fn with_inverted_y(mut self) -> Self {
        self.invert_y = true;
        self
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn plot_width(&self) -> f64 {
        self.width as f64 - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height(&self) -> f64 {
        self.height as f64 - MARGIN_TOP - MARGIN_BOTTOM
    }

    /// Screen pixels per data unit; the y scale is negative when y is inverted
    fn scales(&self) -> (f64, f64) {
        let sx = self.plot_width() / (self.x_range.1 - self.x_range.0);
        let sy = self.plot_height() / (self.y_range.1 - self.y_range.0);
        (sx, if self.invert_y { -sy } else { sy })
    }

    /// Data coordinates to SVG pixel coordinates (y down)
    pub fn to_screen(&self, point: (f64, f64)) -> (f64, f64) {
        let (sx, sy) = self.scales();
        let px = MARGIN_LEFT + (point.0 - self.x_range.0) * sx;
        let py = if self.invert_y {
            MARGIN_TOP + (point.1 - self.y_range.0) * -sy
        } else {
            MARGIN_TOP + (self.y_range.1 - point.1) * sy
        };
        (px, py)
    }

    /// Counter-clockwise on-screen angle of a data-space direction
    pub fn screen_angle_deg(&self, data_angle_deg: f64) -> f64 {
        let (sx, sy) = self.scales();
        let (sin, cos) = data_angle_deg.to_radians().sin_cos();
        (sin * sy).atan2(cos * sx).to_degrees()
    }

    /// Filled circles at data positions
    pub fn scatter(&mut self, points: &[(f64, f64)], radius: f64, color: &str) {
        let mut group = format!(r#"<g fill="{}" fill-opacity="0.6">"#, escape(color));
        for &point in points {
            let (px, py) = self.to_screen(point);
            let _ = write!(group, r#"<circle cx="{px:.2}" cy="{py:.2}" r="{radius:.2}"/>"#);
        }
        group.push_str("</g>");
        self.elements.push(group);
    }

    /// Complete SVG document
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.width, self.height);
        let (pw, ph) = (self.plot_width(), self.plot_height());
        let mut svg = String::new();

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}, sans-serif">"#
        );
        let _ = writeln!(
            svg,
            r#"<defs><clipPath id="plot-area"><rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{pw:.2}" height="{ph:.2}"/></clipPath></defs>"#
        );
        let _ = writeln!(svg, r#"<rect width="{w}" height="{h}" fill="white"/>"#);

        self.write_axes(&mut svg);

        let _ = writeln!(svg, r#"<g clip-path="url(#plot-area)">"#);
        for element in &self.elements {
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</g>\n");

        let _ = writeln!(
            svg,
            r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{pw:.2}" height="{ph:.2}" fill="none" stroke="black" stroke-width="1.5"/>"#
        );
        svg.push_str("</svg>\n");
        svg
    }

    fn write_axes(&self, svg: &mut String) {
        let bottom = MARGIN_TOP + self.plot_height();
        svg.push_str(r#"<g stroke="black" stroke-width="1" font-size="14">"#);

        for x in nice_ticks(self.x_range) {
            let (px, _) = self.to_screen((x, self.y_range.0));
            let _ = write!(
                svg,
                r#"<line x1="{px:.2}" y1="{bottom:.2}" x2="{px:.2}" y2="{:.2}"/><text x="{px:.2}" y="{:.2}" stroke="none" text-anchor="middle">{}</text>"#,
                bottom - 6.0,
                bottom + 20.0,
                format_tick(x, self.x_range)
            );
        }
        for y in nice_ticks(self.y_range) {
            let (_, py) = self.to_screen((self.x_range.0, y));
            let _ = write!(
                svg,
                r#"<line x1="{MARGIN_LEFT}" y1="{py:.2}" x2="{:.2}" y2="{py:.2}"/><text x="{:.2}" y="{:.2}" stroke="none" text-anchor="end">{}</text>"#,
                MARGIN_LEFT + 6.0,
                MARGIN_LEFT - 8.0,
                py + 5.0,
                format_tick(y, self.y_range)
            );
        }
        svg.push_str("</g>\n");

        let center_x = MARGIN_LEFT + self.plot_width() / 2.0;
        let center_y = MARGIN_TOP + self.plot_height() / 2.0;
        let _ = writeln!(
            svg,
            r#"<text x="{center_x:.2}" y="{:.2}" font-size="18" text-anchor="middle">{}</text>"#,
            self.height as f64 - 20.0,
            escape(&self.x_label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="30" y="{center_y:.2}" font-size="18" text-anchor="middle" transform="rotate(-90 30 {center_y:.2})">{}</text>"#,
            escape(&self.y_label)
        );
    }

    pub fn save_svg<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        fs::write(path, self.to_svg())?;
        Ok(())
    }

    /// Rasterise with system fonts loaded for the labels
    pub fn render_pixmap(&self) -> Result<Pixmap, RenderError> {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();

        let options = Options {
            fontdb: Arc::new(fontdb),
            font_family: FONT_FAMILY.to_string(),
            ..Default::default()
        };
        let tree = Tree::from_str(&self.to_svg(), &options)?;

        let mut pixmap = Pixmap::new(self.width, self.height).ok_or(RenderError::CanvasTooSmall {
            width: self.width,
            height: self.height,
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let pixmap = self.render_pixmap()?;
        pixmap
            .save_png(path.as_ref())
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        debug!("Saved {}x{} canvas to {}", self.width, self.height, path.as_ref().display());
        Ok(())
    }
}

impl AnnotationSurface for SvgCanvas {
    fn draw_arrow(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        style: &ArrowStyle,
    ) -> Result<(), RenderError> {
        let (x0, y0) = self.to_screen(from);
        let (x1, y1) = self.to_screen(to);
        let length = (x1 - x0).hypot(y1 - y0);
        if length < 1e-6 {
            debug!("Skipping zero-length arrow at {from:?}");
            return Ok(());
        }

        let head_length = (3.0 * style.line_width + 8.0).min(length);
        let head_half_width = style.line_width + 3.0;
        let (ux, uy) = ((x1 - x0) / length, (y1 - y0) / length);
        let (bx, by) = (x1 - ux * head_length, y1 - uy * head_length);
        let (nx, ny) = (-uy * head_half_width, ux * head_half_width);
        let color = escape(&style.color);

        self.elements.push(format!(
            r#"<g><line x1="{x0:.2}" y1="{y0:.2}" x2="{bx:.2}" y2="{by:.2}" stroke="{color}" stroke-width="{:.2}"/><polygon points="{x1:.2},{y1:.2} {:.2},{:.2} {:.2},{:.2}" fill="{color}"/></g>"#,
            style.line_width,
            bx + nx,
            by + ny,
            bx - nx,
            by - ny,
        ));
        Ok(())
    }

    fn draw_text(
        &mut self,
        anchor: (f64, f64),
        text: &str,
        rotation_deg: f64,
        style: &TextStyle,
    ) -> Result<(), RenderError> {
        let (px, py) = self.to_screen(anchor);
        // SVG rotates clockwise with y pointing down
        let svg_rotation = -self.screen_angle_deg(rotation_deg);
        self.elements.push(format!(
            r#"<text x="{px:.2}" y="{py:.2}" font-size="{:.1}" fill="{}" transform="rotate({svg_rotation:.3} {px:.2} {py:.2})">{}</text>"#,
            style.font_size,
            escape(&style.color),
            escape(text)
        ));
        Ok(())
    }
}

/// Round tick positions covering `range`, about six of them
fn nice_ticks(range: (f64, f64)) -> Vec<f64> {
    let step = tick_step(range);
    let first = (range.0 / step).ceil() as i64;
    let last = (range.1 / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn tick_step(range: (f64, f64)) -> f64 {
    let raw = (range.1 - range.0) / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn format_tick(value: f64, range: (f64, f64)) -> String {
    let decimals = (-tick_step(range).log10().floor()).max(0.0) as usize;
    // Avoid "-0.0"
    let value = if value.abs() < 1e-12 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
