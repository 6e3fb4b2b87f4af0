//! Drawing a reddening vector onto a surface

use log::debug;

use crate::bands::BandTable;
use crate::config::{ReddeningConfig, ReddeningStyle};
use crate::extinction::Ccm89;
use crate::surface::AnnotationSurface;
use crate::types::ExtinctionMagnitude;
use crate::vector::{ColorAxis, ReddeningVector};
use crate::RenderError;

/// Draw the reddening arrow for `av` starting at `origin`, using CCM89 with
/// `R_V = 3.1`.
///
/// With `style.show_text` the label `A_V=... mag` is anchored at
/// `origin + (x_text_offset, y_text_offset)` and rotated parallel to the
/// arrow. Returns the vector that was drawn.
pub fn render_reddening_vector<S: AnnotationSurface + ?Sized>(
    surface: &mut S,
    x_axis: &ColorAxis,
    y_axis: &ColorAxis,
    origin: (f64, f64),
    av: ExtinctionMagnitude,
    style: &ReddeningStyle,
) -> Result<ReddeningVector, RenderError> {
    render_reddening_vector_with_law(surface, &Ccm89::default(), x_axis, y_axis, origin, av, style)
}

pub fn render_reddening_vector_with_law<S: AnnotationSurface + ?Sized>(
    surface: &mut S,
    law: &Ccm89,
    x_axis: &ColorAxis,
    y_axis: &ColorAxis,
    origin: (f64, f64),
    av: ExtinctionMagnitude,
    style: &ReddeningStyle,
) -> Result<ReddeningVector, RenderError> {
    let vector = ReddeningVector::compute(x_axis, y_axis, av.value, law)?;
    debug!(
        "{} vs {} reddening for {}: dx={:.4} dy={:.4} angle={:.2} deg",
        x_axis,
        y_axis,
        av,
        vector.dx,
        vector.dy,
        vector.angle_deg()
    );

    surface.draw_arrow(origin, vector.tip(origin), &style.arrow_style())?;

    if style.show_text {
        let anchor = (origin.0 + style.x_text_offset, origin.1 + style.y_text_offset);
        surface.draw_text(anchor, &av.label(), vector.angle_deg(), &style.text_style())?;
    }

    Ok(vector)
}

/// Resolve the configured bands through `bands` and draw
pub fn render_from_config<S: AnnotationSurface + ?Sized>(
    surface: &mut S,
    config: &ReddeningConfig,
    bands: &BandTable,
) -> Result<ReddeningVector, RenderError> {
    let x_axis = ColorAxis::from_bands(bands, &config.x_color.blue, &config.x_color.red)?;
    let y_axis = ColorAxis::from_bands(bands, &config.y_color.blue, &config.y_color.red)?;
    let law = Ccm89::new(config.r_v)?;

    render_reddening_vector_with_law(
        surface,
        &law,
        &x_axis,
        &y_axis,
        config.origin,
        config.av,
        &config.style,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::types::Wavelength;
    use approx::assert_relative_eq;

    fn vi_ub() -> (ColorAxis, ColorAxis) {
        let bands = BandTable::default();
        (
            ColorAxis::from_bands(&bands, "F555W", "F814W").unwrap(),
            ColorAxis::from_bands(&bands, "F336W", "F438W").unwrap(),
        )
    }

    #[test]
    fn test_arrow_only_by_default() {
        let (x, y) = vi_ub();
        let mut surface = RecordingSurface::new();

        let vector = render_reddening_vector(
            &mut surface,
            &x,
            &y,
            (0.2, -1.5),
            ExtinctionMagnitude::from(1),
            &ReddeningStyle::default(),
        )
        .unwrap();

        assert_eq!(surface.commands.len(), 1);
        match &surface.commands[0] {
            DrawCommand::Arrow { from, to, style } => {
                assert_eq!(*from, (0.2, -1.5));
                assert_relative_eq!(to.0, 0.2 + vector.dx);
                assert_relative_eq!(to.1, -1.5 + vector.dy);
                assert_eq!(style.line_width, 2.0);
                assert_eq!(style.color, "black");
            }
            other => panic!("expected an arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_label_text_position_and_rotation() {
        let (x, y) = vi_ub();
        let mut surface = RecordingSurface::new();
        let style = ReddeningStyle {
            show_text: true,
            ..ReddeningStyle::default()
        };

        let vector = render_reddening_vector(
            &mut surface,
            &x,
            &y,
            (1.0, 1.0),
            ExtinctionMagnitude::from(2.5),
            &style,
        )
        .unwrap();

        assert_eq!(surface.arrows().count(), 1);
        let texts: Vec<_> = surface.texts().collect();
        assert_eq!(texts.len(), 1);
        match texts[0] {
            DrawCommand::Text {
                anchor,
                text,
                rotation_deg,
                style,
            } => {
                assert_eq!(text, "A_V=2.5 mag");
                assert_relative_eq!(anchor.0, 1.1);
                assert_relative_eq!(anchor.1, 0.7);
                assert_relative_eq!(*rotation_deg, vector.angle_deg());
                assert_eq!(style.font_size, 20.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_equal_axes_label_at_45_degrees() {
        let axis = ColorAxis::from_wavelengths(
            Wavelength::from_angstrom(4400.0),
            Wavelength::from_angstrom(5500.0),
        );
        let mut surface = RecordingSurface::new();
        let style = ReddeningStyle {
            show_text: true,
            ..ReddeningStyle::default()
        };

        render_reddening_vector(
            &mut surface,
            &axis,
            &axis,
            (0.0, 0.0),
            ExtinctionMagnitude::from(2),
            &style,
        )
        .unwrap();

        let label = surface.texts().next();
        match label {
            Some(DrawCommand::Text { rotation_deg, text, .. }) => {
                assert_relative_eq!(*rotation_deg, 45.0, epsilon = 1e-12);
                assert_eq!(text, "A_V=2 mag");
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_wavelength_is_an_error() {
        let x = ColorAxis::from_wavelengths(
            Wavelength::from_angstrom(5500.0),
            Wavelength::from_angstrom(60_000.0),
        );
        let mut surface = RecordingSurface::new();

        let result = render_reddening_vector(
            &mut surface,
            &x,
            &x,
            (0.0, 0.0),
            ExtinctionMagnitude::from(1),
            &ReddeningStyle::default(),
        );
        assert!(matches!(result, Err(RenderError::Extinction(_))));
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_render_from_config() {
        let mut config = ReddeningConfig::default();
        config.r_v = 5.0;
        let mut surface = RecordingSurface::new();

        let dense = render_from_config(&mut surface, &config, &BandTable::default()).unwrap();
        let diffuse = render_from_config(
            &mut surface,
            &ReddeningConfig::default(),
            &BandTable::default(),
        )
        .unwrap();

        assert!(dense.dx < diffuse.dx);
        assert_eq!(surface.arrows().count(), 2);

        config.x_color.red = "F160W".to_string();
        assert!(matches!(
            render_from_config(&mut surface, &config, &BandTable::default()),
            Err(RenderError::UnknownBand(_))
        ));
    }
}
