//! Rendering a reddening vector onto the SVG canvas

use reddening::surface::AnnotationSurface;
use reddening::{
    render_from_config, render_reddening_vector, BandTable, ColorAxis, ExtinctionMagnitude,
    ReddeningConfig, ReddeningStyle, SvgCanvas,
};
use test_helpers::output_path;

fn vi_ub_canvas() -> SvgCanvas {
    SvgCanvas::new(800, 600, (-0.5, 2.0), (-2.0, 1.0))
        .unwrap()
        .with_labels("V − I", "U − B")
}

#[test]
fn labelled_vector_renders_to_png() {
    let _ = env_logger::builder().is_test(true).try_init();
    let bands = BandTable::default();
    let x = ColorAxis::from_bands(&bands, "v", "i").unwrap();
    let y = ColorAxis::from_bands(&bands, "u", "b").unwrap();

    let mut canvas = vi_ub_canvas();
    canvas.scatter(&[(0.1, -1.4), (0.6, -0.2), (1.1, 0.3)], 4.0, "steelblue");

    let style = ReddeningStyle {
        show_text: true,
        line_color: "darkred".to_string(),
        ..ReddeningStyle::default()
    };
    let vector = render_reddening_vector(
        &mut canvas,
        &x,
        &y,
        (0.2, -1.5),
        ExtinctionMagnitude::from(1),
        &style,
    )
    .unwrap();
    assert!(vector.angle_deg() > 0.0 && vector.angle_deg() < 90.0);

    let svg = canvas.to_svg();
    assert!(svg.contains("A_V=1 mag"));
    assert!(svg.contains("darkred"));

    let path = output_path("reddening/vi_ub_av1.png");
    canvas.save_png(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    canvas.save_svg(output_path("reddening/vi_ub_av1.svg")).unwrap();
}

#[test]
fn arrow_pixels_are_drawn() {
    let mut canvas = vi_ub_canvas();
    render_from_config(
        &mut canvas,
        &ReddeningConfig::default(),
        &BandTable::default(),
    )
    .unwrap();

    let pixmap = canvas.render_pixmap().unwrap();
    // Sample the middle of the arrow shaft
    let (x0, y0) = canvas.to_screen((0.0, 0.0));
    let (x1, y1) = canvas.to_screen((0.46035, 0.28358));
    let (mx, my) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    let pixel = pixmap.pixel(mx.floor() as u32, my.floor() as u32).unwrap();
    assert!(pixel.red() < 128 && pixel.green() < 128 && pixel.blue() < 128);
}

#[test]
fn canvas_is_usable_as_a_trait_object() {
    let mut canvas = vi_ub_canvas();
    let surface: &mut dyn AnnotationSurface = &mut canvas;
    let bands = BandTable::default();
    let axis = ColorAxis::from_bands(&bands, "b", "v").unwrap();

    render_reddening_vector(
        surface,
        &axis,
        &axis,
        (0.0, 0.0),
        ExtinctionMagnitude::from(2.0),
        &ReddeningStyle {
            show_text: true,
            ..ReddeningStyle::default()
        },
    )
    .unwrap();

    assert!(canvas.to_svg().contains("A_V=2.0 mag"));
}
