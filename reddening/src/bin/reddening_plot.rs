//! Draw a CCM89 reddening vector on a color-color diagram
//!
//! # Usage
//!
//! ```bash
//! # V-I vs U-B with a labelled 1 mag arrow
//! cargo run --release --bin reddening_plot -- --label -o vi_ub.png
//!
//! # Catalog colors as a scatter, arrow from (0.2, -1.5), A_V = 2.5
//! cargo run --release --bin reddening_plot -- --points colors.csv \
//!     --origin=0.2,-1.5 --av 2.5 --label --invert-y -o clusters.png
//!
//! # Everything from a JSON configuration, NUV-U on x
//! cargo run --release --bin reddening_plot -- --config style.json --x-color nuv,u
//! ```

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use reddening::{
    render_from_config, BandPair, BandTable, Ccm89, ColorAxis, ExtinctionMagnitude,
    ReddeningConfig, ReddeningVector, SvgCanvas,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with a reddening configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// x-axis color as "blue,red" band names
    #[arg(long)]
    x_color: Option<BandPair>,

    /// y-axis color as "blue,red" band names
    #[arg(long)]
    y_color: Option<BandPair>,

    /// Visual extinction in magnitudes ("1" labels as integer, "1.0" with a decimal)
    #[arg(long)]
    av: Option<ExtinctionMagnitude>,

    /// Total-to-selective extinction ratio
    #[arg(long)]
    r_v: Option<f64>,

    /// Arrow origin as "x,y"
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    origin: Option<(f64, f64)>,

    /// Draw the A_V label
    #[arg(long)]
    label: bool,

    /// Two-column text file of (x color, y color) points to scatter
    #[arg(long)]
    points: Option<PathBuf>,

    /// x-axis range as "min,max"
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    x_range: Option<(f64, f64)>,

    /// y-axis range as "min,max"
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
    y_range: Option<(f64, f64)>,

    /// Let the y axis grow downwards
    #[arg(long)]
    invert_y: bool,

    /// PNG output
    #[arg(short, long, default_value = "reddening.png")]
    output: PathBuf,

    /// Also write the SVG source here
    #[arg(long)]
    svg: Option<PathBuf>,

    #[arg(long, default_value_t = 900)]
    width: u32,

    #[arg(long, default_value_t = 700)]
    height: u32,
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [a, b] => {
            let a = a.parse::<f64>().map_err(|_| format!("Invalid number: {a}"))?;
            let b = b.parse::<f64>().map_err(|_| format!("Invalid number: {b}"))?;
            Ok((a, b))
        }
        _ => Err(format!("Expected two comma-separated numbers, got '{s}'")),
    }
}

/// Read whitespace- or comma-separated `x y` pairs; blank lines and `#`
/// comments are skipped
fn read_points(path: &Path) -> Result<Vec<(f64, f64)>, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let mut points = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        match fields.as_slice() {
            [x, y, ..] => points.push((x.parse()?, y.parse()?)),
            _ => {
                return Err(
                    format!("{}:{}: expected two columns", path.display(), number + 1).into(),
                )
            }
        }
    }

    Ok(points)
}

/// Padded bounds of every point, for axes the user did not fix
fn auto_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (-1.0, 1.0);
    }
    let pad = ((hi - lo) * 0.1).max(0.25);
    (lo - pad, hi + pad)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ReddeningConfig::from_json_file(path)?,
        None => ReddeningConfig::default(),
    };
    if let Some(x_color) = args.x_color {
        config.x_color = x_color;
    }
    if let Some(y_color) = args.y_color {
        config.y_color = y_color;
    }
    if let Some(av) = args.av {
        config.av = av;
    }
    if let Some(r_v) = args.r_v {
        config.r_v = r_v;
    }
    if let Some(origin) = args.origin {
        config.origin = origin;
    }
    if args.label {
        config.style.show_text = true;
    }

    let bands = BandTable::default();
    let x_axis = ColorAxis::from_bands(&bands, &config.x_color.blue, &config.x_color.red)?;
    let y_axis = ColorAxis::from_bands(&bands, &config.y_color.blue, &config.y_color.red)?;

    let points = match &args.points {
        Some(path) => read_points(path)?,
        None => Vec::new(),
    };
    info!("Loaded {} points", points.len());

    // Size the window before drawing so the whole arrow is visible
    let law = Ccm89::new(config.r_v)?;
    let preview = ReddeningVector::compute(&x_axis, &y_axis, config.av.value, &law)?;
    let tip = preview.tip(config.origin);
    let extent = points.iter().copied().chain([config.origin, tip]);
    let x_range = args
        .x_range
        .unwrap_or_else(|| auto_range(extent.clone().map(|p| p.0)));
    let y_range = args.y_range.unwrap_or_else(|| auto_range(extent.map(|p| p.1)));

    let mut canvas = SvgCanvas::new(args.width, args.height, x_range, y_range)?
        .with_labels(&x_axis.label, &y_axis.label);
    if args.invert_y {
        canvas = canvas.with_inverted_y();
    }
    if !points.is_empty() {
        canvas.scatter(&points, 3.0, "steelblue");
    }

    let vector = render_from_config(&mut canvas, &config, &bands)?;
    println!(
        "{} vs {} for {}: dx = {:.4}, dy = {:.4}, angle = {:.2} deg",
        x_axis,
        y_axis,
        config.av,
        vector.dx,
        vector.dy,
        vector.angle_deg()
    );
    match vector.slope() {
        Some(slope) => println!("slope = {slope:.4}"),
        None => println!("slope undefined (vertical vector)"),
    }

    canvas.save_png(&args.output)?;
    println!("Wrote {}", args.output.display());
    if let Some(path) = &args.svg {
        canvas.save_svg(path)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
