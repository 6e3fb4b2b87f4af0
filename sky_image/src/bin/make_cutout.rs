//! Cut a box around a sky position out of a FITS mosaic
//!
//! # Usage
//!
//! ```bash
//! # 5" square around a cluster, PNG preview plus FITS cutout
//! cargo run --release --bin make_cutout -- mosaic.fits \
//!     --coord 65.00174,-54.93781 --size 5 --png cluster.png --fits cluster.fits
//!
//! # 40 x 60 pixel box (rows x columns)
//! cargo run --release --bin make_cutout -- mosaic.fits \
//!     --coord 65.00174,-54.93781 --size 40 60 --pixels
//! ```

use std::path::PathBuf;

use clap::Parser;
use sky_image::image_proc::save_preview_png;
use sky_image::io::{read_image_with_wcs, write_image_with_wcs};
use sky_image::{cutout_with_config, CutoutConfig, CutoutSize, SizeUnit, SkyCoord};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FITS image with a TAN WCS
    input: PathBuf,

    /// HDU index (default: first 2D image)
    #[arg(long)]
    hdu: Option<usize>,

    /// Target position as "ra,dec" in degrees
    #[arg(short, long, allow_hyphen_values = true)]
    coord: SkyCoord,

    /// Box size: one value for a square, or "ny nx"
    #[arg(short, long, num_args = 1..=2, default_values_t = [5.0])]
    size: Vec<f64>,

    /// Interpret --size in pixels instead of arcseconds
    #[arg(long)]
    pixels: bool,

    /// Value for cells past the image edge
    #[arg(long, default_value_t = f64::NAN)]
    fill: f64,

    /// Write a sqrt-stretched PNG preview here
    #[arg(long)]
    png: Option<PathBuf>,

    /// Write the cutout and its WCS as FITS here
    #[arg(long)]
    fits: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let unit = if args.pixels {
        SizeUnit::Pixels
    } else {
        SizeUnit::Arcsec
    };
    let size = CutoutSize::from_values(&args.size, unit)?;

    let (image, wcs) = read_image_with_wcs(&args.input, args.hdu)?;
    println!(
        "Loaded {}x{} image from {}",
        image.nrows(),
        image.ncols(),
        args.input.display()
    );

    let config = CutoutConfig {
        fill_value: args.fill,
        ..CutoutConfig::default()
    };
    let Some(cut) = cutout_with_config(&image, &wcs, &args.coord, &size, &config)?.into_cutout()
    else {
        println!("{} is outside the image; nothing written", args.coord);
        return Ok(());
    };

    println!(
        "Cutout {}x{} at source pixel origin {:?}",
        cut.data.nrows(),
        cut.data.ncols(),
        cut.origin_original
    );
    println!("{}", serde_json::to_string_pretty(&cut.wcs)?);

    if let Some(path) = &args.png {
        save_preview_png(&cut.data, path)?;
        println!("Preview written to {}", path.display());
    }
    if let Some(path) = &args.fits {
        write_image_with_wcs(path, &cut.data, &cut.wcs, "CUTOUT")?;
        println!("Cutout written to {}", path.display());
    }

    Ok(())
}
