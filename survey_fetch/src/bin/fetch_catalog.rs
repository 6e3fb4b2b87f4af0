//! Download and unpack a PHANGS-HST cluster catalog bundle
//!
//! # Usage
//!
//! ```bash
//! # Default galaxy (ngc1566) into the current directory
//! cargo run --release --bin fetch_catalog
//!
//! # Another galaxy, into a data directory, keeping the tarball
//! cargo run --release --bin fetch_catalog -- --galaxy ngc628 -o data --keep-archive
//!
//! # Any tarball URL
//! cargo run --release --bin fetch_catalog -- --url https://example.org/bundle.tar.gz
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::info;
use survey_fetch::catalogs::phangs::{catalog_bundle_name, catalog_bundle_url, DEFAULT_GALAXY};
use survey_fetch::data::{
    archive_name_from_url, extract_archive, FetchConfig, FetchOptions, Fetcher,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Galaxy whose catalog bundle should be fetched
    #[arg(short, long, default_value = DEFAULT_GALAXY)]
    galaxy: String,

    /// Explicit archive URL (overrides --galaxy)
    #[arg(short, long)]
    url: Option<String>,

    /// Directory receiving the archive and its contents
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Download again even if the archive is already present
    #[arg(short, long)]
    force: bool,

    /// Keep the tarball after extraction
    #[arg(short, long)]
    keep_archive: bool,

    /// Hide the download progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let (url, archive_name) = match &args.url {
        Some(url) => {
            let name = archive_name_from_url(url)
                .ok_or_else(|| format!("Cannot derive a file name from URL: {url}"))?;
            (url.clone(), name)
        }
        None => (
            catalog_bundle_url(&args.galaxy),
            catalog_bundle_name(&args.galaxy),
        ),
    };

    let archive_path = args.output_dir.join(&archive_name);

    let fetcher = Fetcher::with_config(FetchConfig {
        show_progress: !args.quiet,
        ..FetchConfig::default()
    })?;

    println!("Fetching {url}");
    let outcome = fetcher.fetch(
        &archive_path,
        &url,
        FetchOptions {
            unpack: false,
            force_reload: args.force,
        },
    )?;
    if !outcome.was_downloaded() {
        println!("Using existing {}", archive_path.display());
    }

    let extracted = extract_archive(&archive_path, &args.output_dir)?;
    for path in &extracted {
        info!("extracted {}", path.display());
    }
    println!(
        "Extracted {} entries into {}",
        extracted.len(),
        args.output_dir.display()
    );

    if !args.keep_archive {
        std::fs::remove_file(&archive_path)?;
    }

    Ok(())
}
