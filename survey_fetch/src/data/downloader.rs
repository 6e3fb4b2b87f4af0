//! Downloader module for retrieving remote survey files
//!
//! A fetch is a no-op when the destination already exists, so repeated calls
//! hit the network at most once. Passing `force_reload` removes the local copy
//! first. Gzip payloads can be decompressed on the way in, in which case the
//! body lands in `<destination>.gz` first and that intermediate is removed once
//! the decompressed file is in place.
//!
//! There is no retry and no checksum verification. Body data is written to a
//! `.part` sibling and renamed when complete, so an interrupted transfer never
//! leaves a file at the destination path itself.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::{Result, SurveyFetchError};

/// Gzip magic number, the first two bytes of every member
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Settings for the HTTP client and the copy loop
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Size of the buffer used to copy the response body to disk
    pub chunk_size: usize,

    /// Whole-request timeout. `None` disables it, which is what large
    /// catalog bundles need.
    pub timeout: Option<Duration>,

    /// User agent sent with every request
    pub user_agent: String,

    /// Draw a terminal progress bar while downloading
    pub show_progress: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8192,
            timeout: None,
            user_agent: concat!("survey_fetch/", env!("CARGO_PKG_VERSION")).to_string(),
            show_progress: false,
        }
    }
}

/// Per-call switches for [`Fetcher::fetch`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// The remote payload is gzip-compressed and should be stored decompressed
    pub unpack: bool,

    /// Delete any existing destination file and download again
    pub force_reload: bool,
}

/// What a successful fetch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination existed, nothing was requested
    AlreadyPresent,

    /// The file was downloaded; `bytes` counts the body as received
    Downloaded { bytes: u64 },
}

impl FetchOutcome {
    pub fn was_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded { .. })
    }
}

/// Blocking HTTP downloader
pub struct Fetcher {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Create a fetcher with [`FetchConfig::default`]
    pub fn new() -> Result<Self> {
        Self::with_config(FetchConfig::default())
    }

    /// Create a fetcher with explicit settings
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch `url` into `destination`.
    ///
    /// # Arguments
    /// * `destination` - Final path of the (decompressed) file
    /// * `url` - Remote location
    /// * `options` - Unpack / force-reload switches
    ///
    /// # Returns
    /// * `Ok(FetchOutcome::AlreadyPresent)` when the destination exists and no
    ///   reload was requested. No request is made in that case.
    /// * `Ok(FetchOutcome::Downloaded { .. })` after a successful transfer
    /// * `Err(SurveyFetchError)` on network, status, gzip or filesystem errors
    pub fn fetch(
        &self,
        destination: &Path,
        url: &str,
        options: FetchOptions,
    ) -> Result<FetchOutcome> {
        if options.force_reload {
            remove_if_present(destination)?;
        }

        if destination.exists() {
            debug!(
                "{} already present, skipping download",
                destination.display()
            );
            return Ok(FetchOutcome::AlreadyPresent);
        }

        ensure_parent_dir(destination)?;

        let bytes = if options.unpack {
            let gz_path = compressed_path(destination);
            let bytes = self.download_to(url, &gz_path)?;
            decompress_gzip(&gz_path, destination)?;
            fs::remove_file(&gz_path)?;
            bytes
        } else {
            self.download_to(url, destination)?
        };

        info!(
            "Fetched {} ({} bytes) into {}",
            url,
            bytes,
            destination.display()
        );
        Ok(FetchOutcome::Downloaded { bytes })
    }

    /// Stream the body of `url` into `path`, returning the byte count
    fn download_to(&self, url: &str, path: &Path) -> Result<u64> {
        debug!("GET {url}");
        let mut response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SurveyFetchError::BadStatus {
                url: url.to_string(),
                status,
            });
        }

        let progress = self.progress_bar(response.content_length());

        let part_path = partial_path(path);
        let mut file = BufWriter::new(File::create(&part_path)?);

        let mut buffer = vec![0u8; self.config.chunk_size.max(1)];
        let mut total: u64 = 0;
        loop {
            let bytes_read = response.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])?;
            total += bytes_read as u64;
            progress.inc(bytes_read as u64);
        }

        file.flush()?;
        drop(file);
        progress.finish_and_clear();

        fs::rename(&part_path, path)?;
        Ok(total)
    }

    fn progress_bar(&self, content_length: Option<u64>) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        match content_length {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) ETA: {eta}")
                {
                    pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
                }
                pb
            }
            None => ProgressBar::new_spinner(),
        }
    }
}

/// Fetch with a default-configured [`Fetcher`].
///
/// Shorthand for one-off downloads; callers fetching several files should
/// keep a `Fetcher` around to reuse its connection pool.
pub fn fetch_file(
    destination: &Path,
    url: &str,
    unpack: bool,
    force_reload: bool,
) -> Result<FetchOutcome> {
    Fetcher::new()?.fetch(
        destination,
        url,
        FetchOptions {
            unpack,
            force_reload,
        },
    )
}

/// Path of the compressed intermediate for `destination` (`<destination>.gz`)
pub fn compressed_path(destination: &Path) -> PathBuf {
    with_suffix(destination, ".gz")
}

fn partial_path(path: &Path) -> PathBuf {
    with_suffix(path, ".part")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {} for reload", path.display());
            Ok(())
        }
        // Nothing to reload; carry on with a fresh download
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Decompress a single-member gzip file into `output_path`.
///
/// The output is written to a `.part` sibling and renamed on success; on
/// failure the partial output is removed and the compressed input is kept.
pub fn decompress_gzip<P: AsRef<Path>, Q: AsRef<Path>>(gz_path: P, output_path: Q) -> Result<()> {
    let gz_path = gz_path.as_ref();
    let output_path = output_path.as_ref();

    let mut file = File::open(gz_path)?;

    let mut header = [0u8; 2];
    if file.read_exact(&mut header).is_err() || header != GZIP_MAGIC {
        return Err(SurveyFetchError::InvalidGzip {
            path: gz_path.to_path_buf(),
            reason: format!("bad magic number {header:02x?}"),
        });
    }

    let file = File::open(gz_path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));

    let part_path = partial_path(output_path);
    let mut writer = BufWriter::new(File::create(&part_path)?);

    let copied = io::copy(&mut decoder, &mut writer).and_then(|n| writer.flush().map(|_| n));
    drop(writer);

    match copied {
        Ok(n) => {
            fs::rename(&part_path, output_path)?;
            debug!(
                "Decompressed {} -> {} ({} bytes)",
                gz_path.display(),
                output_path.display(),
                n
            );
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&part_path);
            Err(SurveyFetchError::InvalidGzip {
                path: gz_path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}
