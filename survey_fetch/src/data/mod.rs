//! Data module for downloading and unpacking survey files
//!
//! This module provides the HTTP fetcher and the archive extraction used by
//! the catalog driver.

mod archive;
mod downloader;

pub use archive::{archive_name_from_url, extract_archive, ArchiveKind};
pub use downloader::{
    compressed_path, decompress_gzip, fetch_file, FetchConfig, FetchOptions, FetchOutcome,
    Fetcher,
};
