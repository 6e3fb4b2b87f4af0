//! Retrieval of remote survey data products.
//!
//! This crate downloads files over HTTP (optionally gunzipping them on the
//! way in) and unpacks tarball bundles such as the PHANGS-HST cluster
//! catalogs.
//!
//! ```no_run
//! use survey_fetch::catalogs::phangs;
//! use survey_fetch::data::{extract_archive, FetchOptions, Fetcher};
//! use std::path::Path;
//!
//! # fn main() -> survey_fetch::Result<()> {
//! let url = phangs::catalog_bundle_url("ngc1566");
//! let archive = Path::new(&phangs::catalog_bundle_name("ngc1566")).to_path_buf();
//!
//! let fetcher = Fetcher::new()?;
//! fetcher.fetch(&archive, &url, FetchOptions::default())?;
//! extract_archive(&archive, Path::new("."))?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;

pub mod catalogs;
pub mod data;

/// Errors raised while downloading or unpacking survey data
#[derive(Debug, Error)]
pub enum SurveyFetchError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request for {url} failed with status {status}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Invalid gzip file {path}: {reason}")]
    InvalidGzip { path: PathBuf, reason: String },

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),
}

pub type Result<T> = std::result::Result<T, SurveyFetchError>;
