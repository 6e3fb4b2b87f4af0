//! Survey catalog locations
//!
//! This module knows where published catalog bundles live and how they are
//! named.

pub mod phangs;

pub use phangs::{catalog_bundle_name, catalog_bundle_url};
