//! Test artifact locations shared across the workspace.
//!
//! Tests that produce something worth looking at by eye (rendered plots,
//! cutout previews) write it below `<workspace root>/test_output/` instead of
//! a throwaway temporary directory:
//!
//! ```text
//! test_output/
//! ├── reddening/    # color-color diagrams with reddening vectors
//! └── cutouts/      # cutout previews
//! ```
//!
//! ```rust
//! use test_helpers::output_path;
//!
//! let png = output_path("reddening/vi_ub.png");
//! assert!(png.parent().unwrap().is_dir());
//! ```

use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

/// Walk up from the current directory to the Cargo.toml declaring
/// `[workspace]`.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {e}"))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.is_file() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!(
                    "Failed to read {}: {e}",
                    cargo_toml.display()
                ))
            })?;
            if content.lines().any(|line| line.trim() == "[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            return Err(TestHelperError::ProjectRootNotFound(
                "no Cargo.toml with a [workspace] table above the current directory".to_string(),
            ));
        }
    }
}

static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// `<workspace root>/test_output`, created on first use
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");
    std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    output_dir
}

/// Path below the output directory; intermediate directories are created so
/// the caller can write to the result straight away.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let full = get_output_dir().join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create output subdirectory");
    }
    full
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_root_is_the_workspace() {
        let root = find_project_root().expect("Failed to find project root");
        assert!(root.join("Cargo.toml").exists());
        assert!(root.join("test_helpers").is_dir());
    }

    #[test]
    fn test_output_dir_created() {
        let output = get_output_dir();
        assert!(output.is_dir());
    }

    #[test]
    fn test_output_path_creates_parents() {
        let path = output_path("helpers_selftest/nested/file.txt");
        assert_eq!(
            path,
            get_output_dir().join("helpers_selftest/nested/file.txt")
        );
        assert!(path.parent().unwrap().is_dir());
    }
}
