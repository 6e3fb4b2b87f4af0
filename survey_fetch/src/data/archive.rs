//! Tarball extraction for downloaded survey bundles

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, info, warn};
use tar::Archive;

use crate::{Result, SurveyFetchError};

/// Archive formats understood by [`extract_archive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Gzip-compressed tarball (`.tar.gz` or `.tgz`)
    TarGz,
    /// Uncompressed tarball (`.tar`)
    Tar,
}

impl ArchiveKind {
    /// Determine the archive format from the file name suffix
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SurveyFetchError::UnsupportedArchive(path.display().to_string()))?;

        if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
            Ok(ArchiveKind::TarGz)
        } else if file_name.ends_with(".tar") {
            Ok(ArchiveKind::Tar)
        } else {
            Err(SurveyFetchError::UnsupportedArchive(file_name.to_string()))
        }
    }
}

/// Last path segment of `url`, ignoring any query string or fragment.
///
/// Returns `None` for unparsable URLs and for URLs ending in `/`.
pub fn archive_name_from_url(url: &str) -> Option<String> {
    let url = reqwest::Url::parse(url).ok()?;
    url.path_segments()?
        .last()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Extract every entry of a tarball below `destination`.
///
/// Entries whose paths would land outside `destination` (absolute paths or
/// `..` components) are skipped with a warning.
///
/// # Returns
/// The relative paths of the extracted entries, in archive order
pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<Vec<PathBuf>> {
    let kind = ArchiveKind::from_path(archive_path)?;
    info!(
        "Extracting {} into {}",
        archive_path.display(),
        destination.display()
    );

    fs::create_dir_all(destination)?;

    let file = BufReader::new(File::open(archive_path)?);
    let extracted = match kind {
        ArchiveKind::TarGz => unpack_entries(Archive::new(GzDecoder::new(file)), destination)?,
        ArchiveKind::Tar => unpack_entries(Archive::new(file), destination)?,
    };

    info!("Extracted {} entries", extracted.len());
    Ok(extracted)
}

fn unpack_entries<R: Read>(mut archive: Archive<R>, destination: &Path) -> Result<Vec<PathBuf>> {
    let mut extracted = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        if entry.unpack_in(destination)? {
            debug!("  {}", path.display());
            extracted.push(path);
        } else {
            warn!("Skipped archive entry outside destination: {}", path.display());
        }
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case("https://host/cats/bundle.tar.gz", Some("bundle.tar.gz"))]
    #[case("https://host/cats/bundle.tar.gz?token=x", Some("bundle.tar.gz"))]
    #[case("https://host/bundle.tgz#part", Some("bundle.tgz"))]
    #[case("https://host/cats/", None)]
    #[case("not a url", None)]
    fn test_archive_name_from_url(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(archive_name_from_url(url).as_deref(), expected);
    }

    #[test]
    fn test_name_with_query_is_a_known_archive() {
        let name = archive_name_from_url("https://host/b.tar.gz?token=x&sig=y").unwrap();
        assert_eq!(ArchiveKind::from_path(Path::new(&name)).unwrap(), ArchiveKind::TarGz);
    }

    fn build_tar<W: std::io::Write>(writer: W, files: &[(&str, &[u8])]) -> W {
        let mut builder = tar::Builder::new(writer);
        for (name, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *contents).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[rstest]
    #[case("bundle.tar.gz", Some(ArchiveKind::TarGz))]
    #[case("bundle.tgz", Some(ArchiveKind::TarGz))]
    #[case("bundle.tar", Some(ArchiveKind::Tar))]
    #[case("bundle.zip", None)]
    #[case("catalog.fits.gz", None)]
    fn test_kind_from_path(#[case] name: &str, #[case] expected: Option<ArchiveKind>) {
        let kind = ArchiveKind::from_path(Path::new(name)).ok();
        assert_eq!(kind, expected);
    }

    #[test]
    fn test_extract_tar_gz() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("cats.tar.gz");

        let encoder = GzEncoder::new(File::create(&archive_path).unwrap(), Compression::fast());
        let encoder = build_tar(
            encoder,
            &[
                ("cats/ngc1566_cluster_human_ml.fits", b"SIMPLE  =  T"),
                ("cats/README.txt", b"PHANGS-HST catalogs"),
            ],
        );
        encoder.finish().unwrap();

        let out_dir = dir.path().join("out");
        let extracted = extract_archive(&archive_path, &out_dir).unwrap();

        assert_eq!(extracted.len(), 2);
        assert_eq!(
            fs::read(out_dir.join("cats/README.txt")).unwrap(),
            b"PHANGS-HST catalogs"
        );
        assert!(out_dir.join("cats/ngc1566_cluster_human_ml.fits").exists());
    }

    #[test]
    fn test_extract_plain_tar() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("plain.tar");
        build_tar(
            File::create(&archive_path).unwrap(),
            &[("table.csv", b"id,ra,dec\n")],
        );

        let extracted = extract_archive(&archive_path, dir.path()).unwrap();

        assert_eq!(extracted, vec![PathBuf::from("table.csv")]);
        assert_eq!(fs::read(dir.path().join("table.csv")).unwrap(), b"id,ra,dec\n");
    }

    #[test]
    fn test_unsupported_suffix_is_an_error() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("bundle.zip");
        fs::write(&archive_path, b"PK").unwrap();

        let result = extract_archive(&archive_path, dir.path());
        assert!(matches!(
            result,
            Err(SurveyFetchError::UnsupportedArchive(_))
        ));
    }

    #[test]
    fn test_corrupt_tarball_is_an_error() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("broken.tar.gz");
        fs::write(&archive_path, b"definitely not gzip").unwrap();

        assert!(extract_archive(&archive_path, &dir.path().join("out")).is_err());
    }
}
