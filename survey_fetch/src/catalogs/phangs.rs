//! PHANGS-HST star cluster catalogs (MAST high-level science product, DR4)

/// MAST directory holding the per-galaxy catalog bundles
pub const CATALOG_BUNDLE_BASE_URL: &str = "https://archive.stsci.edu/hlsps/phangs-cat/dr4/bundles";

/// Galaxy used by the catalog driver when none is given
pub const DEFAULT_GALAXY: &str = "ngc1566";

/// File name of the catalog bundle for `galaxy` (e.g. `"ngc1566"`).
///
/// MAST file names are lower case, so the galaxy name is lower-cased.
pub fn catalog_bundle_name(galaxy: &str) -> String {
    format!(
        "hlsp_phangs-cat_hst_acs-uvis_{}_multi_v1_cats.tar.gz",
        galaxy.trim().to_lowercase()
    )
}

/// Download URL of the catalog bundle for `galaxy`
pub fn catalog_bundle_url(galaxy: &str) -> String {
    format!("{}/{}", CATALOG_BUNDLE_BASE_URL, catalog_bundle_name(galaxy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_url_matches_mast_layout() {
        assert_eq!(
            catalog_bundle_url("ngc1566"),
            "https://archive.stsci.edu/hlsps/phangs-cat/dr4/bundles/hlsp_phangs-cat_hst_acs-uvis_ngc1566_multi_v1_cats.tar.gz"
        );
    }

    #[test]
    fn test_bundle_name_is_lower_case() {
        assert_eq!(
            catalog_bundle_name(" NGC628 "),
            "hlsp_phangs-cat_hst_acs-uvis_ngc628_multi_v1_cats.tar.gz"
        );
    }
}
