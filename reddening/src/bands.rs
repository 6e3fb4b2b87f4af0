//! Photometric bands and their mean wavelengths

use serde::{Deserialize, Serialize};

use crate::types::Wavelength;

/// A filter with its mean wavelength and a short alias such as `v`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub alias: String,
    pub mean_wavelength: Wavelength,
}

impl Band {
    pub fn new(name: &str, alias: &str, mean_wavelength_angstrom: f64) -> Self {
        Self {
            name: name.to_string(),
            alias: alias.to_string(),
            mean_wavelength: Wavelength::from_angstrom(mean_wavelength_angstrom),
        }
    }
}

/// Lookup table of bands, searched by filter name or alias (case-insensitive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    bands: Vec<Band>,
}

impl BandTable {
    pub fn new(bands: Vec<Band>) -> Self {
        Self { bands }
    }

    /// HST WFC3/UVIS1 broad bands used for PHANGS-HST cluster photometry
    pub fn hst_wfc3_uvis1() -> Self {
        Self::new(vec![
            Band::new("F275W", "nuv", 2734.9),
            Band::new("F336W", "u", 3366.0),
            Band::new("F438W", "b", 4338.6),
            Band::new("F555W", "v", 5361.0),
            Band::new("F814W", "i", 8205.0),
        ])
    }

    pub fn get(&self, key: &str) -> Option<&Band> {
        let key = key.trim();
        self.bands
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(key) || b.alias.eq_ignore_ascii_case(key))
    }

    pub fn wavelength(&self, key: &str) -> Option<Wavelength> {
        self.get(key).map(|b| b.mean_wavelength)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Band> {
        self.bands.iter()
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self::hst_wfc3_uvis1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_or_alias() {
        let table = BandTable::default();
        assert_eq!(table.get("F555W").unwrap().alias, "v");
        assert_eq!(table.get("f555w").unwrap().alias, "v");
        assert_eq!(table.get(" V ").unwrap().name, "F555W");
        assert_eq!(table.get("nuv").unwrap().name, "F275W");
        assert!(table.get("F200LP").is_none());
    }

    #[test]
    fn test_bands_ordered_blue_to_red() {
        let table = BandTable::hst_wfc3_uvis1();
        let waves: Vec<f64> = table.iter().map(|b| b.mean_wavelength.angstrom()).collect();
        assert!(waves.windows(2).all(|w| w[0] < w[1]));
    }
}
