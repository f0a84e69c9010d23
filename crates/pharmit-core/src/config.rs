//! Catalog configuration as stored in `catalog.toml`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::QueryCatalog;
use crate::error::Result;
use crate::visualization::{Role, StyleEntry, StyleId};

/// Palette names offered by the query panel, in selector order.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "None", "RasMol", "White", "Green", "Cyan", "Magenta", "Yellow", "Orange", "Purple", "Blue",
];

/// Search backends offered by default. The first one is preselected.
pub const DEFAULT_VENDORS: [&str; 2] = ["MolPort", "ZINC"];

/// Palette index selected for each role in a new session.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultStyles {
    pub ligand: usize,
    pub results: usize,
    pub receptor: usize,
}

impl Default for DefaultStyles {
    fn default() -> Self {
        Self {
            ligand: 1,
            results: 1,
            receptor: 2,
        }
    }
}

/// Root of `catalog.toml`.
///
/// ```toml
/// vendors = ["MolPort", "ZINC"]
///
/// [default_styles]
/// ligand = 1
/// results = 1
/// receptor = 2
///
/// [[style]]
/// name = "None"
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    pub vendors: Vec<String>,
    pub default_styles: DefaultStyles,
    #[serde(rename = "style")]
    pub palette: Vec<StyleEntry>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            vendors: DEFAULT_VENDORS.iter().map(|v| v.to_string()).collect(),
            default_styles: DefaultStyles::default(),
            palette: DEFAULT_PALETTE.iter().map(|name| StyleEntry::new(*name)).collect(),
        }
    }
}

impl CatalogConfig {
    /// Checks the configuration without consuming it.
    pub fn validate(&self) -> Result<()> {
        self.clone().into_catalog().map(|_| ())
    }

    /// Converts the configuration into the shared, read-only catalog.
    pub fn into_catalog(self) -> Result<QueryCatalog> {
        let default_styles = BTreeMap::from([
            (Role::Ligand, StyleId(self.default_styles.ligand)),
            (Role::Results, StyleId(self.default_styles.results)),
            (Role::Receptor, StyleId(self.default_styles.receptor)),
        ]);
        QueryCatalog::new(self.palette, self.vendors, default_styles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CatalogConfig::default();
        assert!(config.validate().is_ok());

        let catalog = config.into_catalog().unwrap();
        assert_eq!(catalog.palette().len(), 10);
        assert_eq!(catalog.vendors().to_vec(), vec!["MolPort", "ZINC"]);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CatalogConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: CatalogConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: CatalogConfig = toml::from_str(r#"vendors = ["ZINC", "CHEMBL"]"#).unwrap();
        assert_eq!(parsed.vendors, vec!["ZINC", "CHEMBL"]);
        assert_eq!(parsed.palette.len(), DEFAULT_PALETTE.len());
        assert_eq!(parsed.default_styles, DefaultStyles::default());
    }

    #[test]
    fn test_invalid_default_style_is_reported() {
        let mut config = CatalogConfig::default();
        config.default_styles.receptor = 42;
        assert!(config.validate().is_err());
    }
}
