//! Read-only style palette and vendor list shared by every session.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::error::{QueryError, Result};
use crate::visualization::{Role, StyleEntry, StyleId};

/// The palette and vendor tables supplied at initialization.
///
/// Cloning is cheap; all sessions created from one catalog share its tables.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCatalog {
    palette: Arc<[StyleEntry]>,
    vendors: Arc<[String]>,
    default_styles: BTreeMap<Role, StyleId>,
}

impl QueryCatalog {
    /// Builds a catalog, checking that the tables are usable.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Config` if the palette or vendor list is empty,
    /// a vendor name is blank or repeated, or a default style is outside the palette.
    pub fn new(
        palette: Vec<StyleEntry>,
        vendors: Vec<String>,
        default_styles: BTreeMap<Role, StyleId>,
    ) -> Result<Self> {
        if palette.is_empty() {
            return Err(QueryError::config("style palette must not be empty"));
        }
        if vendors.is_empty() {
            return Err(QueryError::config("vendor list must not be empty"));
        }

        let mut seen = HashSet::new();
        for vendor in &vendors {
            if vendor.trim().is_empty() {
                return Err(QueryError::config("vendor names must not be blank"));
            }
            if !seen.insert(vendor.as_str()) {
                return Err(QueryError::config(format!(
                    "vendor '{}' is listed more than once",
                    vendor
                )));
            }
        }

        for (role, style) in &default_styles {
            if style.0 >= palette.len() {
                return Err(QueryError::config(format!(
                    "default {} style {} is outside the palette ({} entries)",
                    role,
                    style.0,
                    palette.len()
                )));
            }
        }

        Ok(Self {
            palette: palette.into(),
            vendors: vendors.into(),
            default_styles,
        })
    }

    pub fn palette(&self) -> Arc<[StyleEntry]> {
        Arc::clone(&self.palette)
    }

    pub fn vendors(&self) -> Arc<[String]> {
        Arc::clone(&self.vendors)
    }

    /// The vendor selected in a fresh session.
    pub fn default_vendor(&self) -> &str {
        &self.vendors[0]
    }

    /// The style a fresh session uses for `role`; the first palette entry if unset.
    pub fn default_style(&self, role: Role) -> StyleId {
        self.default_styles.get(&role).copied().unwrap_or(StyleId(0))
    }

    pub fn has_vendor(&self, name: &str) -> bool {
        self.vendors.iter().any(|v| v == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<StyleEntry> {
        vec![StyleEntry::new("None"), StyleEntry::new("RasMol")]
    }

    #[test]
    fn test_rejects_empty_tables() {
        assert!(QueryCatalog::new(vec![], vec!["ZINC".into()], BTreeMap::new()).is_err());
        assert!(QueryCatalog::new(palette(), vec![], BTreeMap::new()).is_err());
    }

    #[test]
    fn test_rejects_duplicate_vendor() {
        let err = QueryCatalog::new(
            palette(),
            vec!["ZINC".into(), "ZINC".into()],
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_rejects_default_style_outside_palette() {
        let defaults = BTreeMap::from([(Role::Receptor, StyleId(2))]);
        assert!(QueryCatalog::new(palette(), vec!["ZINC".into()], defaults).is_err());
    }

    #[test]
    fn test_first_vendor_is_default() {
        let catalog = QueryCatalog::new(
            palette(),
            vec!["MolPort".into(), "ZINC".into()],
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(catalog.default_vendor(), "MolPort");
        assert_eq!(catalog.default_style(Role::Ligand), StyleId(0));
        assert!(catalog.has_vendor("ZINC"));
        assert!(!catalog.has_vendor("zinc"));
    }
}
