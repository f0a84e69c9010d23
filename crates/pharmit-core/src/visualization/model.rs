//! Per-role display style selection.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::debug;

use crate::catalog::QueryCatalog;
use crate::error::{QueryError, Result};

/// Which molecule a style applies to in the viewer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Role {
    Ligand,
    Results,
    Receptor,
}

impl Role {
    /// Parses a role name, reporting `UnknownRole` for anything else.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name.trim()).map_err(|_| QueryError::UnknownRole {
            role: name.to_string(),
        })
    }
}

/// Index into the style palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleId(pub usize);

/// A named palette entry. Colors themselves belong to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub name: String,
}

impl StyleEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The style chosen for each role. Has no effect on search semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationPrefs {
    palette: Arc<[StyleEntry]>,
    styles: BTreeMap<Role, StyleId>,
}

impl VisualizationPrefs {
    /// Starts from the catalog's default style for every role.
    pub fn new(catalog: &QueryCatalog) -> Self {
        let styles = Role::iter()
            .map(|role| (role, catalog.default_style(role)))
            .collect();
        Self {
            palette: catalog.palette(),
            styles,
        }
    }

    pub fn set_style(&mut self, role: Role, style: StyleId) -> Result<()> {
        if style.0 >= self.palette.len() {
            return Err(QueryError::UnknownStyle {
                style: style.0,
                palette_len: self.palette.len(),
            });
        }
        self.styles.insert(role, style);
        debug!(%role, style = style.0, "Style selected");
        Ok(())
    }

    /// Same as [`VisualizationPrefs::set_style`] for a role given by name.
    pub fn set_style_by_name(&mut self, role: &str, style: usize) -> Result<()> {
        let role = Role::parse(role)?;
        self.set_style(role, StyleId(style))
    }

    pub fn style(&self, role: Role) -> StyleId {
        self.styles.get(&role).copied().unwrap_or(StyleId(0))
    }

    pub fn style_entry(&self, role: Role) -> Option<&StyleEntry> {
        self.palette.get(self.style(role).0)
    }

    pub fn styles(&self) -> &BTreeMap<Role, StyleId> {
        &self.styles
    }

    pub fn palette(&self) -> &[StyleEntry] {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn prefs() -> VisualizationPrefs {
        let catalog = CatalogConfig::default().into_catalog().unwrap();
        VisualizationPrefs::new(&catalog)
    }

    #[test]
    fn test_defaults_follow_catalog() {
        let prefs = prefs();
        assert_eq!(prefs.style(Role::Ligand), StyleId(1));
        assert_eq!(prefs.style(Role::Results), StyleId(1));
        assert_eq!(prefs.style(Role::Receptor), StyleId(2));
        assert_eq!(prefs.style_entry(Role::Receptor).unwrap().name, "White");
    }

    #[test]
    fn test_set_style() {
        let mut prefs = prefs();
        prefs.set_style(Role::Results, StyleId(4)).unwrap();
        assert_eq!(prefs.style_entry(Role::Results).unwrap().name, "Cyan");
    }

    #[test]
    fn test_unknown_style_keeps_previous() {
        let mut prefs = prefs();
        let err = prefs.set_style(Role::Ligand, StyleId(10)).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownStyle {
                style: 10,
                palette_len: 10
            }
        );
        assert_eq!(prefs.style(Role::Ligand), StyleId(1));
    }

    #[test]
    fn test_unknown_role() {
        let mut prefs = prefs();
        assert!(matches!(
            prefs.set_style_by_name("solvent", 1),
            Err(QueryError::UnknownRole { role }) if role == "solvent"
        ));
        prefs.set_style_by_name("receptor", 0).unwrap();
        assert_eq!(prefs.style(Role::Receptor), StyleId(0));
    }
}
