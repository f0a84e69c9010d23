//! The complete editable state of a query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::QueryCatalog;
use crate::error::{QueryError, Result};
use crate::feature::{Feature, FeatureSet};
use crate::filter::FilterConfig;
use crate::search::QuerySnapshot;
use crate::vendor::VendorSelector;
use crate::visualization::{Role, StyleId, VisualizationPrefs};

/// Serializable form of a session: what is saved, loaded and republished to the view.
///
/// Unlike [`SessionState`] it carries no catalog tables, only the choices
/// made against them (style ids, vendor name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Features in insertion order.
    pub features: Vec<Feature>,
    pub filters: FilterConfig,
    /// Style id per role.
    pub styles: BTreeMap<Role, StyleId>,
    /// Name of the selected vendor.
    pub vendor: String,
}

/// Features, filters, styles and vendor choice of one query.
///
/// A value type: two sessions with equal fields are the same session.
/// Superseded wholesale on load and on "new query".
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub features: FeatureSet,
    pub filters: FilterConfig,
    pub visualization: VisualizationPrefs,
    pub vendor: VendorSelector,
}

impl SessionState {
    /// An empty query using the catalog defaults.
    pub fn new(catalog: &QueryCatalog) -> Self {
        Self {
            features: FeatureSet::new(),
            filters: FilterConfig::new(),
            visualization: VisualizationPrefs::new(catalog),
            vendor: VendorSelector::new(catalog),
        }
    }

    /// Rebuilds a session from a document, binding it to `catalog`.
    ///
    /// Feature invariants, stored filter values, style ids and the vendor name
    /// are checked here and reported as `SessionParseError`. Filter *ordering*
    /// invariants are not: the caller decides how to surface those.
    pub fn from_document(document: SessionDocument, catalog: &QueryCatalog) -> Result<Self> {
        let mut session = Self::new(catalog);

        session
            .features
            .replace_all(document.features)
            .map_err(|e| QueryError::session_parse(format!("invalid feature list: {}", e)))?;

        document
            .filters
            .check_values()
            .map_err(|e| QueryError::session_parse(format!("invalid filters: {}", e)))?;
        session.filters = document.filters;

        for (role, style) in document.styles {
            session
                .visualization
                .set_style(role, style)
                .map_err(|e| QueryError::session_parse(format!("invalid {} style: {}", role, e)))?;
        }

        session
            .vendor
            .select_vendor(&document.vendor)
            .map_err(|e| QueryError::session_parse(e.to_string()))?;

        Ok(session)
    }

    pub fn to_document(&self) -> SessionDocument {
        SessionDocument {
            features: self.features.to_list(),
            filters: self.filters.clone(),
            styles: self.visualization.styles().clone(),
            vendor: self.vendor.selected().to_string(),
        }
    }

    /// Deep copy of what a search needs. Visualization is display-only and left out.
    pub fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            features: self.features.to_list(),
            filters: self.filters.clone(),
            vendor: self.vendor.selected().to_string(),
        }
    }
}
