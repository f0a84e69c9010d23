//! Search domain models.

use serde::{Deserialize, Serialize};

use crate::feature::Feature;
use crate::filter::FilterConfig;

/// The immutable part of a session handed to the dispatcher.
///
/// Owned outright by the in-flight search, so edits made while it runs
/// cannot reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySnapshot {
    /// All features in insertion order, including disabled ones.
    pub features: Vec<Feature>,
    pub filters: FilterConfig,
    pub vendor: String,
}

impl QuerySnapshot {
    /// Features that constrain the search.
    pub fn active_features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| f.enabled)
    }
}

/// Result of a dispatched search.
///
/// The vendor-specific response is carried as-is; the core does not interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub vendor: String,
    /// Number of hits, when the backend reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_count: Option<usize>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl SearchResults {
    pub fn new(vendor: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            vendor: vendor.into(),
            hit_count: None,
            payload,
        }
    }

    pub fn with_hit_count(mut self, hit_count: usize) -> Self {
        self.hit_count = Some(hit_count);
        self
    }
}
