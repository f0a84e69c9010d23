//! A search dispatcher that only renders the query it would send.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use strum::IntoEnumIterator;
use tracing::info;

use pharmit_core::error::{QueryError, Result};
use pharmit_core::filter::{FilterConfig, FilterField};
use pharmit_core::search::{QuerySnapshot, SearchDispatcher, SearchResults};

/// Builds the search request body for a snapshot.
///
/// Enabled features become `points`; filters use the query form's field
/// names and open range bounds are left out.
pub fn render_query(snapshot: &QuerySnapshot) -> Value {
    let points: Vec<Value> = snapshot
        .active_features()
        .map(|f| {
            json!({
                "name": f.kind,
                "x": f.position.x,
                "y": f.position.y,
                "z": f.position.z,
                "radius": f.radius,
            })
        })
        .collect();

    let mut body = Map::new();
    body.insert("points".to_string(), Value::Array(points));
    body.extend(render_filters(&snapshot.filters));
    Value::Object(body)
}

fn render_filters(filters: &FilterConfig) -> Map<String, Value> {
    let mut rendered = Map::new();
    for field in FilterField::iter() {
        if let Some(value) = filters.get(field) {
            let value = if field.is_integer() {
                json!(value as u64)
            } else {
                json!(value)
            };
            rendered.insert(field.to_string(), value);
        }
    }
    rendered
}

/// [`SearchDispatcher`] that answers every search with the request it would
/// have sent, without contacting a backend.
#[derive(Debug, Default, Clone)]
pub struct DryRunDispatcher {
    vendors: Option<Vec<String>>,
}

impl DryRunDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the vendors this dispatcher answers for.
    pub fn with_vendors(vendors: Vec<String>) -> Self {
        Self {
            vendors: Some(vendors),
        }
    }
}

#[async_trait]
impl SearchDispatcher for DryRunDispatcher {
    async fn submit(&self, vendor: &str, snapshot: QuerySnapshot) -> Result<SearchResults> {
        if let Some(vendors) = &self.vendors {
            if !vendors.iter().any(|v| v == vendor) {
                return Err(QueryError::dispatch(format!(
                    "no backend configured for vendor '{}'",
                    vendor
                )));
            }
        }

        let body = render_query(&snapshot);
        info!(
            vendor,
            points = snapshot.active_features().count(),
            "Dry-run search rendered"
        );
        Ok(SearchResults::new(vendor, json!({ "dry_run": true, "query": body })))
    }
}
