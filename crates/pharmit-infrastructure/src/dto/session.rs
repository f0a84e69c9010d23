//! Session document DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Features (all enabled), filters and vendor
//! - **1.1.0**: Per-feature `enabled` flag, per-role `styles`, `saved_at` timestamp

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use pharmit_core::feature::{Feature, FeatureKind, Position};
use pharmit_core::filter::FilterConfig;
use pharmit_core::session::SessionDocument;
use pharmit_core::visualization::{Role, StyleId};

// ============================================================================
// Filter DTO
// ============================================================================

/// Filter values keyed by the query form's field names.
///
/// Unchanged between document versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiltersDTO {
    #[serde(rename = "max-orient", default)]
    pub max_orient: u32,
    #[serde(rename = "reduceConfs", default)]
    pub reduce_confs: u32,
    #[serde(rename = "max-hits", default)]
    pub max_hits: u32,
    #[serde(rename = "minMolWeight", default, skip_serializing_if = "Option::is_none")]
    pub min_mol_weight: Option<f64>,
    #[serde(rename = "maxMolWeight", default, skip_serializing_if = "Option::is_none")]
    pub max_mol_weight: Option<f64>,
    #[serde(rename = "minrotbonds", default, skip_serializing_if = "Option::is_none")]
    pub min_rot_bonds: Option<u32>,
    #[serde(rename = "maxrotbonds", default, skip_serializing_if = "Option::is_none")]
    pub max_rot_bonds: Option<u32>,
}

impl From<&FilterConfig> for FiltersDTO {
    fn from(filters: &FilterConfig) -> Self {
        let (min_mol_weight, max_mol_weight) = filters.mol_weight_range();
        let (min_rot_bonds, max_rot_bonds) = filters.rotatable_bonds_range();
        FiltersDTO {
            max_orient: filters.max_hits_per_conformation(),
            reduce_confs: filters.max_hits_per_molecule(),
            max_hits: filters.max_total_hits(),
            min_mol_weight,
            max_mol_weight,
            min_rot_bonds,
            max_rot_bonds,
        }
    }
}

impl From<FiltersDTO> for FilterConfig {
    fn from(dto: FiltersDTO) -> Self {
        FilterConfig::with_hit_limits(dto.max_orient, dto.reduce_confs, dto.max_hits)
            .with_mol_weight(dto.min_mol_weight, dto.max_mol_weight)
            .with_rotatable_bonds(dto.min_rot_bonds, dto.max_rot_bonds)
    }
}

// ============================================================================
// Feature DTOs
// ============================================================================

/// Feature DTO V1.0.0. Every feature is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureV1_0_0 {
    pub name: FeatureKind,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
}

/// Feature DTO V1.1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureV1_1_0 {
    pub name: FeatureKind,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl From<FeatureV1_0_0> for FeatureV1_1_0 {
    fn from(old: FeatureV1_0_0) -> Self {
        FeatureV1_1_0 {
            name: old.name,
            x: old.x,
            y: old.y,
            z: old.z,
            radius: old.radius,
            enabled: true,
        }
    }
}

impl From<&Feature> for FeatureV1_1_0 {
    fn from(feature: &Feature) -> Self {
        FeatureV1_1_0 {
            name: feature.kind,
            x: feature.position.x,
            y: feature.position.y,
            z: feature.position.z,
            radius: feature.radius,
            enabled: feature.enabled,
        }
    }
}

impl From<FeatureV1_1_0> for Feature {
    fn from(dto: FeatureV1_1_0) -> Self {
        Feature {
            kind: dto.name,
            position: Position::new(dto.x, dto.y, dto.z),
            radius: dto.radius,
            enabled: dto.enabled,
        }
    }
}

// ============================================================================
// SessionDocument DTOs
// ============================================================================

/// Session document V1.0.0 (initial version).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct SessionDocumentV1_0_0 {
    pub features: Vec<FeatureV1_0_0>,
    #[serde(default)]
    pub filters: FiltersDTO,
    pub vendor: String,
}

/// Session document V1.1.0: adds per-feature `enabled`, `styles` and `saved_at`.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct SessionDocumentV1_1_0 {
    pub features: Vec<FeatureV1_1_0>,
    #[serde(default)]
    pub filters: FiltersDTO,
    /// Palette index per role. Roles left out use the catalog default.
    #[serde(default)]
    pub styles: BTreeMap<Role, StyleId>,
    pub vendor: String,
    /// RFC 3339 time of the save. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

/// Type alias for the latest session document version.
pub type SessionDocumentDTO = SessionDocumentV1_1_0;

/// Migration from V1.0.0 to V1.1.0.
/// Features become enabled and styles fall back to catalog defaults.
impl MigratesTo<SessionDocumentV1_1_0> for SessionDocumentV1_0_0 {
    fn migrate(self) -> SessionDocumentV1_1_0 {
        SessionDocumentV1_1_0 {
            features: self.features.into_iter().map(Into::into).collect(),
            filters: self.filters,
            styles: BTreeMap::new(),
            vendor: self.vendor,
            saved_at: None,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Convert SessionDocumentV1_1_0 DTO to domain model. `saved_at` is dropped.
impl IntoDomain<SessionDocument> for SessionDocumentV1_1_0 {
    fn into_domain(self) -> SessionDocument {
        SessionDocument {
            features: self.features.into_iter().map(Into::into).collect(),
            filters: self.filters.into(),
            styles: self.styles,
            vendor: self.vendor,
        }
    }
}

/// Convert domain model to SessionDocumentV1_1_0 DTO, stamping the save time.
impl FromDomain<SessionDocument> for SessionDocumentV1_1_0 {
    fn from_domain(document: SessionDocument) -> Self {
        SessionDocumentV1_1_0 {
            features: document.features.iter().map(Into::into).collect(),
            filters: (&document.filters).into(),
            styles: document.styles,
            vendor: document.vendor,
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for session documents.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Adds `enabled` (true), empty `styles`
/// - V1.1.0 → SessionDocument: Converts DTO to domain model
///
/// # Example
///
/// ```ignore
/// let migrator = create_session_document_migrator();
/// let document: SessionDocument = migrator.load_flat_from("session_document", json_value)?;
/// ```
pub fn create_session_document_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let session_path = version_migrate::Migrator::define("session_document")
        .from::<SessionDocumentV1_0_0>()
        .step::<SessionDocumentV1_1_0>()
        .into_with_save::<SessionDocument>();

    migrator
        .register(session_path)
        .expect("Failed to register session_document migration path");

    migrator
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmit_core::filter::FilterField;

    #[test]
    fn test_session_document_migration_v1_0_0_to_domain() {
        let migrator = create_session_document_migrator();

        let json = serde_json::json!({
            "version": "1.0.0",
            "features": [
                { "name": "Hydrophobic", "x": 0.0, "y": 0.0, "z": 0.0, "radius": 1.0 },
                { "name": "Aromatic", "x": 1.0, "y": 1.0, "z": 1.0, "radius": 1.5 }
            ],
            "filters": { "max-hits": 50, "minMolWeight": 200.0 },
            "vendor": "ZINC"
        });

        let result: Result<SessionDocument, _> = migrator.load_flat_from("session_document", json);
        assert!(result.is_ok(), "Migration failed: {:?}", result.err());

        let document = result.unwrap();
        assert_eq!(document.features.len(), 2);
        assert!(document.features.iter().all(|f| f.enabled));
        assert_eq!(document.features[1].kind, FeatureKind::Aromatic);
        assert_eq!(document.filters.max_total_hits(), 50);
        assert_eq!(document.filters.get(FilterField::MinMolWeight), Some(200.0));
        assert_eq!(document.filters.get(FilterField::MaxMolWeight), None);
        assert!(document.styles.is_empty());
        assert_eq!(document.vendor, "ZINC");
    }

    #[test]
    fn test_session_document_v1_1_0_keeps_enabled_and_styles() {
        let migrator = create_session_document_migrator();

        let json = serde_json::json!({
            "version": "1.1.0",
            "features": [
                { "name": "HydrogenDonor", "x": 2.0, "y": 0.0, "z": -1.0, "radius": 0.5, "enabled": false }
            ],
            "filters": { "reduceConfs": 3, "maxrotbonds": 4 },
            "styles": { "Receptor": 4 },
            "vendor": "MolPort",
            "saved_at": "2024-05-01T12:00:00+00:00"
        });

        let document: SessionDocument = migrator.load_flat_from("session_document", json).unwrap();
        assert!(!document.features[0].enabled);
        assert_eq!(document.features[0].position, Position::new(2.0, 0.0, -1.0));
        assert_eq!(document.filters.max_hits_per_molecule(), 3);
        assert_eq!(document.filters.rotatable_bonds_range(), (None, Some(4)));
        assert_eq!(document.styles.get(&Role::Receptor), Some(&StyleId(4)));
    }

    #[test]
    fn test_filters_dto_uses_form_keys() {
        let filters = FilterConfig::with_hit_limits(1, 2, 3).with_mol_weight(Some(150.0), None);
        let value = serde_json::to_value(FiltersDTO::from(&filters)).unwrap();

        assert_eq!(value["max-orient"], 1);
        assert_eq!(value["reduceConfs"], 2);
        assert_eq!(value["max-hits"], 3);
        assert_eq!(value["minMolWeight"], 150.0);
        assert!(value.get("maxMolWeight").is_none());

        let back: FilterConfig = serde_json::from_value::<FiltersDTO>(value).unwrap().into();
        assert_eq!(back, filters);
    }
}
