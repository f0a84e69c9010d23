//! Pharmacophore feature domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{QueryError, Result};

/// The kind of spatial constraint a feature places on a matching molecule.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum FeatureKind {
    Aromatic,
    HydrogenDonor,
    HydrogenAcceptor,
    Hydrophobic,
    NegativeIon,
    PositiveIon,
    /// Region every hit must overlap.
    InclusionSphere,
    /// Region no hit atom may occupy.
    ExclusionSphere,
}

impl FeatureKind {
    /// Radius given to a feature of this kind when none is supplied.
    pub fn default_radius(self) -> f64 {
        match self {
            Self::Aromatic => 1.1,
            Self::HydrogenDonor | Self::HydrogenAcceptor => 0.5,
            Self::Hydrophobic => 1.0,
            Self::NegativeIon | Self::PositiveIon => 0.75,
            Self::InclusionSphere | Self::ExclusionSphere => 1.0,
        }
    }
}

/// A point in the viewer's Cartesian frame, in Ångström.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when no coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// One pharmacophore constraint of a query.
///
/// A disabled feature stays in its set (and in saved sessions) but does not
/// constrain the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub kind: FeatureKind,
    pub position: Position,
    pub radius: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Feature {
    /// Creates an enabled feature. Invariants are checked when it enters a set.
    pub fn new(kind: FeatureKind, position: impl Into<Position>, radius: f64) -> Self {
        Self {
            kind,
            position: position.into(),
            radius,
            enabled: true,
        }
    }

    /// Creates an enabled feature with the kind's default radius.
    pub fn with_default_radius(kind: FeatureKind, position: impl Into<Position>) -> Self {
        Self::new(kind, position, kind.default_radius())
    }

    /// Checks `radius > 0` and a finite position.
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(QueryError::invalid_feature(format!(
                "radius must be a positive finite number, got {}",
                self.radius
            )));
        }
        if !self.position.is_finite() {
            return Err(QueryError::invalid_feature(format!(
                "position must be finite, got ({}, {}, {})",
                self.position.x, self.position.y, self.position.z
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_valid_feature() {
        let feature = Feature::new(FeatureKind::Hydrophobic, [0.0, 0.0, 0.0], 1.0);
        assert!(feature.enabled);
        assert!(feature.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let feature = Feature::new(FeatureKind::Aromatic, [1.0, 2.0, 3.0], radius);
            assert!(matches!(
                feature.validate(),
                Err(QueryError::InvalidFeature { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let feature = Feature::new(FeatureKind::Aromatic, [1.0, f64::NAN, 3.0], 1.0);
        assert!(feature.validate().is_err());

        let feature = Feature::new(FeatureKind::Aromatic, [f64::NEG_INFINITY, 0.0, 0.0], 1.0);
        assert!(feature.validate().is_err());
    }

    #[test]
    fn test_default_radii_are_valid() {
        for kind in FeatureKind::iter() {
            let feature = Feature::with_default_radius(kind, Position::default());
            assert!(feature.validate().is_ok(), "{kind} default radius invalid");
        }
    }

    #[test]
    fn test_kind_parses_case_insensitively() {
        assert_eq!(
            FeatureKind::from_str("hydrogendonor").unwrap(),
            FeatureKind::HydrogenDonor
        );
        assert_eq!(FeatureKind::ExclusionSphere.to_string(), "ExclusionSphere");
        assert!(FeatureKind::from_str("Metal").is_err());
    }

    #[test]
    fn test_enabled_defaults_to_true_when_missing() {
        let feature: Feature = serde_json::from_str(
            r#"{"kind":"PositiveIon","position":{"x":1.0,"y":2.0,"z":3.0},"radius":0.75}"#,
        )
        .unwrap();
        assert!(feature.enabled);
        assert_eq!(feature.position, Position::new(1.0, 2.0, 3.0));
    }
}
