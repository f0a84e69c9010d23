//! Hit-reduction and hit-screening filter model.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::error::{QueryError, Result};

/// Raw hit-limit value that means "no limit".
pub const NO_HIT_LIMIT: u32 = 0;

/// The individually settable filter fields.
///
/// Names match the keys of the web query form so documents and
/// command lines can refer to fields the same way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum FilterField {
    /// Maximum orientations returned for each conformation.
    #[serde(rename = "max-orient")]
    #[strum(serialize = "max-orient")]
    MaxHitsPerConformation,
    /// Maximum conformations returned for each compound.
    #[serde(rename = "reduceConfs")]
    #[strum(serialize = "reduceConfs")]
    MaxHitsPerMolecule,
    /// Maximum number of hits returned.
    #[serde(rename = "max-hits")]
    #[strum(serialize = "max-hits")]
    MaxTotalHits,
    #[serde(rename = "minMolWeight")]
    #[strum(serialize = "minMolWeight")]
    MinMolWeight,
    #[serde(rename = "maxMolWeight")]
    #[strum(serialize = "maxMolWeight")]
    MaxMolWeight,
    #[serde(rename = "minrotbonds")]
    #[strum(serialize = "minrotbonds")]
    MinRotatableBonds,
    #[serde(rename = "maxrotbonds")]
    #[strum(serialize = "maxrotbonds")]
    MaxRotatableBonds,
}

impl FilterField {
    /// Whether the field only accepts whole numbers.
    pub fn is_integer(self) -> bool {
        !matches!(self, Self::MinMolWeight | Self::MaxMolWeight)
    }

    /// Whether the field is one of the hit-reduction limits.
    pub fn is_hit_limit(self) -> bool {
        matches!(
            self,
            Self::MaxHitsPerConformation | Self::MaxHitsPerMolecule | Self::MaxTotalHits
        )
    }

    /// Human readable label, as shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::MaxHitsPerConformation => "Max Hits per Conf",
            Self::MaxHitsPerMolecule => "Max Hits per Mol",
            Self::MaxTotalHits => "Max Total Hits",
            Self::MinMolWeight => "Min Molecular Weight",
            Self::MaxMolWeight => "Max Molecular Weight",
            Self::MinRotatableBonds => "Min Rotatable Bonds",
            Self::MaxRotatableBonds => "Max Rotatable Bonds",
        }
    }
}

/// Interpretation of a raw hit-limit value.
///
/// A stored value of [`NO_HIT_LIMIT`] (zero) means the backend applies no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitLimit {
    Unlimited,
    AtMost(u32),
}

impl HitLimit {
    pub fn from_raw(raw: u32) -> Self {
        if raw == NO_HIT_LIMIT {
            Self::Unlimited
        } else {
            Self::AtMost(raw)
        }
    }
}

/// A violated filter invariant, reported by [`FilterConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterViolation {
    /// `minMolWeight` is greater than `maxMolWeight`.
    MolWeightRange { min: f64, max: f64 },
    /// `minrotbonds` is greater than `maxrotbonds`.
    RotatableBondsRange { min: u32, max: u32 },
}

impl fmt::Display for FilterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MolWeightRange { min, max } => write!(
                f,
                "minimum molecular weight {} exceeds maximum {}",
                min, max
            ),
            Self::RotatableBondsRange { min, max } => write!(
                f,
                "minimum rotatable bonds {} exceeds maximum {}",
                min, max
            ),
        }
    }
}

/// Hit-reduction limits and hit-screening ranges.
///
/// Hit limits use [`NO_HIT_LIMIT`] for "unlimited". Range bounds are optional;
/// `None` leaves that side of the range open. Range ordering is not enforced
/// while editing: [`FilterConfig::validate`] reports it at search or save time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    max_hits_per_conformation: u32,
    max_hits_per_molecule: u32,
    max_total_hits: u32,
    min_mol_weight: Option<f64>,
    max_mol_weight: Option<f64>,
    min_rotatable_bonds: Option<u32>,
    max_rotatable_bonds: Option<u32>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from stored hit limits.
    ///
    /// Like deserialization, the `with_*` builders do not run the per-field
    /// checks of [`FilterConfig::set`]; use [`FilterConfig::check_values`].
    pub fn with_hit_limits(per_conformation: u32, per_molecule: u32, total: u32) -> Self {
        Self {
            max_hits_per_conformation: per_conformation,
            max_hits_per_molecule: per_molecule,
            max_total_hits: total,
            ..Self::default()
        }
    }

    pub fn with_mol_weight(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_mol_weight = min;
        self.max_mol_weight = max;
        self
    }

    pub fn with_rotatable_bonds(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_rotatable_bonds = min;
        self.max_rotatable_bonds = max;
        self
    }

    /// Sets a field after checking the value against the field's type and range.
    ///
    /// Rejected values leave the previous value in place; nothing is clamped.
    pub fn set(&mut self, field: FilterField, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(QueryError::invalid_filter_value(
                field,
                value,
                "value must be a finite number",
            ));
        }
        if value < 0.0 {
            return Err(QueryError::invalid_filter_value(
                field,
                value,
                "value must not be negative",
            ));
        }

        match field {
            FilterField::MaxHitsPerConformation => {
                self.max_hits_per_conformation = whole_count(field, value)?
            }
            FilterField::MaxHitsPerMolecule => {
                self.max_hits_per_molecule = whole_count(field, value)?
            }
            FilterField::MaxTotalHits => self.max_total_hits = whole_count(field, value)?,
            FilterField::MinMolWeight => self.min_mol_weight = Some(value),
            FilterField::MaxMolWeight => self.max_mol_weight = Some(value),
            FilterField::MinRotatableBonds => {
                self.min_rotatable_bonds = Some(whole_count(field, value)?)
            }
            FilterField::MaxRotatableBonds => {
                self.max_rotatable_bonds = Some(whole_count(field, value)?)
            }
        }

        debug!(%field, value, "Filter updated");
        Ok(())
    }

    /// Resets a field: hit limits become unlimited, range bounds become open.
    pub fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::MaxHitsPerConformation => self.max_hits_per_conformation = NO_HIT_LIMIT,
            FilterField::MaxHitsPerMolecule => self.max_hits_per_molecule = NO_HIT_LIMIT,
            FilterField::MaxTotalHits => self.max_total_hits = NO_HIT_LIMIT,
            FilterField::MinMolWeight => self.min_mol_weight = None,
            FilterField::MaxMolWeight => self.max_mol_weight = None,
            FilterField::MinRotatableBonds => self.min_rotatable_bonds = None,
            FilterField::MaxRotatableBonds => self.max_rotatable_bonds = None,
        }
        debug!(%field, "Filter cleared");
    }

    /// Returns the current value of a field, `None` for an open range bound.
    pub fn get(&self, field: FilterField) -> Option<f64> {
        match field {
            FilterField::MaxHitsPerConformation => Some(f64::from(self.max_hits_per_conformation)),
            FilterField::MaxHitsPerMolecule => Some(f64::from(self.max_hits_per_molecule)),
            FilterField::MaxTotalHits => Some(f64::from(self.max_total_hits)),
            FilterField::MinMolWeight => self.min_mol_weight,
            FilterField::MaxMolWeight => self.max_mol_weight,
            FilterField::MinRotatableBonds => self.min_rotatable_bonds.map(f64::from),
            FilterField::MaxRotatableBonds => self.max_rotatable_bonds.map(f64::from),
        }
    }

    /// Interprets a hit-limit field. Returns `None` for the range fields.
    pub fn hit_limit(&self, field: FilterField) -> Option<HitLimit> {
        if !field.is_hit_limit() {
            return None;
        }
        self.get(field).map(|raw| HitLimit::from_raw(raw as u32))
    }

    pub fn max_hits_per_conformation(&self) -> u32 {
        self.max_hits_per_conformation
    }

    pub fn max_hits_per_molecule(&self) -> u32 {
        self.max_hits_per_molecule
    }

    pub fn max_total_hits(&self) -> u32 {
        self.max_total_hits
    }

    pub fn mol_weight_range(&self) -> (Option<f64>, Option<f64>) {
        (self.min_mol_weight, self.max_mol_weight)
    }

    pub fn rotatable_bonds_range(&self) -> (Option<u32>, Option<u32>) {
        (self.min_rotatable_bonds, self.max_rotatable_bonds)
    }

    /// Checks the range-ordering invariants. An empty list means valid.
    pub fn validate(&self) -> Vec<FilterViolation> {
        let mut violations = Vec::new();

        if let (Some(min), Some(max)) = (self.min_mol_weight, self.max_mol_weight) {
            if min > max {
                violations.push(FilterViolation::MolWeightRange { min, max });
            }
        }

        if let (Some(min), Some(max)) = (self.min_rotatable_bonds, self.max_rotatable_bonds) {
            if min > max {
                violations.push(FilterViolation::RotatableBondsRange { min, max });
            }
        }

        violations
    }

    /// Re-checks stored weights against the per-field input rules.
    ///
    /// Values set through [`FilterConfig::set`] always pass; this guards
    /// configurations that were deserialized from an external document.
    pub fn check_values(&self) -> Result<()> {
        for (field, weight) in [
            (FilterField::MinMolWeight, self.min_mol_weight),
            (FilterField::MaxMolWeight, self.max_mol_weight),
        ] {
            if let Some(weight) = weight {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(QueryError::invalid_filter_value(
                        field,
                        weight,
                        "molecular weight must be a finite, non-negative number",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Converts a finite, non-negative input into a count for an integer field.
fn whole_count(field: FilterField, value: f64) -> Result<u32> {
    if value.fract() != 0.0 {
        return Err(QueryError::invalid_filter_value(
            field,
            value,
            "value must be a whole number",
        ));
    }
    if value > f64::from(u32::MAX) {
        return Err(QueryError::invalid_filter_value(
            field,
            value,
            format!("value must not exceed {}", u32::MAX),
        ));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_is_unlimited_and_valid() {
        let config = FilterConfig::default();
        assert_eq!(
            config.hit_limit(FilterField::MaxTotalHits),
            Some(HitLimit::Unlimited)
        );
        assert_eq!(config.get(FilterField::MinMolWeight), None);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_set_hit_limits() {
        let mut config = FilterConfig::new();
        config.set(FilterField::MaxTotalHits, 50.0).unwrap();
        config.set(FilterField::MaxHitsPerMolecule, 3.0).unwrap();

        assert_eq!(config.max_total_hits(), 50);
        assert_eq!(config.max_hits_per_molecule(), 3);
        assert_eq!(
            config.hit_limit(FilterField::MaxTotalHits),
            Some(HitLimit::AtMost(50))
        );
        assert_eq!(config.hit_limit(FilterField::MinMolWeight), None);
    }

    #[test]
    fn test_cleared_hit_limit_is_unlimited() {
        let mut config = FilterConfig::new();
        for field in FilterField::iter().filter(|f| f.is_hit_limit()) {
            config.set(field, 5.0).unwrap();
            assert_eq!(config.hit_limit(field), Some(HitLimit::AtMost(5)));
            config.clear(field);
            assert_eq!(config.hit_limit(field), Some(HitLimit::Unlimited));
        }
        assert_eq!(
            FilterField::iter().filter(|f| f.is_hit_limit()).count(),
            3
        );
        assert_eq!(config.hit_limit(FilterField::MaxRotatableBonds), None);
    }

    #[test]
    fn test_rejects_invalid_values_without_changing_state() {
        let mut config = FilterConfig::new();
        config.set(FilterField::MaxTotalHits, 10.0).unwrap();
        config.set(FilterField::MinMolWeight, 150.0).unwrap();

        for (field, value) in [
            (FilterField::MaxTotalHits, -1.0),
            (FilterField::MaxTotalHits, 2.5),
            (FilterField::MaxTotalHits, f64::NAN),
            (FilterField::MaxTotalHits, 1e12),
            (FilterField::MinMolWeight, f64::INFINITY),
            (FilterField::MinMolWeight, -0.5),
        ] {
            let err = config.set(field, value).unwrap_err();
            assert!(
                matches!(err, QueryError::InvalidFilterValue { field: f, .. } if f == field),
                "unexpected error for {field}: {err:?}"
            );
        }

        assert_eq!(config.max_total_hits(), 10);
        assert_eq!(config.get(FilterField::MinMolWeight), Some(150.0));
    }

    #[test]
    fn test_weights_accept_fractions() {
        let mut config = FilterConfig::new();
        config.set(FilterField::MaxMolWeight, 499.5).unwrap();
        assert_eq!(config.mol_weight_range(), (None, Some(499.5)));
    }

    #[test]
    fn test_validate_reports_weight_order_and_clears_after_fix() {
        let mut config = FilterConfig::new();
        config.set(FilterField::MinMolWeight, 300.0).unwrap();
        config.set(FilterField::MaxMolWeight, 200.0).unwrap();

        let violations = config.validate();
        assert_eq!(
            violations,
            vec![FilterViolation::MolWeightRange {
                min: 300.0,
                max: 200.0
            }]
        );

        config.set(FilterField::MaxMolWeight, 400.0).unwrap();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_rotatable_bond_order() {
        let mut config = FilterConfig::new();
        config.set(FilterField::MinRotatableBonds, 8.0).unwrap();
        config.set(FilterField::MaxRotatableBonds, 2.0).unwrap();
        config.set(FilterField::MinMolWeight, 300.0).unwrap();
        config.set(FilterField::MaxMolWeight, 100.0).unwrap();

        let violations = config.validate();
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&FilterViolation::RotatableBondsRange { min: 8, max: 2 }));

        config.clear(FilterField::MaxRotatableBonds);
        config.clear(FilterField::MinMolWeight);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_equal_bounds_are_valid() {
        let mut config = FilterConfig::new();
        config.set(FilterField::MinRotatableBonds, 4.0).unwrap();
        config.set(FilterField::MaxRotatableBonds, 4.0).unwrap();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!(
            FilterField::from_str("max-hits").unwrap(),
            FilterField::MaxTotalHits
        );
        assert_eq!(
            FilterField::from_str("MINMOLWEIGHT").unwrap(),
            FilterField::MinMolWeight
        );
        assert_eq!(FilterField::MaxHitsPerMolecule.to_string(), "reduceConfs");
        assert!(FilterField::from_str("logp").is_err());
    }

    #[test]
    fn test_check_values_rejects_bad_deserialized_weight() {
        let config: FilterConfig =
            serde_json::from_str(r#"{"maxHitsPerConformation":0,"maxHitsPerMolecule":0,"maxTotalHits":0,"minMolWeight":-5.0,"maxMolWeight":null,"minRotatableBonds":null,"maxRotatableBonds":null}"#)
                .unwrap();
        assert!(config.check_values().is_err());
        assert!(FilterConfig::default().check_values().is_ok());
    }
}
