//! Ordered collection of the features in a query.

use tracing::debug;

use super::model::{Feature, Position};
use crate::error::{QueryError, Result};

/// The ordered features of a query.
///
/// Insertion order is preserved: it drives display order and may drive match
/// priority on some vendors. Geometric duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSet {
    features: Vec<Feature>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a feature and returns its index.
    pub fn add(&mut self, feature: Feature) -> Result<usize> {
        feature.validate()?;
        self.features.push(feature);
        let index = self.features.len() - 1;
        debug!(index, kind = %self.features[index].kind, "Feature added");
        Ok(index)
    }

    /// Removes the feature at `index`, keeping the order of the others.
    pub fn remove(&mut self, index: usize) -> Result<Feature> {
        self.check_index(index)?;
        let removed = self.features.remove(index);
        debug!(index, kind = %removed.kind, "Feature removed");
        Ok(removed)
    }

    /// Includes or excludes a feature from the active query without removing it.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.check_index(index)?;
        self.features[index].enabled = enabled;
        debug!(index, enabled, "Feature toggled");
        Ok(())
    }

    /// Replaces the feature at `index` with an edited version.
    pub fn update(&mut self, index: usize, feature: Feature) -> Result<()> {
        self.check_index(index)?;
        feature.validate()?;
        self.features[index] = feature;
        debug!(index, "Feature updated");
        Ok(())
    }

    /// Moves the feature at `index`.
    pub fn set_position(&mut self, index: usize, position: Position) -> Result<()> {
        self.check_index(index)?;
        let mut moved = self.features[index].clone();
        moved.position = position;
        moved.validate()?;
        self.features[index] = moved;
        debug!(index, x = position.x, y = position.y, z = position.z, "Feature moved");
        Ok(())
    }

    /// Replaces every feature at once. Nothing changes if any feature is invalid.
    pub fn replace_all(&mut self, features: Vec<Feature>) -> Result<()> {
        for (index, feature) in features.iter().enumerate() {
            feature.validate().map_err(|e| match e {
                QueryError::InvalidFeature { reason } => QueryError::InvalidFeature {
                    reason: format!("feature {}: {}", index, reason),
                },
                other => other,
            })?;
        }
        debug!(count = features.len(), "Feature set replaced");
        self.features = features;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Features that participate in the active query.
    pub fn enabled(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| f.enabled)
    }

    /// An owned copy of the features, unaffected by later edits to this set.
    pub fn to_list(&self) -> Vec<Feature> {
        self.features.clone()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.features.len() {
            Ok(())
        } else {
            Err(QueryError::IndexOutOfRange {
                index,
                len: self.features.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureKind;

    fn sample_set() -> FeatureSet {
        let mut set = FeatureSet::new();
        set.add(Feature::new(FeatureKind::Hydrophobic, [0.0, 0.0, 0.0], 1.0))
            .unwrap();
        set.add(Feature::new(FeatureKind::Aromatic, [1.0, 1.0, 1.0], 1.5))
            .unwrap();
        set.add(Feature::new(FeatureKind::HydrogenDonor, [2.0, 0.0, -1.0], 0.5))
            .unwrap();
        set
    }

    #[test]
    fn test_add_returns_index_and_appends() {
        let mut set = sample_set();
        let feature = Feature::new(FeatureKind::NegativeIon, [4.0, 4.0, 4.0], 0.75);
        let index = set.add(feature.clone()).unwrap();

        assert_eq!(index, 3);
        assert_eq!(set.to_list().last(), Some(&feature));
    }

    #[test]
    fn test_add_rejects_invalid_feature() {
        let mut set = sample_set();
        let err = set
            .add(Feature::new(FeatureKind::Aromatic, [0.0, 0.0, 0.0], 0.0))
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidFeature { .. }));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_duplicate_geometry_is_allowed() {
        let mut set = FeatureSet::new();
        let feature = Feature::new(FeatureKind::Hydrophobic, [0.0, 0.0, 0.0], 1.0);
        set.add(feature.clone()).unwrap();
        set.add(feature).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        for i in 0..3 {
            let mut set = sample_set();
            let before = set.to_list();
            set.remove(i).unwrap();

            let mut expected = before.clone();
            expected.remove(i);
            assert_eq!(set.to_list(), expected);
        }
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut set = sample_set();
        assert_eq!(
            set.remove(3).unwrap_err(),
            QueryError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_set_enabled() {
        let mut set = sample_set();
        set.set_enabled(1, false).unwrap();

        assert!(!set.get(1).unwrap().enabled);
        assert_eq!(set.enabled().count(), 2);
        assert!(set.set_enabled(7, true).is_err());
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut set = sample_set();
        let edited = Feature::new(FeatureKind::PositiveIon, [7.0, 0.0, 0.0], 0.75);
        set.update(1, edited.clone()).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.get(1), Some(&edited));
        assert_eq!(set.get(2).unwrap().kind, FeatureKind::HydrogenDonor);

        let before = set.to_list();
        assert!(set
            .update(0, Feature::new(FeatureKind::Aromatic, [0.0, 0.0, 0.0], 0.0))
            .is_err());
        assert!(set.update(3, edited).is_err());
        assert_eq!(set.to_list(), before);
    }

    #[test]
    fn test_snapshot_is_detached_from_set() {
        let mut set = sample_set();
        let snapshot = set.to_list();

        set.set_position(0, Position::new(9.0, 9.0, 9.0)).unwrap();
        set.remove(2).unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].position, Position::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_position_rejects_non_finite() {
        let mut set = sample_set();
        assert!(set
            .set_position(0, Position::new(f64::NAN, 0.0, 0.0))
            .is_err());
        assert_eq!(set.get(0).unwrap().position, Position::default());
    }

    #[test]
    fn test_replace_all_is_all_or_nothing() {
        let mut set = sample_set();
        let before = set.to_list();

        let err = set
            .replace_all(vec![
                Feature::new(FeatureKind::Aromatic, [0.0, 0.0, 0.0], 1.0),
                Feature::new(FeatureKind::Aromatic, [0.0, 0.0, 0.0], -2.0),
            ])
            .unwrap_err();
        assert!(err.to_string().contains("feature 1"));
        assert_eq!(set.to_list(), before);

        set.replace_all(vec![Feature::new(
            FeatureKind::ExclusionSphere,
            [3.0, 3.0, 3.0],
            2.0,
        )])
        .unwrap();
        assert_eq!(set.len(), 1);
    }
}
