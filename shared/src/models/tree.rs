//! Tree models

use serde::{Deserialize, Serialize};

use super::season::PhaseResult;
use crate::geo::{validate_relocation, RelocationCheck, RelocationError};
use crate::types::GeoPoint;

/// A fruit tree tracked on a farm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub id: String,
    pub zone_id: Option<String>,
    /// Last confirmed position
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Current-season tally entered by hand
    #[serde(default)]
    pub manual_fruit_count: u32,
}

impl Tree {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            zone_id: None,
            latitude: None,
            longitude: None,
            manual_fruit_count: 0,
        }
    }

    /// Stored position, if both components are present
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// Move the tree to `proposed` if the move passes validation.
    ///
    /// On rejection the stored coordinates are left untouched.
    pub fn relocate(
        &mut self,
        proposed: GeoPoint,
        max_distance_meters: f64,
    ) -> Result<RelocationCheck, RelocationError> {
        let check = validate_relocation(self.position().as_ref(), &proposed, max_distance_meters)?;
        self.latitude = Some(proposed.latitude);
        self.longitude = Some(proposed.longitude);
        Ok(check)
    }

    /// Tally to present for the classified phase
    pub fn current_count(&self, phase: &PhaseResult) -> u32 {
        if phase.should_reset_count {
            0
        } else {
            self.manual_fruit_count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::season::classify;
    use chrono::{Duration, TimeZone, Utc};

    fn placed_tree() -> Tree {
        Tree {
            latitude: Some(10.0),
            longitude: Some(106.0),
            manual_fruit_count: 37,
            ..Tree::new("tree-1")
        }
    }

    #[test]
    fn test_position_requires_both_components() {
        let mut tree = Tree::new("t");
        assert_eq!(tree.position(), None);
        tree.latitude = Some(10.0);
        assert_eq!(tree.position(), None);
        tree.longitude = Some(106.0);
        assert_eq!(tree.position(), Some(GeoPoint::new(10.0, 106.0)));
    }

    #[test]
    fn test_relocate_small_move_updates_position() {
        let mut tree = placed_tree();
        tree.relocate(GeoPoint::new(10.00003, 106.00003), 5.0).unwrap();
        assert_eq!(tree.position(), Some(GeoPoint::new(10.00003, 106.00003)));
    }

    #[test]
    fn test_rejected_relocation_keeps_position() {
        let mut tree = placed_tree();
        let err = tree
            .relocate(GeoPoint::new(10.0001, 106.0001), 5.0)
            .unwrap_err();
        assert!(matches!(err, RelocationError::TooFarFromPrevious { .. }));
        assert_eq!(tree.position(), Some(GeoPoint::new(10.0, 106.0)));
    }

    #[test]
    fn test_out_of_range_relocation_keeps_position() {
        let mut tree = placed_tree();
        assert!(tree.relocate(GeoPoint::new(10.0, 181.0), 5.0).is_err());
        assert_eq!(tree.position(), Some(GeoPoint::new(10.0, 106.0)));
    }

    #[test]
    fn test_nan_threshold_keeps_position() {
        let mut tree = placed_tree();
        let err = tree.relocate(GeoPoint::new(-45.0, 10.0), f64::NAN).unwrap_err();
        assert!(matches!(err, RelocationError::InvalidThreshold { .. }));
        assert_eq!(tree.position(), Some(GeoPoint::new(10.0, 106.0)));
    }

    #[test]
    fn test_first_placement_accepts_anywhere() {
        let mut tree = Tree::new("fresh");
        let check = tree.relocate(GeoPoint::new(-33.9, 151.2), 5.0).unwrap();
        assert_eq!(check.distance_meters, None);
        assert_eq!(tree.latitude, Some(-33.9));
    }

    #[test]
    fn test_current_count_follows_reset_flag() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let tree = placed_tree();

        let post_harvest = classify(now, Some(now - Duration::days(40)));
        assert_eq!(tree.current_count(&post_harvest), 0);

        let growing = classify(now, Some(now - Duration::days(150)));
        assert_eq!(tree.current_count(&growing), 37);
    }

    #[test]
    fn test_tree_deserializes_with_missing_fields() {
        let tree: Tree = serde_json::from_str(r#"{"id": "a1", "latitude": 10.5}"#).unwrap();
        assert_eq!(tree.manual_fruit_count, 0);
        assert_eq!(tree.longitude, None);
        assert_eq!(tree.zone_id, None);
    }
}
