//! Zone models

use serde::{Deserialize, Serialize};

use crate::geo::{estimate_area, AreaEstimate};
use crate::types::GeoPoint;

/// A zone of a farm, outlined by a boundary polygon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub farm_id: Option<String>,
    pub name: String,
    /// Ordered vertices; the last point connects back to the first
    #[serde(default)]
    pub boundary: Vec<GeoPoint>,
    /// Previously stored area in hectares
    pub area: Option<f64>,
}

impl Zone {
    pub fn area_estimate(&self) -> AreaEstimate {
        estimate_area(&self.boundary)
    }

    /// Area from the boundary, or the stored area when the boundary cannot
    /// be measured
    pub fn effective_area_hectares(&self) -> Option<f64> {
        effective_area_hectares(&self.boundary, self.area)
    }
}

/// Boundary estimate with fallback to a stored value
pub fn effective_area_hectares(boundary: &[GeoPoint], stored_area: Option<f64>) -> Option<f64> {
    match estimate_area(boundary) {
        AreaEstimate::Hectares { hectares } => Some(hectares),
        AreaEstimate::Insufficient => stored_area,
    }
}
