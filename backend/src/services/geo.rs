//! Geo service: relocation checks and zone area estimation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    estimate_area, validate_relocation, validate_relocation_threshold, AreaEstimate, GeoPoint,
};

use crate::error::{AppError, AppResult};

/// Decimal places kept for stored area figures
const AREA_DECIMAL_PLACES: u32 = 4;

/// Geo service backed by the configured relocation threshold
#[derive(Clone)]
pub struct GeoService {
    max_relocation_meters: f64,
}

/// Input for validating a tree relocation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationInput {
    pub previous: Option<GeoPoint>,
    pub proposed: GeoPoint,
    /// Overrides the configured threshold for this request
    pub max_distance_meters: Option<f64>,
}

/// Accepted relocation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationAccepted {
    pub accepted: bool,
    pub distance_meters: Option<f64>,
    pub max_distance_meters: f64,
}

/// Input for estimating a zone's area
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAreaInput {
    #[serde(default)]
    pub boundary: Vec<GeoPoint>,
    /// Previously stored area, used when the boundary is insufficient
    pub stored_area_hectares: Option<f64>,
}

/// Zone area estimate
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneArea {
    #[serde(flatten)]
    pub estimate: AreaEstimate,
    pub area_hectares: f64,
    pub rounded_area_hectares: Option<Decimal>,
    pub effective_area_hectares: Option<f64>,
}

impl GeoService {
    /// Create a new GeoService instance
    pub fn new(max_relocation_meters: f64) -> Self {
        Self {
            max_relocation_meters,
        }
    }

    /// Validate a proposed relocation; rejections surface as errors
    pub fn check_relocation(&self, input: &RelocationInput) -> AppResult<RelocationAccepted> {
        let max_distance_meters = match input.max_distance_meters {
            Some(meters) => {
                validate_relocation_threshold(meters).map_err(|message| {
                    AppError::validation(
                        "maxDistanceMeters",
                        message,
                        "Ngưỡng khoảng cách không hợp lệ",
                    )
                })?;
                meters
            }
            None => self.max_relocation_meters,
        };

        let check = validate_relocation(
            input.previous.as_ref(),
            &input.proposed,
            max_distance_meters,
        )?;

        Ok(RelocationAccepted {
            accepted: true,
            distance_meters: check.distance_meters,
            max_distance_meters,
        })
    }

    /// Estimate a zone's area with fallback to the stored figure
    pub fn zone_area(&self, input: &ZoneAreaInput) -> ZoneArea {
        let estimate = estimate_area(&input.boundary);
        let effective_area_hectares = match estimate {
            AreaEstimate::Hectares { hectares } => Some(hectares),
            AreaEstimate::Insufficient => input.stored_area_hectares,
        };

        if estimate.is_insufficient() {
            tracing::debug!(
                points = input.boundary.len(),
                fallback = ?input.stored_area_hectares,
                "Boundary insufficient, using stored area"
            );
        }

        ZoneArea {
            estimate,
            area_hectares: estimate.hectares(),
            rounded_area_hectares: estimate.to_decimal_hectares(AREA_DECIMAL_PLACES),
            effective_area_hectares,
        }
    }
}
