//! Geographic math for tree positions and zone boundaries
//!
//! Distances use the haversine great-circle formula; areas use an
//! equirectangular projection around the boundary's mean latitude followed by
//! the shoelace formula. Both assume a spherical Earth of radius
//! [`EARTH_RADIUS_METERS`], which is accurate enough at field scale and drifts
//! for very large or near-polar polygons.

use rust_decimal::prelude::{FromPrimitive, RoundingStrategy};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::types::{GeoPoint, EARTH_RADIUS_METERS, SQUARE_METERS_PER_HECTARE};
use crate::validation::{
    validate_coordinates, validate_relocation_threshold, CoordinateRangeError,
};

// ============================================================================
// Distance
// ============================================================================

/// Great-circle distance between two points in meters.
///
/// The pair is put in a canonical order first so that swapping the arguments
/// yields a bit-identical result.
pub fn haversine_distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (p1, p2) = if (a.latitude, a.longitude) <= (b.latitude, b.longitude) {
        (a, b)
    } else {
        (b, a)
    };

    let phi1 = p1.latitude.to_radians();
    let phi2 = p2.latitude.to_radians();
    let d_phi = (p2.latitude - p1.latitude).to_radians();
    let d_lambda = (p2.longitude - p1.longitude).to_radians();

    let sin_phi = (d_phi / 2.0).sin();
    let sin_lambda = (d_lambda / 2.0).sin();
    let h = sin_phi * sin_phi + phi1.cos() * phi2.cos() * sin_lambda * sin_lambda;
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

// ============================================================================
// Relocation Validation
// ============================================================================

/// Why a proposed tree relocation was refused
#[derive(Debug, Clone, Copy, Error, Serialize, PartialEq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RelocationError {
    #[error("Proposed position is invalid: {0}")]
    OutOfRange(#[from] CoordinateRangeError),

    #[error(
        "Proposed position is {distance_meters:.2} m from the previous one (limit {max_distance_meters:.2} m)"
    )]
    TooFarFromPrevious {
        distance_meters: f64,
        max_distance_meters: f64,
    },

    #[error("Relocation threshold {max_distance_meters} is unusable: {message}")]
    InvalidThreshold {
        max_distance_meters: f64,
        message: &'static str,
    },
}

/// Outcome of an accepted relocation
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RelocationCheck {
    /// Distance moved, or `None` when the tree had no previous position
    pub distance_meters: Option<f64>,
}

/// Validate a manual coordinate update against the tree's previous position.
///
/// A tree that never had a position accepts any in-range proposal. A previous
/// position that is itself out of range cannot be compared against and is
/// treated the same way. A negative or non-finite threshold rejects every
/// proposal.
pub fn validate_relocation(
    previous: Option<&GeoPoint>,
    proposed: &GeoPoint,
    max_distance_meters: f64,
) -> Result<RelocationCheck, RelocationError> {
    validate_relocation_threshold(max_distance_meters).map_err(|message| {
        RelocationError::InvalidThreshold {
            max_distance_meters,
            message,
        }
    })?;
    validate_coordinates(proposed)?;

    let previous = match previous {
        Some(p) if p.is_valid() => p,
        Some(p) => {
            tracing::warn!(previous = %p, "stored position is invalid, skipping distance check");
            return Ok(RelocationCheck {
                distance_meters: None,
            });
        }
        None => {
            return Ok(RelocationCheck {
                distance_meters: None,
            })
        }
    };

    let distance_meters = haversine_distance_meters(previous, proposed);
    if distance_meters > max_distance_meters {
        tracing::warn!(
            %previous,
            %proposed,
            distance_meters,
            max_distance_meters,
            "relocation rejected"
        );
        return Err(RelocationError::TooFarFromPrevious {
            distance_meters,
            max_distance_meters,
        });
    }

    tracing::debug!(%previous, %proposed, distance_meters, "relocation accepted");
    Ok(RelocationCheck {
        distance_meters: Some(distance_meters),
    })
}

// ============================================================================
// Boundary Area
// ============================================================================

/// Result of estimating a boundary's area
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AreaEstimate {
    /// Fewer than 3 usable points; fall back to a stored area
    Insufficient,
    /// Estimated area (may be exactly zero for a degenerate polygon)
    Hectares { hectares: f64 },
}

impl AreaEstimate {
    /// Area in hectares, 0 when there was not enough data
    pub fn hectares(&self) -> f64 {
        match self {
            AreaEstimate::Insufficient => 0.0,
            AreaEstimate::Hectares { hectares } => *hectares,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, AreaEstimate::Insufficient)
    }

    /// Hectares rounded half-up to `decimal_places` for storage or billing
    pub fn to_decimal_hectares(&self, decimal_places: u32) -> Option<Decimal> {
        match self {
            AreaEstimate::Insufficient => None,
            AreaEstimate::Hectares { hectares } => Decimal::from_f64(*hectares).map(|d| {
                d.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
            }),
        }
    }
}

/// Estimate the area enclosed by a boundary polygon.
///
/// The polygon is implicitly closed. Boundaries with fewer than 3 points, or
/// with any non-finite coordinate, are reported as insufficient.
pub fn estimate_area(points: &[GeoPoint]) -> AreaEstimate {
    if points.len() < 3 {
        return AreaEstimate::Insufficient;
    }
    if points
        .iter()
        .any(|p| !p.latitude.is_finite() || !p.longitude.is_finite())
    {
        tracing::warn!(points = points.len(), "boundary has non-finite coordinates");
        return AreaEstimate::Insufficient;
    }

    let n = points.len() as f64;
    let mean_lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let mean_lon = points.iter().map(|p| p.longitude).sum::<f64>() / n;
    let cos_lat0 = mean_lat.to_radians().cos();

    // Shoelace is translation invariant; projecting relative to the centroid
    // keeps the cross products small.
    let projected: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            (
                (p.longitude - mean_lon).to_radians() * EARTH_RADIUS_METERS * cos_lat0,
                (p.latitude - mean_lat).to_radians() * EARTH_RADIUS_METERS,
            )
        })
        .collect();

    let twice_area: f64 = projected
        .iter()
        .zip(projected.iter().cycle().skip(1))
        .map(|((x1, y1), (x2, y2))| x1 * y2 - x2 * y1)
        .sum();

    let square_meters = twice_area.abs() / 2.0;
    AreaEstimate::Hectares {
        hectares: square_meters / SQUARE_METERS_PER_HECTARE,
    }
}

/// Area in hectares, 0 for boundaries with fewer than 3 points
pub fn estimate_area_hectares(points: &[GeoPoint]) -> f64 {
    estimate_area(points).hectares()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side_deg: f64) -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, side_deg),
            GeoPoint::new(side_deg, side_deg),
            GeoPoint::new(side_deg, 0.0),
        ]
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(10.0, 106.0);
        assert_eq!(haversine_distance_meters(&p, &p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(10.762622, 106.660172);
        let b = GeoPoint::new(21.028511, 105.804817);
        assert_eq!(
            haversine_distance_meters(&a, &b),
            haversine_distance_meters(&b, &a)
        );
    }

    #[test]
    fn test_distance_one_degree_of_latitude() {
        let d = haversine_distance_meters(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(1.0, 0.0));
        assert!((d - 111_194.93).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_distance_is_finite() {
        let d = haversine_distance_meters(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }

    #[test]
    fn test_small_move_accepted() {
        let previous = GeoPoint::new(10.0, 106.0);
        let proposed = GeoPoint::new(10.00003, 106.00003);
        let check = validate_relocation(Some(&previous), &proposed, 5.0).unwrap();
        let d = check.distance_meters.unwrap();
        assert!(d > 4.5 && d < 4.9, "got {}", d);
    }

    #[test]
    fn test_large_move_rejected_with_distance() {
        let previous = GeoPoint::new(10.0, 106.0);
        let proposed = GeoPoint::new(10.0001, 106.0001);
        match validate_relocation(Some(&previous), &proposed, 5.0) {
            Err(RelocationError::TooFarFromPrevious {
                distance_meters,
                max_distance_meters,
            }) => {
                assert!((distance_meters - 15.6).abs() < 0.3, "got {}", distance_meters);
                assert_eq!(max_distance_meters, 5.0);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_threshold_accepted() {
        let p = GeoPoint::new(10.0, 106.0);
        let q = GeoPoint::new(10.0001, 106.0001);
        let d = haversine_distance_meters(&p, &q);
        assert!(validate_relocation(Some(&p), &q, d).is_ok());
    }

    #[test]
    fn test_unusable_threshold_rejects_any_move() {
        let previous = GeoPoint::new(10.0, 106.0);
        let proposed = GeoPoint::new(-45.0, 10.0);
        for max in [f64::NAN, f64::INFINITY, -1.0] {
            let err = validate_relocation(Some(&previous), &proposed, max).unwrap_err();
            assert!(
                matches!(err, RelocationError::InvalidThreshold { .. }),
                "max {} gave {:?}",
                max,
                err
            );
        }
        assert!(matches!(
            validate_relocation(None, &proposed, f64::NAN),
            Err(RelocationError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_no_previous_position_accepts() {
        let check = validate_relocation(None, &GeoPoint::new(-45.0, 170.0), 5.0).unwrap();
        assert_eq!(check.distance_meters, None);
    }

    #[test]
    fn test_out_of_range_rejected_even_without_previous() {
        let err = validate_relocation(None, &GeoPoint::new(95.0, 106.0), 5.0).unwrap_err();
        assert!(matches!(err, RelocationError::OutOfRange(_)));
    }

    #[test]
    fn test_invalid_previous_position_skips_distance_check() {
        let previous = GeoPoint::new(f64::NAN, 106.0);
        let check = validate_relocation(Some(&previous), &GeoPoint::new(10.0, 106.0), 5.0);
        assert_eq!(check.unwrap().distance_meters, None);
    }

    #[test]
    fn test_square_area_near_equator() {
        let ha = estimate_area_hectares(&square(0.001));
        assert!((ha - 1.2364).abs() < 0.001, "got {}", ha);
    }

    #[test]
    fn test_fewer_than_three_points_insufficient() {
        assert_eq!(estimate_area(&[]), AreaEstimate::Insufficient);
        let two = [GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)];
        assert!(estimate_area(&two).is_insufficient());
        assert_eq!(estimate_area_hectares(&two), 0.0);
    }

    #[test]
    fn test_collinear_points_have_zero_area() {
        let line = [
            GeoPoint::new(10.0, 106.0),
            GeoPoint::new(10.001, 106.001),
            GeoPoint::new(10.002, 106.002),
        ];
        let estimate = estimate_area(&line);
        assert!(!estimate.is_insufficient());
        assert!(estimate.hectares().abs() < 1e-6);
    }

    #[test]
    fn test_reversed_boundary_same_area() {
        let mut points = square(0.002);
        let forward = estimate_area_hectares(&points);
        points.reverse();
        assert!((forward - estimate_area_hectares(&points)).abs() < 1e-9);
        assert!(forward > 0.0);
    }

    #[test]
    fn test_non_finite_boundary_insufficient() {
        let mut points = square(0.001);
        points[2].longitude = f64::INFINITY;
        assert!(estimate_area(&points).is_insufficient());
    }

    #[test]
    fn test_decimal_hectares_rounding() {
        let estimate = estimate_area(&square(0.001));
        assert_eq!(
            estimate.to_decimal_hectares(2),
            Some(Decimal::new(124, 2))
        );
        assert_eq!(AreaEstimate::Insufficient.to_decimal_hectares(2), None);
    }
}
