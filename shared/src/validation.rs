//! Validation utilities for the orchard engine
//!
//! Coordinate range checks shared by the relocation validator and the zone
//! boundary estimator, plus sanity checks for engine settings.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::types::GeoPoint;

// ============================================================================
// Coordinate Validations
// ============================================================================

/// Inclusive latitude bounds in degrees
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Inclusive longitude bounds in degrees
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Which coordinate component failed validation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateField {
    Latitude,
    Longitude,
}

impl std::fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateField::Latitude => write!(f, "latitude"),
            CoordinateField::Longitude => write!(f, "longitude"),
        }
    }
}

/// A coordinate component outside its valid range (or not a finite number)
#[derive(Debug, Clone, Copy, Error, Serialize, PartialEq)]
#[error("{field} {value} is outside [{min}, {max}]")]
pub struct CoordinateRangeError {
    pub field: CoordinateField,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

fn check_range(
    field: CoordinateField,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), CoordinateRangeError> {
    // NaN fails both comparisons, so it is rejected here as well
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(CoordinateRangeError {
            field,
            value,
            min,
            max,
        })
    }
}

/// Validate latitude is within [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), CoordinateRangeError> {
    check_range(CoordinateField::Latitude, latitude, LATITUDE_RANGE)
}

/// Validate longitude is within [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), CoordinateRangeError> {
    check_range(CoordinateField::Longitude, longitude, LONGITUDE_RANGE)
}

/// Validate both components of a point, latitude first
pub fn validate_coordinates(point: &GeoPoint) -> Result<(), CoordinateRangeError> {
    validate_latitude(point.latitude)?;
    validate_longitude(point.longitude)
}

// ============================================================================
// Settings Validations
// ============================================================================

/// Validate a relocation threshold in meters
pub fn validate_relocation_threshold(meters: f64) -> Result<(), &'static str> {
    if !meters.is_finite() {
        return Err("Relocation threshold must be a finite number");
    }
    if meters < 0.0 {
        return Err("Relocation threshold cannot be negative");
    }
    Ok(())
}

/// Validate a calendar month number (1 = January)
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

/// Validate that a month/day pair exists in every year (Feb 29 is rejected)
pub fn validate_month_day(month: u32, day: u32) -> Result<(), &'static str> {
    validate_month(month)?;
    // 2023 is not a leap year
    if NaiveDate::from_ymd_opt(2023, month, day).is_none() {
        return Err("Day does not exist in the given month");
    }
    Ok(())
}
