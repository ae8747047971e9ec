//! WebAssembly module for the Orchard Season & Spatial Integrity Engine
//!
//! Provides client-side computation for:
//! - Season phase classification
//! - Legacy yield-record resolution
//! - Tree relocation checks
//! - Zone boundary area estimates

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::geo::*;
pub use shared::models::*;
pub use shared::settings::*;
pub use shared::types::*;

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}

fn instant_from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Classify a season phase from epoch milliseconds; returns PhaseResult JSON
#[wasm_bindgen]
pub fn classify_season_phase(now_ms: f64, end_date_ms: Option<f64>) -> Result<String, JsValue> {
    let now = instant_from_millis(now_ms)
        .ok_or_else(|| JsValue::from_str("Invalid current timestamp"))?;
    let end_date = match end_date_ms {
        Some(ms) => Some(
            instant_from_millis(ms).ok_or_else(|| JsValue::from_str("Invalid end timestamp"))?,
        ),
        None => None,
    };
    to_json(&classify(now, end_date))
}

/// Harvest calendar from `{cutoff_month, season_end_month, season_end_day}`
/// JSON; omitted fields keep their defaults
fn parse_calendar(calendar_json: Option<String>) -> Result<HarvestCalendar, JsValue> {
    let Some(json) = calendar_json else {
        return Ok(HarvestCalendar::default());
    };
    let calendar: HarvestCalendar = serde_json::from_str(&json)
        .map_err(|e| JsValue::from_str(&format!("Invalid harvest calendar JSON: {}", e)))?;
    calendar
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(calendar)
}

/// Classify a tree against its farm's latest season record (JSON, may be
/// absent), using the regional harvest calendar when one is given
#[wasm_bindgen]
pub fn classify_tree_season(
    now_ms: f64,
    tree_id: &str,
    record_json: Option<String>,
    calendar_json: Option<String>,
) -> Result<String, JsValue> {
    let now = instant_from_millis(now_ms)
        .ok_or_else(|| JsValue::from_str("Invalid current timestamp"))?;
    let record: Option<SeasonRecord> = match record_json {
        Some(json) => Some(
            serde_json::from_str(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid season record JSON: {}", e)))?,
        ),
        None => None,
    };
    let calendar = parse_calendar(calendar_json)?;
    let result = classify_tree(now, tree_id, record.as_ref(), &calendar);
    to_json(&result)
}

/// Same as [`classify_tree_season`] using the browser clock
#[wasm_bindgen]
pub fn classify_tree_season_now(
    tree_id: &str,
    record_json: Option<String>,
    calendar_json: Option<String>,
) -> Result<String, JsValue> {
    classify_tree_season(js_sys::Date::now(), tree_id, record_json, calendar_json)
}

/// Resolve a tree's prior-season count; malformed JSON resolves to 0
#[wasm_bindgen]
pub fn resolve_breakdown_count(breakdown_json: &str, tree_id: &str) -> u32 {
    match serde_json::from_str::<Breakdown>(breakdown_json) {
        Ok(breakdown) => resolve_count(&breakdown, tree_id),
        Err(_) => 0,
    }
}

/// Great-circle distance in meters
#[wasm_bindgen]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance_meters(&GeoPoint::new(lat1, lon1), &GeoPoint::new(lat2, lon2))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelocationOutcome {
    accepted: bool,
    distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<RelocationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Check a manual relocation; returns `{accepted, distanceMeters, rejection?, message?}` JSON
#[wasm_bindgen]
pub fn validate_tree_relocation(
    previous_lat: Option<f64>,
    previous_lon: Option<f64>,
    lat: f64,
    lon: f64,
    max_distance_meters: Option<f64>,
) -> Result<String, JsValue> {
    let previous = match (previous_lat, previous_lon) {
        (Some(p_lat), Some(p_lon)) => Some(GeoPoint::new(p_lat, p_lon)),
        _ => None,
    };
    let max = max_distance_meters.unwrap_or(DEFAULT_MAX_RELOCATION_METERS);

    let outcome = match validate_relocation(previous.as_ref(), &GeoPoint::new(lat, lon), max) {
        Ok(check) => RelocationOutcome {
            accepted: true,
            distance_meters: check.distance_meters,
            rejection: None,
            message: None,
        },
        Err(rejection) => {
            let message = rejection.to_string();
            warn(&message);
            RelocationOutcome {
                accepted: false,
                distance_meters: match rejection {
                    RelocationError::TooFarFromPrevious {
                        distance_meters, ..
                    } => Some(distance_meters),
                    RelocationError::OutOfRange(_)
                    | RelocationError::InvalidThreshold { .. } => None,
                },
                rejection: Some(rejection),
                message: Some(message),
            }
        }
    };
    to_json(&outcome)
}

/// Boundary area in hectares from `[{latitude, longitude}, ...]` JSON; 0 when
/// fewer than 3 points
#[wasm_bindgen]
pub fn estimate_boundary_area(points_json: &str) -> Result<f64, JsValue> {
    let points: Vec<GeoPoint> = serde_json::from_str(points_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid boundary JSON: {}", e)))?;
    Ok(estimate_area_hectares(&points))
}

/// Boundary area with fallback to the stored area; `undefined` when neither exists
#[wasm_bindgen]
pub fn estimate_zone_area(
    points_json: &str,
    stored_area_hectares: Option<f64>,
) -> Result<Option<f64>, JsValue> {
    let points: Vec<GeoPoint> = serde_json::from_str(points_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid boundary JSON: {}", e)))?;
    Ok(effective_area_hectares(&points, stored_area_hectares))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_invalid_boundary_json_is_an_error() {
        assert!(estimate_boundary_area("{").is_err());
    }

    #[wasm_bindgen_test]
    fn test_classify_with_browser_clock() {
        assert!(classify_tree_season_now("t1", None, None).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_invalid_calendar_is_an_error() {
        let bad = r#"{"season_end_month": 9, "season_end_day": 31}"#;
        assert!(classify_tree_season_now("t1", None, Some(bad.to_string())).is_err());
    }
}
