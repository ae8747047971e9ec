//! Per-tree yield breakdown normalization
//!
//! Season records were written by several generations of clients, so a tree's
//! entry in a breakdown map may be a bare number, a numeric string, or an
//! object holding the count under one of several key names.

use std::collections::BTreeMap;

use serde_json::Value;

/// Per-tree yield entries of a season record, keyed by tree id
pub type Breakdown = BTreeMap<String, Value>;

/// Object keys that may hold a tree's count, highest priority first
pub const BREAKDOWN_COUNT_KEYS: &[&str] = &[
    "count",
    "total",
    "fruitCount",
    // Legacy writers
    "fruit_count",
    "fruitcount",
    "fruitCout",
    "fuitCount",
];

/// Resolve the prior-season count recorded for `tree_id`.
///
/// Never fails: absent, malformed, negative or non-finite entries resolve to 0.
pub fn resolve_count(breakdown: &Breakdown, tree_id: &str) -> u32 {
    breakdown.get(tree_id).map(resolve_entry).unwrap_or(0)
}

/// Resolve a single breakdown entry of any shape
pub fn resolve_entry(entry: &Value) -> u32 {
    match entry {
        Value::Object(fields) => BREAKDOWN_COUNT_KEYS
            .iter()
            .find_map(|key| fields.get(*key).filter(|v| !v.is_null()))
            .map(coerce_scalar)
            .unwrap_or(0),
        other => coerce_scalar(other),
    }
}

/// Coerce a number or numeric string into a count
fn coerce_scalar(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).unwrap_or(u32::MAX)
            } else if let Some(f) = n.as_f64() {
                count_from_f64(f)
            } else {
                0
            }
        }
        Value::String(s) => parse_leading_integer(s),
        _ => 0,
    }
}

fn count_from_f64(f: f64) -> u32 {
    if !f.is_finite() || f <= 0.0 {
        0
    } else if f >= u32::MAX as f64 {
        u32::MAX
    } else {
        f.trunc() as u32
    }
}

/// Parse the leading integer of a string: `" 12 "` → 12, `"7 trái"` → 7,
/// `"3.9"` → 3. Negative values and strings without leading digits give 0.
fn parse_leading_integer(s: &str) -> u32 {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return 0;
    }
    // Overflow only happens on all-digit input, so saturate
    digits.parse::<u32>().unwrap_or(u32::MAX)
}
