//! Season service: phase classification and breakdown resolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    classify_tree, latest_season_record, resolve_count, Breakdown, HarvestCalendar, PhaseResult,
    SeasonRecord,
};

/// Season service backed by the configured harvest calendar
#[derive(Clone)]
pub struct SeasonService {
    calendar: HarvestCalendar,
}

/// Input for classifying a tree's season phase
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyInput {
    /// Instant to classify at; the server clock when omitted
    pub now: Option<DateTime<Utc>>,
    pub tree_id: Option<String>,
    /// The farm's most recent season record
    pub record: Option<SeasonRecord>,
    /// Candidate records to pick the most recent from when `record` is absent
    #[serde(default)]
    pub records: Vec<SeasonRecord>,
}

/// Input for resolving one tree's count from a breakdown map
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveCountInput {
    #[serde(default)]
    pub breakdown: Breakdown,
    pub tree_id: String,
}

/// Resolved count for a tree
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCount {
    pub tree_id: String,
    pub count: u32,
}

impl SeasonService {
    /// Create a new SeasonService instance
    pub fn new(calendar: HarvestCalendar) -> Self {
        Self { calendar }
    }

    /// Classify a tree against the most recent of the supplied records
    pub fn classify(&self, input: ClassifyInput, clock_now: DateTime<Utc>) -> PhaseResult {
        let now = input.now.unwrap_or(clock_now);
        let record = input
            .record
            .as_ref()
            .or_else(|| latest_season_record(&input.records));
        let tree_id = input.tree_id.as_deref().unwrap_or_default();

        let result = classify_tree(now, tree_id, record, &self.calendar);
        tracing::info!(
            tree_id,
            phase = %result.phase,
            previous_count = ?result.previous_count,
            "Season phase classified"
        );
        result
    }

    /// Resolve a tree's prior-season count
    pub fn resolve_count(&self, input: &ResolveCountInput) -> ResolvedCount {
        ResolvedCount {
            tree_id: input.tree_id.clone(),
            count: resolve_count(&input.breakdown, &input.tree_id),
        }
    }
}
