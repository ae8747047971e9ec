//! Season records and production phase classification

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::breakdown::{resolve_count, Breakdown};
use crate::settings::HarvestCalendar;
use crate::types::Language;

/// Length of the flat "month" used when measuring time since harvest
pub const DAYS_PER_SEASON_MONTH: i64 = 30;

/// A closed production season for a farm
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecord {
    pub id: Uuid,
    pub farm_id: Uuid,
    /// When the season closed; older writers did not always record it
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub per_entity_breakdown: Breakdown,
}

impl SeasonRecord {
    /// Prior-season count for one tree
    pub fn count_for(&self, tree_id: &str) -> u32 {
        resolve_count(&self.per_entity_breakdown, tree_id)
    }

    /// Recorded end date, or the harvest calendar's estimate when missing
    pub fn effective_end_date(
        &self,
        now: DateTime<Utc>,
        calendar: &HarvestCalendar,
    ) -> DateTime<Utc> {
        self.end_date
            .unwrap_or_else(|| calendar.estimate_season_end(now))
    }
}

/// Most recent season record by end date.
///
/// Records without an end date rank below every dated record; among equals the
/// first one wins.
pub fn latest_season_record(records: &[SeasonRecord]) -> Option<&SeasonRecord> {
    records.iter().reduce(|best, candidate| {
        if candidate.end_date > best.end_date {
            candidate
        } else {
            best
        }
    })
}

/// Stage of a tree's annual production cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeasonPhase {
    /// No season has been recorded for the farm yet
    NewTree,
    /// The latest record's end date has not been reached
    CurrentSeason,
    /// 0 to 3 months after harvest
    PostHarvest,
    /// 4 to 9 months after harvest
    Growing,
    /// 10 to 12 months after harvest
    Flowering,
    /// More than 12 months after harvest
    NewSeason,
}

impl SeasonPhase {
    /// Classify a whole number of flat 30-day months since harvest
    pub fn from_months_since_harvest(months: i64) -> Self {
        match months {
            m if m < 0 => SeasonPhase::CurrentSeason,
            0..=3 => SeasonPhase::PostHarvest,
            4..=9 => SeasonPhase::Growing,
            10..=12 => SeasonPhase::Flowering,
            _ => SeasonPhase::NewSeason,
        }
    }

    /// Phase expected to follow this one
    pub fn next(&self) -> SeasonPhase {
        match self {
            SeasonPhase::NewTree => SeasonPhase::CurrentSeason,
            SeasonPhase::CurrentSeason => SeasonPhase::PostHarvest,
            SeasonPhase::PostHarvest => SeasonPhase::Growing,
            SeasonPhase::Growing => SeasonPhase::Flowering,
            SeasonPhase::Flowering => SeasonPhase::NewSeason,
            SeasonPhase::NewSeason => SeasonPhase::CurrentSeason,
        }
    }

    /// Whether the current tally should be presented as reset to zero
    pub fn resets_count(&self) -> bool {
        matches!(self, SeasonPhase::PostHarvest)
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (SeasonPhase::NewTree, Language::English) => "New tree",
            (SeasonPhase::NewTree, Language::Vietnamese) => "Cây mới",
            (SeasonPhase::CurrentSeason, Language::English) => "Current season",
            (SeasonPhase::CurrentSeason, Language::Vietnamese) => "Mùa hiện tại",
            (SeasonPhase::PostHarvest, Language::English) => "Post-harvest",
            (SeasonPhase::PostHarvest, Language::Vietnamese) => "Sau thu hoạch",
            (SeasonPhase::Growing, Language::English) => "Growing",
            (SeasonPhase::Growing, Language::Vietnamese) => "Đang phát triển",
            (SeasonPhase::Flowering, Language::English) => "Flowering",
            (SeasonPhase::Flowering, Language::Vietnamese) => "Ra hoa",
            (SeasonPhase::NewSeason, Language::English) => "New season",
            (SeasonPhase::NewSeason, Language::Vietnamese) => "Mùa mới",
        }
    }
}

impl std::fmt::Display for SeasonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label(Language::English))
    }
}

/// Classification of one tree at one instant
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseResult {
    pub phase: SeasonPhase,
    pub next_phase: SeasonPhase,
    pub label: String,
    pub label_vi: String,
    /// Whole flat months since the season closed; `None` for a new tree
    pub months_since_harvest: Option<i64>,
    /// Prior-season count resolved from the record's breakdown
    pub previous_count: Option<u32>,
    /// Year of the closing season's end date
    pub season_year: Option<i32>,
    /// Set only in [`SeasonPhase::NewSeason`]
    pub next_season_year: Option<i32>,
    pub should_reset_count: bool,
}

impl PhaseResult {
    fn new_tree() -> Self {
        Self::for_phase(SeasonPhase::NewTree)
    }

    fn for_phase(phase: SeasonPhase) -> Self {
        Self {
            phase,
            next_phase: phase.next(),
            label: phase.label(Language::English).to_string(),
            label_vi: phase.label(Language::Vietnamese).to_string(),
            months_since_harvest: None,
            previous_count: None,
            season_year: None,
            next_season_year: None,
            should_reset_count: phase.resets_count(),
        }
    }
}

/// Whole flat 30-day months from `end_date` to `now`, floored (negative when
/// `end_date` is still in the future)
pub fn months_since_harvest(now: DateTime<Utc>, end_date: DateTime<Utc>) -> i64 {
    let elapsed: Duration = now.signed_duration_since(end_date);
    let month = Duration::days(DAYS_PER_SEASON_MONTH);
    // Compare in milliseconds; sub-millisecond precision does not matter here
    elapsed
        .num_milliseconds()
        .div_euclid(month.num_milliseconds())
}

/// Classify a tree's phase from the end date of the last closed season.
///
/// `None` means no season has ever been recorded.
pub fn classify(now: DateTime<Utc>, last_season_end: Option<DateTime<Utc>>) -> PhaseResult {
    let Some(end_date) = last_season_end else {
        return PhaseResult::new_tree();
    };

    let months = months_since_harvest(now, end_date);
    let phase = SeasonPhase::from_months_since_harvest(months);
    let season_year = end_date.year();

    let mut result = PhaseResult::for_phase(phase);
    result.months_since_harvest = Some(months);
    result.season_year = Some(season_year);
    if phase == SeasonPhase::NewSeason {
        result.next_season_year = Some(season_year + 1);
    }

    tracing::debug!(%now, %end_date, months, %phase, "classified season phase");
    result
}

/// Classify a tree against the farm's most recent season record.
///
/// A record without an end date gets one estimated from `calendar`; the tree's
/// prior count is resolved from the record's breakdown.
pub fn classify_tree(
    now: DateTime<Utc>,
    tree_id: &str,
    latest_record: Option<&SeasonRecord>,
    calendar: &HarvestCalendar,
) -> PhaseResult {
    let Some(record) = latest_record else {
        return classify(now, None);
    };

    if record.end_date.is_none() {
        tracing::debug!(record_id = %record.id, "season record has no end date, estimating");
    }

    let mut result = classify(now, Some(record.effective_end_date(now, calendar)));
    result.previous_count = Some(record.count_for(tree_id));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 8, 0, 0).unwrap()
    }

    fn record(end_date: Option<DateTime<Utc>>) -> SeasonRecord {
        SeasonRecord {
            id: Uuid::new_v4(),
            farm_id: Uuid::new_v4(),
            end_date,
            per_entity_breakdown: serde_json::from_value(json!({
                "tree-1": {"total": 9},
                "tree-2": "14",
            }))
            .unwrap(),
        }
    }

    #[test]
    fn test_no_record_is_new_tree() {
        let result = classify(now(), None);
        assert_eq!(result.phase, SeasonPhase::NewTree);
        assert_eq!(result.season_year, None);
        assert_eq!(result.previous_count, None);
        assert!(!result.should_reset_count);
    }

    #[test]
    fn test_same_instant_is_post_harvest() {
        let result = classify(now(), Some(now()));
        assert_eq!(result.months_since_harvest, Some(0));
        assert_eq!(result.phase, SeasonPhase::PostHarvest);
    }

    #[test]
    fn test_forty_days_is_post_harvest_with_reset() {
        let result = classify(now(), Some(now() - Duration::days(40)));
        assert_eq!(result.phase, SeasonPhase::PostHarvest);
        assert!(result.should_reset_count);
        assert_eq!(result.next_phase, SeasonPhase::Growing);
    }

    #[test]
    fn test_future_end_date_is_current_season() {
        let result = classify(now(), Some(now() + Duration::hours(1)));
        assert_eq!(result.months_since_harvest, Some(-1));
        assert_eq!(result.phase, SeasonPhase::CurrentSeason);
        assert!(!result.should_reset_count);
    }

    #[test]
    fn test_month_boundaries_land_in_lower_phase() {
        let cases = [
            (0, SeasonPhase::PostHarvest),
            (3, SeasonPhase::PostHarvest),
            (4, SeasonPhase::Growing),
            (9, SeasonPhase::Growing),
            (10, SeasonPhase::Flowering),
            (12, SeasonPhase::Flowering),
            (13, SeasonPhase::NewSeason),
        ];
        for (months, expected) in cases {
            let end = now() - Duration::days(months * DAYS_PER_SEASON_MONTH);
            assert_eq!(classify(now(), Some(end)).phase, expected, "{} months", months);
        }
    }

    #[test]
    fn test_just_under_a_month_boundary_floors_down() {
        let end = now() - Duration::days(4 * DAYS_PER_SEASON_MONTH) + Duration::seconds(1);
        assert_eq!(months_since_harvest(now(), end), 3);
        assert_eq!(classify(now(), Some(end)).phase, SeasonPhase::PostHarvest);
    }

    #[test]
    fn test_four_hundred_days_is_new_season() {
        let end = now() - Duration::days(400);
        let result = classify(now(), Some(end));
        assert_eq!(result.phase, SeasonPhase::NewSeason);
        assert_eq!(result.season_year, Some(end.year()));
        assert_eq!(result.next_season_year, Some(end.year() + 1));
    }

    #[test]
    fn test_next_season_year_only_for_new_season() {
        let result = classify(now(), Some(now() - Duration::days(300)));
        assert_eq!(result.phase, SeasonPhase::Flowering);
        assert_eq!(result.next_season_year, None);
    }

    #[test]
    fn test_pre_epoch_dates() {
        let end = Utc.with_ymd_and_hms(1969, 12, 1, 0, 0, 0).unwrap();
        let now = end + Duration::days(45);
        assert_eq!(months_since_harvest(now, end), 1);
        assert_eq!(months_since_harvest(end, now), -2);
    }

    #[test]
    fn test_classify_tree_resolves_previous_count() {
        let rec = record(Some(now() - Duration::days(200)));
        let calendar = HarvestCalendar::default();
        assert_eq!(
            classify_tree(now(), "tree-1", Some(&rec), &calendar).previous_count,
            Some(9)
        );
        assert_eq!(
            classify_tree(now(), "tree-2", Some(&rec), &calendar).previous_count,
            Some(14)
        );
        assert_eq!(
            classify_tree(now(), "tree-9", Some(&rec), &calendar).previous_count,
            Some(0)
        );
    }

    #[test]
    fn test_classify_tree_without_record() {
        let result = classify_tree(now(), "tree-1", None, &HarvestCalendar::default());
        assert_eq!(result.phase, SeasonPhase::NewTree);
    }

    #[test]
    fn test_missing_end_date_uses_calendar() {
        // March 2025 is before the August cutoff: assume 2024-09-30
        let rec = record(None);
        let result = classify_tree(now(), "tree-1", Some(&rec), &HarvestCalendar::default());
        assert_eq!(result.season_year, Some(2024));
        assert_eq!(result.months_since_harvest, Some(5));
        assert_eq!(result.phase, SeasonPhase::Growing);
    }

    #[test]
    fn test_latest_season_record_orders_by_end_date() {
        let older = record(Some(now() - Duration::days(400)));
        let newer = record(Some(now() - Duration::days(10)));
        let undated = record(None);
        let records = vec![undated.clone(), older.clone(), newer.clone()];
        assert_eq!(latest_season_record(&records).map(|r| r.id), Some(newer.id));

        let only_undated = vec![undated.clone()];
        assert_eq!(
            latest_season_record(&only_undated).map(|r| r.id),
            Some(undated.id)
        );
        assert!(latest_season_record(&[]).is_none());
    }

    #[test]
    fn test_record_deserializes_from_camel_case() {
        let rec: SeasonRecord = serde_json::from_value(json!({
            "id": "6f1c2b7e-8a55-4f0e-9f4f-0d1e2a3b4c5d",
            "farmId": "0b8d3f8e-1d2c-4c55-8d2e-7a6b5c4d3e2f",
            "endDate": "2024-09-30T00:00:00Z",
            "perEntityBreakdown": {"t1": {"fruitCount": 30}}
        }))
        .unwrap();
        assert_eq!(rec.count_for("t1"), 30);
        assert_eq!(rec.end_date.map(|d| d.year()), Some(2024));
    }

    #[test]
    fn test_labels() {
        assert_eq!(SeasonPhase::Flowering.to_string(), "Flowering");
        assert_eq!(SeasonPhase::PostHarvest.label(Language::Vietnamese), "Sau thu hoạch");
    }
}
