//! Filter/search predicates and the ordered list projection.
//!
//! [`project`] derives a filtered view of the generation list. It is
//! purely derived state: predicates compose with logical AND, and the
//! projection never reorders; the store's newest-first insertion
//! order survives filtering untouched.

use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::generation::{GenerationKind, GenerationRecord};
use crate::types::{ModelId, Timestamp};

// ---------------------------------------------------------------------------
// Kind filter
// ---------------------------------------------------------------------------

/// Type predicate over the generation list.
///
/// `All` and `Projects` both bypass the predicate: `Projects` is a
/// routing sentinel that sends the caller to an entirely different
/// collection, not a record filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFilter {
    #[default]
    All,
    Projects,
    Kind(GenerationKind),
}

impl KindFilter {
    fn matches(self, record: &GenerationRecord) -> bool {
        match self {
            Self::All | Self::Projects => true,
            Self::Kind(kind) => record.kind == kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Date filter
// ---------------------------------------------------------------------------

/// Date-range predicate over record start timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    All,
    /// On or after local midnight of the current day.
    Today,
    Last7Days,
    Last30Days,
    /// Inclusive range of local calendar days: the entire `to` day is
    /// included (up to 23:59:59.999).
    Custom { from: NaiveDate, to: NaiveDate },
}

impl DateFilter {
    /// Whether `ts` falls inside the range, evaluated against `now` in
    /// the local timezone.
    ///
    /// `now` is injected so the boundary logic is testable without
    /// freezing the clock.
    pub fn contains(self, ts: Timestamp, now: DateTime<Local>) -> bool {
        let local = ts.with_timezone(&Local);
        match self {
            Self::All => true,
            Self::Today => local.date_naive() == now.date_naive(),
            Self::Last7Days => ts >= (now - Duration::days(7)).to_utc(),
            Self::Last30Days => ts >= (now - Duration::days(30)).to_utc(),
            Self::Custom { from, to } => {
                let date = local.date_naive();
                date >= from && date <= to
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Composite filters
// ---------------------------------------------------------------------------

/// The full filter set applied to the generation list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationFilters {
    pub kind: KindFilter,
    pub date: DateFilter,
    /// Exact model-id match; `None` is the "all" sentinel.
    pub model: Option<ModelId>,
    /// Case-insensitive substring match against the prompt or the
    /// model display name; empty bypasses the filter.
    pub query: String,
}

impl GenerationFilters {
    /// Whether a single record passes every predicate (AND).
    pub fn matches(&self, record: &GenerationRecord, now: DateTime<Local>) -> bool {
        if !self.kind.matches(record) {
            return false;
        }
        if !self.date.contains(record.started_at, now) {
            return false;
        }
        if let Some(ref model_id) = self.model {
            if &record.model_id != model_id {
                return false;
            }
        }
        if !self.query.is_empty() {
            let needle = self.query.to_lowercase();
            let in_prompt = record.prompt.to_lowercase().contains(&needle);
            let in_model = record.model_name.to_lowercase().contains(&needle);
            if !in_prompt && !in_model {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Derive the filtered, ordered subset of `records`.
///
/// Order-preserving: the output keeps the input's relative order.
pub fn project<'a>(
    records: &'a [GenerationRecord],
    filters: &GenerationFilters,
) -> Vec<&'a GenerationRecord> {
    let now = Local::now();
    records.iter().filter(|r| filters.matches(r, now)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationStatus;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, kind: GenerationKind, model_id: &str, prompt: &str) -> GenerationRecord {
        GenerationRecord {
            id: id.into(),
            visible_id: format!("G-{id}"),
            kind,
            model_id: model_id.into(),
            model_name: format!("Model {model_id}"),
            prompt: prompt.into(),
            status: GenerationStatus::Pending,
            result: None,
            credits: 1.0,
            workspace_id: "ws-1".into(),
            started_at: Utc::now(),
            completed_at: None,
            failure: None,
        }
    }

    fn local_midnight_today() -> DateTime<Local> {
        Local::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| Local.from_local_datetime(&naive).single())
            .expect("local midnight should exist")
    }

    // -- Kind filter --

    #[test]
    fn kind_all_bypasses() {
        let r = record("1", GenerationKind::Video, "m", "x");
        assert!(KindFilter::All.matches(&r));
    }

    #[test]
    fn kind_projects_sentinel_bypasses() {
        let r = record("1", GenerationKind::Video, "m", "x");
        assert!(KindFilter::Projects.matches(&r));
    }

    #[test]
    fn kind_exact_match() {
        let r = record("1", GenerationKind::Video, "m", "x");
        assert!(KindFilter::Kind(GenerationKind::Video).matches(&r));
        assert!(!KindFilter::Kind(GenerationKind::Image).matches(&r));
    }

    // -- Date filter boundaries --

    #[test]
    fn today_includes_exact_local_midnight() {
        let midnight = local_midnight_today();
        assert!(DateFilter::Today.contains(midnight.to_utc(), Local::now()));
    }

    #[test]
    fn today_excludes_one_ms_before_midnight() {
        let just_before = local_midnight_today() - Duration::milliseconds(1);
        assert!(!DateFilter::Today.contains(just_before.to_utc(), Local::now()));
    }

    #[test]
    fn last_7_days_boundary() {
        let now = Local::now();
        let inside = (now - Duration::days(6)).to_utc();
        let outside = (now - Duration::days(8)).to_utc();
        assert!(DateFilter::Last7Days.contains(inside, now));
        assert!(!DateFilter::Last7Days.contains(outside, now));
    }

    #[test]
    fn custom_range_includes_entire_end_day() {
        let now = Local::now();
        let today = now.date_naive();
        let filter = DateFilter::Custom {
            from: today - Duration::days(3),
            to: today,
        };
        // A timestamp late in the `to` day is still included.
        assert!(filter.contains(now.to_utc(), now));
    }

    #[test]
    fn custom_range_excludes_day_after_end() {
        let now = Local::now();
        let yesterday = now.date_naive() - Duration::days(1);
        let filter = DateFilter::Custom {
            from: yesterday - Duration::days(3),
            to: yesterday,
        };
        assert!(!filter.contains(now.to_utc(), now));
    }

    // -- Model & text filters --

    #[test]
    fn model_none_is_all_sentinel() {
        let filters = GenerationFilters::default();
        let r = record("1", GenerationKind::Image, "m1", "a cat");
        assert!(filters.matches(&r, Local::now()));
    }

    #[test]
    fn model_exact_match_required_when_set() {
        let filters = GenerationFilters {
            model: Some("m1".into()),
            ..Default::default()
        };
        let now = Local::now();
        assert!(filters.matches(&record("1", GenerationKind::Image, "m1", "x"), now));
        assert!(!filters.matches(&record("2", GenerationKind::Image, "m2", "x"), now));
    }

    #[test]
    fn query_matches_prompt_case_insensitive() {
        let filters = GenerationFilters {
            query: "CAT".into(),
            ..Default::default()
        };
        let r = record("1", GenerationKind::Image, "m1", "a sleeping cat");
        assert!(filters.matches(&r, Local::now()));
    }

    #[test]
    fn query_matches_model_display_name() {
        let filters = GenerationFilters {
            query: "model m1".into(),
            ..Default::default()
        };
        let r = record("1", GenerationKind::Image, "m1", "unrelated");
        assert!(filters.matches(&r, Local::now()));
    }

    #[test]
    fn query_no_match_excludes() {
        let filters = GenerationFilters {
            query: "dog".into(),
            ..Default::default()
        };
        let r = record("1", GenerationKind::Image, "m1", "a cat");
        assert!(!filters.matches(&r, Local::now()));
    }

    // -- Projection --

    #[test]
    fn projection_ands_predicates() {
        let records = vec![
            record("1", GenerationKind::Image, "m1", "a cat"),
            record("2", GenerationKind::Image, "m2", "a cat"),
            record("3", GenerationKind::Video, "m1", "a cat"),
            record("4", GenerationKind::Image, "m1", "a dog"),
        ];
        let filters = GenerationFilters {
            kind: KindFilter::Kind(GenerationKind::Image),
            model: Some("m1".into()),
            query: "cat".into(),
            ..Default::default()
        };
        let visible = project(&records, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "1");
    }

    #[test]
    fn projection_preserves_order() {
        let records = vec![
            record("newest", GenerationKind::Image, "m1", "cat one"),
            record("middle", GenerationKind::Video, "m1", "cat two"),
            record("oldest", GenerationKind::Image, "m1", "cat three"),
        ];
        let filters = GenerationFilters {
            kind: KindFilter::Kind(GenerationKind::Image),
            ..Default::default()
        };
        let visible = project(&records, &filters);
        let ids: Vec<_> = visible.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "oldest"]);
    }

    #[test]
    fn empty_filters_pass_everything_through() {
        let records = vec![
            record("1", GenerationKind::Image, "m1", "x"),
            record("2", GenerationKind::Chat, "m2", "y"),
        ];
        let visible = project(&records, &GenerationFilters::default());
        assert_eq!(visible.len(), 2);
    }
}
