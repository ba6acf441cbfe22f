//! Range resolution — turns a dashboard range key into an absolute
//! month-index interval plus a materialization mode.

use chrono::NaiveDate;
use revpulse_core::MonthIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which span of months a dashboard view covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSelector {
    CurrentYear,
    /// Sliding window ending at "now". The dashboard offers 3/6/12/24 but any
    /// positive count resolves.
    PastMonths(u32),
    Year(i32),
    AllTime,
}

impl RangeSelector {
    /// Map a dashboard range key onto a selector. Unrecognized keys fall back
    /// to the current year rather than erroring; the dashboard must always
    /// have something to render.
    pub fn parse(key: &str) -> Self {
        match key.trim() {
            "current_year" | "currentYear" => Self::CurrentYear,
            "all_time" | "allTime" => Self::AllTime,
            other => {
                if let Some(n) = parse_past_months(other) {
                    return Self::PastMonths(n);
                }
                if let Some(year) = other
                    .strip_prefix("year:")
                    .and_then(|y| y.parse::<i32>().ok())
                {
                    return Self::Year(year);
                }
                debug!(key = other, "unrecognized range key, using current year");
                Self::CurrentYear
            }
        }
    }
}

fn parse_past_months(key: &str) -> Option<u32> {
    let n = key
        .strip_prefix("past_")?
        .strip_suffix("_months")?
        .parse::<u32>()
        .ok()?;
    (n > 0).then_some(n)
}

/// Whether months without stored data get materialized as zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeMode {
    /// All 12 months of the target year appear, zero-filled where empty.
    FullYear,
    /// Only months that have a stored funnel record appear.
    Window,
}

/// A resolved, absolute month interval. `span` is `None` for all-time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRange {
    pub span: Option<(MonthIndex, MonthIndex)>,
    pub mode: RangeMode,
}

impl ResolvedRange {
    pub fn contains(&self, month: MonthIndex) -> bool {
        match self.span {
            Some((start, end)) => start <= month && month <= end,
            None => true,
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(MonthIndex::from_date(date))
    }
}

/// Resolve a selector against an injected "now" month.
pub fn resolve(selector: &RangeSelector, now: MonthIndex) -> ResolvedRange {
    match selector {
        RangeSelector::PastMonths(n) => ResolvedRange {
            span: Some((now.saturating_back(n.saturating_sub(1)), now)),
            mode: RangeMode::Window,
        },
        RangeSelector::CurrentYear => year_range(now.year()),
        RangeSelector::Year(year) => year_range(*year),
        RangeSelector::AllTime => ResolvedRange {
            span: None,
            mode: RangeMode::Window,
        },
    }
}

fn year_range(year: i32) -> ResolvedRange {
    ResolvedRange {
        span: Some((MonthIndex::from_ym(year, 1), MonthIndex::from_ym(year, 12))),
        mode: RangeMode::FullYear,
    }
}
