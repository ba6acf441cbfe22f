//! Revenue goal pacing — compares booked revenue for a goal year against the
//! elapsed fraction of that year.

use revpulse_core::MonthIndex;
use serde::{Deserialize, Serialize};

use crate::reconcile::MonthRow;

/// An annual booked-revenue target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueGoal {
    pub year: i32,
    /// Minor currency units.
    pub target: i64,
}

/// Whether revenue is arriving at the expected rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPacing {
    NotStarted,
    OnTrack,
    Ahead,
    Behind,
    Achieved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Minor currency units.
    pub target: i64,
    /// Minor currency units.
    pub achieved: i64,
    /// Minor currency units, never negative.
    pub remaining: i64,
    pub pct_achieved: f64,
    pub status: GoalPacing,
}

/// Evaluate a goal against reconciled rows. Total: a zero target or an empty
/// sequence produces a neutral on-track result rather than an error.
pub fn evaluate(
    goal: &RevenueGoal,
    rows: &[MonthRow],
    now: MonthIndex,
    ahead_factor: f64,
    behind_factor: f64,
) -> GoalProgress {
    let achieved: i64 = rows
        .iter()
        .filter(|r| r.year == goal.year)
        .map(|r| r.bookings)
        .sum();
    let remaining = (goal.target - achieved).max(0);
    let pct_achieved = if goal.target > 0 {
        achieved as f64 / goal.target as f64 * 100.0
    } else {
        0.0
    };

    let status = if now.year() < goal.year {
        GoalPacing::NotStarted
    } else if goal.target > 0 && achieved >= goal.target {
        GoalPacing::Achieved
    } else if goal.target == 0 {
        GoalPacing::OnTrack
    } else {
        let elapsed_months = if now.year() > goal.year {
            12
        } else {
            now.month()
        };
        let elapsed_fraction = elapsed_months as f64 / 12.0;
        let achieved_fraction = achieved as f64 / goal.target as f64;

        if achieved_fraction > elapsed_fraction * ahead_factor {
            GoalPacing::Ahead
        } else if achieved_fraction < elapsed_fraction * behind_factor {
            GoalPacing::Behind
        } else {
            GoalPacing::OnTrack
        }
    };

    GoalProgress {
        target: goal.target,
        achieved,
        remaining,
        pct_achieved,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(year: i32, month: u32, bookings: i64) -> MonthRow {
        MonthRow {
            id: Uuid::new_v4(),
            year,
            month,
            inquiries: 0,
            calls_booked: 0,
            calls_taken: 0,
            closes: 0,
            bookings,
            cash: 0,
        }
    }

    fn goal() -> RevenueGoal {
        RevenueGoal {
            year: 2024,
            target: 12_000_000,
        }
    }

    #[test]
    fn test_on_track_mid_year() {
        // June: 6/12 elapsed, 50% achieved.
        let rows = vec![row(2024, 1, 3_000_000), row(2024, 4, 3_000_000)];
        let progress = evaluate(&goal(), &rows, MonthIndex::from_ym(2024, 6), 1.1, 0.8);
        assert_eq!(progress.status, GoalPacing::OnTrack);
        assert_eq!(progress.achieved, 6_000_000);
        assert_eq!(progress.remaining, 6_000_000);
        assert!((progress.pct_achieved - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ahead_and_behind() {
        // March: 25% elapsed. 60% achieved -> ahead.
        let rows = vec![row(2024, 1, 7_200_000)];
        let progress = evaluate(&goal(), &rows, MonthIndex::from_ym(2024, 3), 1.1, 0.8);
        assert_eq!(progress.status, GoalPacing::Ahead);

        // October: ~83% elapsed. 25% achieved -> behind.
        let rows = vec![row(2024, 1, 3_000_000)];
        let progress = evaluate(&goal(), &rows, MonthIndex::from_ym(2024, 10), 1.1, 0.8);
        assert_eq!(progress.status, GoalPacing::Behind);
    }

    #[test]
    fn test_achieved_short_circuits_pacing() {
        let rows = vec![row(2024, 2, 12_500_000)];
        let progress = evaluate(&goal(), &rows, MonthIndex::from_ym(2024, 3), 1.1, 0.8);
        assert_eq!(progress.status, GoalPacing::Achieved);
        assert_eq!(progress.remaining, 0);
    }

    #[test]
    fn test_not_started_before_goal_year() {
        let progress = evaluate(&goal(), &[], MonthIndex::from_ym(2023, 11), 1.1, 0.8);
        assert_eq!(progress.status, GoalPacing::NotStarted);
        assert_eq!(progress.achieved, 0);
    }

    #[test]
    fn test_other_years_do_not_count() {
        let rows = vec![row(2023, 12, 9_000_000), row(2024, 1, 1_000_000)];
        let progress = evaluate(&goal(), &rows, MonthIndex::from_ym(2024, 1), 1.1, 0.8);
        assert_eq!(progress.achieved, 1_000_000);
    }

    #[test]
    fn test_zero_target_is_neutral() {
        let zero = RevenueGoal {
            year: 2024,
            target: 0,
        };
        let progress = evaluate(&zero, &[row(2024, 1, 500)], MonthIndex::from_ym(2024, 6), 1.1, 0.8);
        assert_eq!(progress.status, GoalPacing::OnTrack);
        assert!((progress.pct_achieved - 0.0).abs() < f64::EPSILON);
    }
}
