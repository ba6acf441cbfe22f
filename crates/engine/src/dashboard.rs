//! Dashboard snapshot assembly — the one place that wires range resolution,
//! reconciliation, metrics, attribution, forecasting, and goal pacing
//! together for a view.

use revpulse_core::types::AccountData;
use revpulse_core::{AppConfig, MonthIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attribution::{ad_attribution, lead_source_breakdown, AdAttribution, LeadSourceBreakdown};
use crate::forecast::{forecast_totals, project, ForecastMonth, ForecastTotals};
use crate::goals::{evaluate, GoalProgress, RevenueGoal};
use crate::metrics::{compute, MetricsBundle};
use crate::reconcile::{reconcile, MonthRow};
use crate::timerange::{resolve, RangeSelector, ResolvedRange};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSection {
    pub months: Vec<ForecastMonth>,
    pub totals: ForecastTotals,
}

/// Everything a dashboard view needs for one account and range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub range: ResolvedRange,
    pub rows: Vec<MonthRow>,
    pub metrics: MetricsBundle,
    pub lead_sources: LeadSourceBreakdown,
    pub advertising: AdAttribution,
    pub forecast: ForecastSection,
    /// Absent when no goal is configured.
    pub goal: Option<GoalProgress>,
}

/// Build a snapshot from caller-supplied records and an injected "now".
/// Pure: same inputs, same snapshot.
pub fn build_snapshot(
    data: &AccountData,
    selector: &RangeSelector,
    now: MonthIndex,
    config: &AppConfig,
) -> DashboardSnapshot {
    let range = resolve(selector, now);
    let rows = reconcile(
        &data.funnel_records,
        &data.bookings,
        &data.payments,
        &data.service_types,
        &range,
    );
    let metrics = compute(&rows);
    let lead_sources =
        lead_source_breakdown(&data.bookings, &data.service_types, &data.lead_sources, &range);
    let advertising = ad_attribution(&data.ad_campaigns, &data.bookings, &data.service_types, &range);

    // The projection averages over its own lookback window, not the view
    // range, so switching the view never changes the forecast.
    let lookback = resolve(&RangeSelector::PastMonths(config.forecast.lookback_months), now);
    let lookback_rows = reconcile(
        &data.funnel_records,
        &data.bookings,
        &data.payments,
        &data.service_types,
        &lookback,
    );
    let lookback_metrics = compute(&lookback_rows);
    let months = project(&lookback_metrics.averages, now, config.forecast.horizon_months);
    let forecast = ForecastSection {
        totals: forecast_totals(&months),
        months,
    };

    let goal = (config.goal.annual_revenue_target > 0).then(|| {
        let goal = RevenueGoal {
            year: now.year(),
            target: config.goal.annual_revenue_target,
        };
        let goal_range = resolve(&RangeSelector::Year(now.year()), now);
        let goal_rows = reconcile(
            &data.funnel_records,
            &data.bookings,
            &data.payments,
            &data.service_types,
            &goal_range,
        );
        evaluate(
            &goal,
            &goal_rows,
            now,
            config.goal.ahead_factor,
            config.goal.behind_factor,
        )
    });

    debug!(
        rows = rows.len(),
        months_with_data = metrics.months_with_data,
        lead_sources = lead_sources.by_count.len(),
        "snapshot built"
    );

    DashboardSnapshot {
        range,
        rows,
        metrics,
        lead_sources,
        advertising,
        forecast,
        goal,
    }
}
