//! Analytics aggregation and forecasting — range resolution, monthly funnel
//! reconciliation, derived metrics, lead-source attribution, flat revenue
//! forecasts, and goal pacing.
//!
//! Every operation is a pure function of caller-supplied records, an injected
//! "now", and the resolved range. Nothing here performs I/O, reads the system
//! clock, or raises for malformed input: bad data degrades to zero-valued or
//! `None` results so a dashboard can always render.

pub mod attribution;
pub mod dashboard;
pub mod forecast;
pub mod goals;
pub mod metrics;
pub mod reconcile;
pub mod timerange;

pub use attribution::{ad_attribution, lead_source_breakdown, AdAttribution, LeadSourceBreakdown};
pub use dashboard::{build_snapshot, DashboardSnapshot};
pub use forecast::{forecast_totals, project, ForecastMonth, ForecastTotals};
pub use goals::{GoalPacing, GoalProgress, RevenueGoal};
pub use metrics::{compute, MetricsBundle, MonthlyAverages};
pub use reconcile::{reconcile, MonthRow};
pub use timerange::{resolve, RangeMode, RangeSelector, ResolvedRange};
