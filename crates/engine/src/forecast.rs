//! Forecast projection — synthesizes future months by repeating historical
//! monthly averages. Deliberately flat: no seasonality, no trend.

use revpulse_core::MonthIndex;
use serde::{Deserialize, Serialize};

use crate::metrics::MonthlyAverages;

/// One projected future month, carrying the historical averages unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMonth {
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    pub inquiries: f64,
    pub calls_booked: f64,
    pub calls_taken: f64,
    pub closes: f64,
    /// Minor currency units.
    pub bookings: i64,
}

/// Sums over a projected horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastTotals {
    pub inquiries: f64,
    pub calls_booked: f64,
    pub calls_taken: f64,
    pub closes: f64,
    /// Minor currency units.
    pub bookings: i64,
}

/// Project `horizon` months forward from the month after `now`, wrapping
/// year boundaries.
pub fn project(averages: &MonthlyAverages, now: MonthIndex, horizon: u32) -> Vec<ForecastMonth> {
    let mut months = Vec::with_capacity(horizon as usize);
    let mut index = now;
    for _ in 0..horizon {
        index = index.next();
        months.push(ForecastMonth {
            year: index.year(),
            month: index.month(),
            inquiries: averages.inquiries,
            calls_booked: averages.calls_booked,
            calls_taken: averages.calls_taken,
            closes: averages.closes,
            bookings: averages.bookings,
        });
    }
    months
}

/// Sum the horizon month by month. The money side stays integer-exact
/// because rounding already happened once per month in the averages.
pub fn forecast_totals(months: &[ForecastMonth]) -> ForecastTotals {
    let mut totals = ForecastTotals::default();
    for m in months {
        totals.inquiries += m.inquiries;
        totals.calls_booked += m.calls_booked;
        totals.calls_taken += m.calls_taken;
        totals.closes += m.closes;
        totals.bookings += m.bookings;
    }
    totals
}
