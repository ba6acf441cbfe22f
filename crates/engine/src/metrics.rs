//! Derived metrics — totals, per-month averages, and conversion ratios over a
//! reconciled month sequence.

use serde::{Deserialize, Serialize};

use crate::reconcile::MonthRow;

/// Sums of every numeric field across the sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub inquiries: u64,
    pub calls_booked: u64,
    pub calls_taken: u64,
    pub closes: u64,
    /// Minor currency units.
    pub bookings: i64,
    /// Minor currency units.
    pub cash: i64,
}

/// Totals divided by the number of months with data. Counts stay fractional;
/// money rounds once here so downstream summation is integer-exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAverages {
    pub inquiries: f64,
    pub calls_booked: f64,
    pub calls_taken: f64,
    pub closes: f64,
    /// Minor currency units.
    pub bookings: i64,
    /// Minor currency units.
    pub cash: i64,
}

/// Conversion ratios, each `(numerator/denominator)*100` to one decimal
/// place, `"0.0"` on a zero denominator. Strings match the dashboard's
/// display contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRates {
    pub inquiry_to_close: String,
    pub inquiry_to_call_booked: String,
    pub inquiry_to_call_taken: String,
    pub call_show_up_rate: String,
    pub call_taken_to_close: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub totals: MetricTotals,
    pub months_with_data: u64,
    pub averages: MonthlyAverages,
    pub rates: ConversionRates,
    /// Booked revenue per call taken, minor currency units. 0 when no calls
    /// were taken.
    pub revenue_per_call_taken: i64,
}

/// Compute the metrics bundle for a reconciled sequence. Pure; empty input
/// yields all zeros and `"0.0"` rates.
pub fn compute(rows: &[MonthRow]) -> MetricsBundle {
    let mut totals = MetricTotals::default();
    let mut months_with_data = 0u64;

    for row in rows {
        totals.inquiries += row.inquiries;
        totals.calls_booked += row.calls_booked;
        totals.calls_taken += row.calls_taken;
        totals.closes += row.closes;
        totals.bookings += row.bookings;
        totals.cash += row.cash;
        if row.has_activity() {
            months_with_data += 1;
        }
    }

    let averages = if months_with_data > 0 {
        let n = months_with_data as f64;
        MonthlyAverages {
            inquiries: totals.inquiries as f64 / n,
            calls_booked: totals.calls_booked as f64 / n,
            calls_taken: totals.calls_taken as f64 / n,
            closes: totals.closes as f64 / n,
            bookings: (totals.bookings as f64 / n).round() as i64,
            cash: (totals.cash as f64 / n).round() as i64,
        }
    } else {
        MonthlyAverages::default()
    };

    let rates = ConversionRates {
        inquiry_to_close: pct(totals.closes, totals.inquiries),
        inquiry_to_call_booked: pct(totals.calls_booked, totals.inquiries),
        inquiry_to_call_taken: pct(totals.calls_taken, totals.inquiries),
        call_show_up_rate: pct(totals.calls_taken, totals.calls_booked),
        call_taken_to_close: pct(totals.closes, totals.calls_taken),
    };

    let revenue_per_call_taken = if totals.calls_taken > 0 {
        (totals.bookings as f64 / totals.calls_taken as f64).round() as i64
    } else {
        0
    };

    MetricsBundle {
        totals,
        months_with_data,
        averages,
        rates,
        revenue_per_call_taken,
    }
}

fn pct(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", numerator as f64 / denominator as f64 * 100.0)
}
