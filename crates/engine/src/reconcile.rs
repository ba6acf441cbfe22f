//! Monthly reconciliation — merges stored funnel snapshots with values
//! derived live from bookings and payments.
//!
//! Derived values win by default; a stored value wins only where its manual
//! flag is set. That holds even when the derived value is zero and the stored
//! one is not, so a stale manual entry never shadows an empty booking ledger.

use std::collections::{BTreeMap, HashSet};

use revpulse_core::types::{Booking, FunnelRecord, Payment, ServiceType};
use revpulse_core::MonthIndex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timerange::{RangeMode, ResolvedRange};

/// Namespace for synthesized zero-row ids, so re-running reconciliation
/// yields the same id for the same month.
const MONTH_ROW_NS: Uuid = Uuid::from_u128(0x3e1b_1f52_c9a4_47e8_a6b0_d6a4_7c2f_4b19);

/// One reconciled calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRow {
    pub id: Uuid,
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    pub inquiries: u64,
    pub calls_booked: u64,
    pub calls_taken: u64,
    pub closes: u64,
    /// Minor currency units.
    pub bookings: i64,
    /// Minor currency units.
    pub cash: i64,
}

impl MonthRow {
    pub fn month_index(&self) -> MonthIndex {
        MonthIndex::from_ym(self.year, self.month)
    }

    /// A month counts as having data when any funnel count or booked revenue
    /// is nonzero. Cash alone does not qualify.
    pub fn has_activity(&self) -> bool {
        self.inquiries != 0
            || self.calls_booked != 0
            || self.calls_taken != 0
            || self.closes != 0
            || self.bookings != 0
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DynamicTotals {
    closes: u64,
    bookings: i64,
    cash: i64,
}

/// Produce the ordered per-month series for a resolved range.
///
/// Full-year mode materializes all 12 months of the target year, synthesizing
/// zero rows where no record exists. Window mode materializes only months
/// that have a stored record inside the range.
pub fn reconcile(
    records: &[FunnelRecord],
    bookings: &[Booking],
    payments: &[Payment],
    service_types: &[ServiceType],
    range: &ResolvedRange,
) -> Vec<MonthRow> {
    let dynamic = scan_dynamic(bookings, payments, service_types, range);

    let mut stored: BTreeMap<MonthIndex, &FunnelRecord> = BTreeMap::new();
    for record in records {
        // At most one record per month by the storage invariant; first wins
        // if the caller violated it.
        stored.entry(record.month_index()).or_insert(record);
    }

    let months: Vec<MonthIndex> = match (range.mode, range.span) {
        (RangeMode::FullYear, Some((start, end))) => {
            let mut months = Vec::with_capacity(12);
            let mut m = start;
            while m <= end {
                months.push(m);
                m = m.next();
            }
            months
        }
        _ => stored
            .keys()
            .copied()
            .filter(|m| range.contains(*m))
            .collect(),
    };

    months
        .into_iter()
        .map(|month| {
            let record = stored.get(&month).copied();
            let dynamic = dynamic.get(&month).copied().unwrap_or_default();
            build_row(month, record, dynamic)
        })
        .collect()
}

/// Scan bookings and payments into per-month derived totals, independent of
/// any stored funnel record.
fn scan_dynamic(
    bookings: &[Booking],
    payments: &[Payment],
    service_types: &[ServiceType],
    range: &ResolvedRange,
) -> BTreeMap<MonthIndex, DynamicTotals> {
    let tracked: HashSet<Uuid> = service_types
        .iter()
        .filter(|s| s.tracks_in_funnel)
        .map(|s| s.id)
        .collect();

    let mut totals: BTreeMap<MonthIndex, DynamicTotals> = BTreeMap::new();

    for booking in bookings {
        if !tracked.contains(&booking.service_type_id) {
            continue;
        }
        // Bookings without a date are skipped, not an error.
        let Some(date) = booking.date_booked else {
            continue;
        };
        if !range.contains_date(date) {
            continue;
        }
        let entry = totals.entry(MonthIndex::from_date(date)).or_default();
        entry.closes += 1;
        entry.bookings += booking.booked_revenue;
    }

    for payment in payments {
        let Some(date) = payment.effective_date() else {
            continue;
        };
        if !range.contains_date(date) {
            continue;
        }
        totals.entry(MonthIndex::from_date(date)).or_default().cash += payment.amount;
    }

    totals
}

fn build_row(month: MonthIndex, record: Option<&FunnelRecord>, dynamic: DynamicTotals) -> MonthRow {
    let (id, inquiries, calls_booked, calls_taken) = match record {
        Some(r) => (r.id, r.inquiries, r.calls_booked, r.calls_taken),
        None => (synthesized_id(month), 0, 0, 0),
    };

    let closes = match record {
        Some(r) if r.closes_manual => r.closes,
        _ => dynamic.closes,
    };
    let bookings = match record {
        Some(r) if r.bookings_manual => r.bookings,
        _ => dynamic.bookings,
    };
    let cash = match record {
        Some(r) if r.cash_manual => r.cash,
        _ => dynamic.cash,
    };

    MonthRow {
        id,
        year: month.year(),
        month: month.month(),
        inquiries,
        calls_booked,
        calls_taken,
        closes,
        bookings,
        cash,
    }
}

fn synthesized_id(month: MonthIndex) -> Uuid {
    let name = format!("month-row:{}-{:02}", month.year(), month.month());
    Uuid::new_v5(&MONTH_ROW_NS, name.as_bytes())
}
