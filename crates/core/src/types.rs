use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Zero-based count of calendar months since year 0, `year * 12 + (month - 1)`.
///
/// Gives a total ordering over calendar months so range arithmetic is plain
/// integer math. Engine-internal; never stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MonthIndex(i32);

impl MonthIndex {
    pub fn from_ym(year: i32, month: u32) -> Self {
        Self(year * 12 + month as i32 - 1)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_ym(date.year(), date.month())
    }

    pub fn year(self) -> i32 {
        self.0.div_euclid(12)
    }

    /// Calendar month, 1-12.
    pub fn month(self) -> u32 {
        (self.0.rem_euclid(12) + 1) as u32
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Step back `months`, clamped at month zero.
    pub fn saturating_back(self, months: u32) -> Self {
        Self((self.0 - months as i32).max(0))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

/// One calendar month of manually entered funnel numbers for one account.
///
/// `inquiries`/`calls_booked`/`calls_taken` have no other source and are
/// always read verbatim. `closes`/`bookings`/`cash` are superseded by values
/// derived from bookings and payments unless the matching manual flag is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelRecord {
    pub id: Uuid,
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    pub inquiries: u64,
    pub calls_booked: u64,
    pub calls_taken: u64,
    pub closes: u64,
    /// Booked revenue in minor currency units.
    pub bookings: i64,
    /// Collected cash in minor currency units.
    pub cash: i64,
    #[serde(default)]
    pub closes_manual: bool,
    #[serde(default)]
    pub bookings_manual: bool,
    #[serde(default)]
    pub cash_manual: bool,
}

impl FunnelRecord {
    pub fn month_index(&self) -> MonthIndex {
        MonthIndex::from_ym(self.year, self.month)
    }
}

/// A closed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub service_type_id: Uuid,
    pub lead_source_id: Uuid,
    pub date_booked: Option<NaiveDate>,
    /// Minor currency units.
    pub booked_revenue: i64,
}

/// A scheduled or received cash event tied to a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub expected_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    /// Minor currency units.
    pub amount: i64,
}

impl Payment {
    /// Date used for month bucketing: expected, then due, then payment.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.expected_date.or(self.due_date).or(self.payment_date)
    }
}

/// Service classification. Only bookings whose service type tracks in the
/// funnel contribute to close/revenue reconciliation and attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: Uuid,
    pub name: String,
    pub tracks_in_funnel: bool,
}

/// One (lead source, year, month) advertising spend record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCampaign {
    pub id: Uuid,
    pub lead_source_id: Uuid,
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Minor currency units.
    pub spend: i64,
    pub leads_generated: u64,
    /// Synthetic rows inserted by the ingest path; excluded from attribution.
    #[serde(default)]
    pub placeholder: bool,
}

impl AdCampaign {
    pub fn month_index(&self) -> MonthIndex {
        MonthIndex::from_ym(self.year, self.month)
    }
}

/// Lead classification referenced by bookings and ad campaigns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSource {
    pub id: Uuid,
    pub name: String,
}

/// Everything the data-access layer supplies for one account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(default)]
    pub funnel_records: Vec<FunnelRecord>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub service_types: Vec<ServiceType>,
    #[serde(default)]
    pub lead_sources: Vec<LeadSource>,
    #[serde(default)]
    pub ad_campaigns: Vec<AdCampaign>,
}
