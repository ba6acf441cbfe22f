//! In-memory account store — the data-access collaborator that hands record
//! arrays to the engine and accepts write-backs for manual funnel edits.
//!
//! The engine never touches this crate; callers snapshot an account and pass
//! the arrays in.

use dashmap::DashMap;
use revpulse_core::types::{
    AccountData, AdCampaign, Booking, FunnelRecord, LeadSource, Payment, ServiceType,
};
use revpulse_core::{PulseError, PulseResult};
use tracing::debug;
use uuid::Uuid;

/// Concurrent store of per-account record sets.
pub struct AccountStore {
    accounts: DashMap<Uuid, AccountData>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    pub fn create_account(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.accounts.insert(id, AccountData::default());
        debug!(account = %id, "account created");
        id
    }

    /// Register an account with pre-loaded data, replacing any existing set.
    pub fn insert_account(&self, id: Uuid, data: AccountData) {
        self.accounts.insert(id, data);
    }

    /// Snapshot an account's records.
    pub fn account(&self, id: &Uuid) -> PulseResult<AccountData> {
        self.accounts
            .get(id)
            .map(|a| a.clone())
            .ok_or_else(|| PulseError::Store(format!("unknown account {id}")))
    }

    /// Insert or replace the funnel record for the record's (year, month).
    /// Keeps the one-record-per-month invariant the reconciler relies on.
    pub fn upsert_funnel_record(&self, account: &Uuid, record: FunnelRecord) -> PulseResult<()> {
        let mut data = self.account_mut(account)?;
        data.funnel_records
            .retain(|r| !(r.year == record.year && r.month == record.month));
        data.funnel_records.push(record);
        Ok(())
    }

    /// Manual override write-back: `Some(value)` stores the value and raises
    /// the flag, `None` clears the flag so the derived value wins again.
    pub fn override_closes(
        &self,
        account: &Uuid,
        year: i32,
        month: u32,
        value: Option<u64>,
    ) -> PulseResult<()> {
        self.with_record(account, year, month, |record| match value {
            Some(v) => {
                record.closes = v;
                record.closes_manual = true;
            }
            None => record.closes_manual = false,
        })
    }

    pub fn override_bookings(
        &self,
        account: &Uuid,
        year: i32,
        month: u32,
        value: Option<i64>,
    ) -> PulseResult<()> {
        self.with_record(account, year, month, |record| match value {
            Some(v) => {
                record.bookings = v;
                record.bookings_manual = true;
            }
            None => record.bookings_manual = false,
        })
    }

    pub fn override_cash(
        &self,
        account: &Uuid,
        year: i32,
        month: u32,
        value: Option<i64>,
    ) -> PulseResult<()> {
        self.with_record(account, year, month, |record| match value {
            Some(v) => {
                record.cash = v;
                record.cash_manual = true;
            }
            None => record.cash_manual = false,
        })
    }

    pub fn add_booking(&self, account: &Uuid, booking: Booking) -> PulseResult<()> {
        self.account_mut(account)?.bookings.push(booking);
        Ok(())
    }

    pub fn add_payment(&self, account: &Uuid, payment: Payment) -> PulseResult<()> {
        self.account_mut(account)?.payments.push(payment);
        Ok(())
    }

    pub fn add_service_type(&self, account: &Uuid, service_type: ServiceType) -> PulseResult<()> {
        self.account_mut(account)?.service_types.push(service_type);
        Ok(())
    }

    pub fn add_lead_source(&self, account: &Uuid, lead_source: LeadSource) -> PulseResult<()> {
        self.account_mut(account)?.lead_sources.push(lead_source);
        Ok(())
    }

    pub fn add_ad_campaign(&self, account: &Uuid, campaign: AdCampaign) -> PulseResult<()> {
        self.account_mut(account)?.ad_campaigns.push(campaign);
        Ok(())
    }

    fn account_mut(
        &self,
        id: &Uuid,
    ) -> PulseResult<dashmap::mapref::one::RefMut<'_, Uuid, AccountData>> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| PulseError::Store(format!("unknown account {id}")))
    }

    fn with_record(
        &self,
        account: &Uuid,
        year: i32,
        month: u32,
        apply: impl FnOnce(&mut FunnelRecord),
    ) -> PulseResult<()> {
        let mut data = self.account_mut(account)?;
        let record = data
            .funnel_records
            .iter_mut()
            .find(|r| r.year == year && r.month == month)
            .ok_or_else(|| {
                PulseError::Store(format!("no funnel record for {year}-{month:02}"))
            })?;
        apply(record);
        Ok(())
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
