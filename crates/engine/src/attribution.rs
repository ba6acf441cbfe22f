//! Source attribution — groups bookings and ad spend by lead source within a
//! range and computes share-of-total and return-on-spend figures.

use std::collections::{HashMap, HashSet};

use revpulse_core::types::{AdCampaign, Booking, LeadSource, ServiceType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timerange::ResolvedRange;

/// One lead source's share of in-range, funnel-tracked bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSourceStat {
    pub lead_source_id: Uuid,
    pub name: String,
    pub count: u64,
    /// Minor currency units.
    pub revenue: i64,
    /// Rounded whole percent of total count; 0 when total is 0.
    pub pct_count: u64,
    /// Rounded whole percent of total revenue; 0 when total is 0.
    pub pct_revenue: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadSourceBreakdown {
    /// Count-descending; ties keep input encounter order.
    pub by_count: Vec<LeadSourceStat>,
    /// Revenue-descending; ties keep input encounter order.
    pub by_revenue: Vec<LeadSourceStat>,
    pub total_count: u64,
    /// Minor currency units.
    pub total_revenue: i64,
}

/// Advertising spend attribution for a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdAttribution {
    /// Minor currency units, over deduplicated non-placeholder campaigns.
    pub total_ad_spend: i64,
    /// Count of in-range bookings from advertised lead sources.
    pub closes_from_ads: u64,
    /// Minor currency units.
    pub total_booked_from_ads: i64,
    /// Booked revenue / spend. `None` when either side is zero — callers
    /// render that as "N/A", never NaN.
    pub overall_roi: Option<f64>,
    /// Minor currency units; 0 when there are no closes from ads.
    pub cost_per_close: i64,
}

/// Group in-range funnel-tracked bookings by lead source.
pub fn lead_source_breakdown(
    bookings: &[Booking],
    service_types: &[ServiceType],
    lead_sources: &[LeadSource],
    range: &ResolvedRange,
) -> LeadSourceBreakdown {
    let names: HashMap<Uuid, &str> = lead_sources
        .iter()
        .map(|l| (l.id, l.name.as_str()))
        .collect();

    // Encounter-ordered accumulation so percentage ties stay stable.
    let mut stats: Vec<LeadSourceStat> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for booking in in_range_tracked(bookings, service_types, range) {
        let slot = *index.entry(booking.lead_source_id).or_insert_with(|| {
            stats.push(LeadSourceStat {
                lead_source_id: booking.lead_source_id,
                name: names
                    .get(&booking.lead_source_id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
                count: 0,
                revenue: 0,
                pct_count: 0,
                pct_revenue: 0,
            });
            stats.len() - 1
        });
        stats[slot].count += 1;
        stats[slot].revenue += booking.booked_revenue;
    }

    let total_count: u64 = stats.iter().map(|s| s.count).sum();
    let total_revenue: i64 = stats.iter().map(|s| s.revenue).sum();

    for stat in &mut stats {
        stat.pct_count = share(stat.count as i64, total_count as i64);
        stat.pct_revenue = share(stat.revenue, total_revenue);
    }

    let mut by_count = stats.clone();
    by_count.sort_by(|a, b| b.count.cmp(&a.count));
    let mut by_revenue = stats;
    by_revenue.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    LeadSourceBreakdown {
        by_count,
        by_revenue,
        total_count,
        total_revenue,
    }
}

/// Attribute in-range bookings to advertising spend.
///
/// Campaign rows are deduplicated by (lead source, year, month) with the
/// first occurrence winning; placeholder rows never participate.
pub fn ad_attribution(
    campaigns: &[AdCampaign],
    bookings: &[Booking],
    service_types: &[ServiceType],
    range: &ResolvedRange,
) -> AdAttribution {
    let mut seen: HashSet<(Uuid, i32, u32)> = HashSet::new();
    let mut total_ad_spend: i64 = 0;
    let mut advertised: HashSet<Uuid> = HashSet::new();

    for campaign in campaigns {
        if campaign.placeholder {
            continue;
        }
        if !seen.insert((campaign.lead_source_id, campaign.year, campaign.month)) {
            continue;
        }
        if !range.contains(campaign.month_index()) {
            continue;
        }
        total_ad_spend += campaign.spend;
        advertised.insert(campaign.lead_source_id);
    }

    let mut closes_from_ads: u64 = 0;
    let mut total_booked_from_ads: i64 = 0;
    for booking in in_range_tracked(bookings, service_types, range) {
        if advertised.contains(&booking.lead_source_id) {
            closes_from_ads += 1;
            total_booked_from_ads += booking.booked_revenue;
        }
    }

    let overall_roi = if total_ad_spend > 0 && total_booked_from_ads > 0 {
        Some(total_booked_from_ads as f64 / total_ad_spend as f64)
    } else {
        None
    };
    let cost_per_close = if closes_from_ads > 0 {
        (total_ad_spend as f64 / closes_from_ads as f64).round() as i64
    } else {
        0
    };

    AdAttribution {
        total_ad_spend,
        closes_from_ads,
        total_booked_from_ads,
        overall_roi,
        cost_per_close,
    }
}

fn in_range_tracked<'a>(
    bookings: &'a [Booking],
    service_types: &[ServiceType],
    range: &'a ResolvedRange,
) -> impl Iterator<Item = &'a Booking> {
    let tracked: HashSet<Uuid> = service_types
        .iter()
        .filter(|s| s.tracks_in_funnel)
        .map(|s| s.id)
        .collect();

    bookings.iter().filter(move |b| {
        tracked.contains(&b.service_type_id)
            && b.date_booked.is_some_and(|d| range.contains_date(d))
    })
}

fn share(part: i64, total: i64) -> u64 {
    if total <= 0 || part <= 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u64
}
