//! End-to-end flow: a realistic account dataset through range resolution,
//! reconciliation, metrics, attribution, and forecasting.

use chrono::NaiveDate;
use revpulse_core::types::{
    AccountData, AdCampaign, Booking, FunnelRecord, LeadSource, Payment, ServiceType,
};
use revpulse_core::{AppConfig, MonthIndex};
use revpulse_engine::{build_snapshot, GoalPacing, RangeSelector};
use uuid::Uuid;

/// A coaching business with five months of 2024 data: manual funnel entry,
/// live bookings/payments, two lead sources, one advertised.
fn sample_account() -> AccountData {
    let coaching = ServiceType {
        id: Uuid::new_v4(),
        name: "1:1 Coaching".to_string(),
        tracks_in_funnel: true,
    };
    let merch = ServiceType {
        id: Uuid::new_v4(),
        name: "Merch".to_string(),
        tracks_in_funnel: false,
    };
    let referral = LeadSource {
        id: Uuid::new_v4(),
        name: "Referral".to_string(),
    };
    let instagram = LeadSource {
        id: Uuid::new_v4(),
        name: "Instagram".to_string(),
    };

    let mut funnel_records = Vec::new();
    for (month, inquiries, calls_booked, calls_taken) in
        [(1u32, 31u64, 16u64, 14u64), (2, 24, 12, 10), (3, 40, 22, 18), (4, 18, 9, 7), (5, 27, 14, 12)]
    {
        funnel_records.push(FunnelRecord {
            id: Uuid::new_v4(),
            year: 2024,
            month,
            inquiries,
            calls_booked,
            calls_taken,
            closes: 0,
            bookings: 0,
            cash: 0,
            closes_manual: false,
            bookings_manual: false,
            cash_manual: false,
        });
    }
    // February was corrected by hand after a refund dispute.
    funnel_records[1].closes = 2;
    funnel_records[1].closes_manual = true;

    let booking = |source: &LeadSource, service: &ServiceType, month: u32, day: u32, revenue: i64| Booking {
        id: Uuid::new_v4(),
        service_type_id: service.id,
        lead_source_id: source.id,
        date_booked: NaiveDate::from_ymd_opt(2024, month, day),
        booked_revenue: revenue,
    };

    let bookings = vec![
        booking(&referral, &coaching, 1, 9, 500_000),
        booking(&referral, &coaching, 1, 23, 450_000),
        booking(&instagram, &coaching, 2, 4, 480_000),
        booking(&instagram, &coaching, 2, 18, 520_000),
        booking(&instagram, &coaching, 2, 27, 500_000),
        booking(&referral, &coaching, 3, 11, 610_000),
        booking(&instagram, &coaching, 4, 2, 475_000),
        booking(&instagram, &coaching, 5, 15, 530_000),
        // merch sale: never enters funnel math
        booking(&referral, &merch, 3, 20, 90_000),
        // data-entry miss: no date, silently skipped
        Booking {
            id: Uuid::new_v4(),
            service_type_id: coaching.id,
            lead_source_id: referral.id,
            date_booked: None,
            booked_revenue: 999_999,
        },
    ];

    let payments = vec![
        Payment {
            id: Uuid::new_v4(),
            expected_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            due_date: None,
            payment_date: None,
            amount: 250_000,
        },
        Payment {
            id: Uuid::new_v4(),
            expected_date: None,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            payment_date: NaiveDate::from_ymd_opt(2024, 3, 7),
            amount: 250_000,
        },
    ];

    let ad_campaigns = vec![
        AdCampaign {
            id: Uuid::new_v4(),
            lead_source_id: instagram.id,
            year: 2024,
            month: 2,
            spend: 120_000,
            leads_generated: 45,
            placeholder: false,
        },
        AdCampaign {
            id: Uuid::new_v4(),
            lead_source_id: instagram.id,
            year: 2024,
            month: 4,
            spend: 95_000,
            leads_generated: 30,
            placeholder: false,
        },
        // import artifact: same key as the February row
        AdCampaign {
            id: Uuid::new_v4(),
            lead_source_id: instagram.id,
            year: 2024,
            month: 2,
            spend: 777_777,
            leads_generated: 1,
            placeholder: false,
        },
    ];

    AccountData {
        funnel_records,
        bookings,
        payments,
        service_types: vec![coaching, merch],
        lead_sources: vec![referral, instagram],
        ad_campaigns,
    }
}

#[test]
fn test_full_year_snapshot() {
    let data = sample_account();
    let now = MonthIndex::from_ym(2024, 6);
    let mut config = AppConfig::default();
    config.goal.annual_revenue_target = 80_000_000;

    let snapshot = build_snapshot(&data, &RangeSelector::CurrentYear, now, &config);

    // Full-year mode: 12 rows even though only 5 months have records.
    assert_eq!(snapshot.rows.len(), 12);

    // January: two live bookings, no overrides.
    let jan = &snapshot.rows[0];
    assert_eq!(jan.inquiries, 31);
    assert_eq!(jan.closes, 2);
    assert_eq!(jan.bookings, 950_000);

    // February: manual close count wins, revenue stays dynamic, and the
    // expected-date payment lands here.
    let feb = &snapshot.rows[1];
    assert_eq!(feb.closes, 2);
    assert_eq!(feb.bookings, 1_500_000);
    assert_eq!(feb.cash, 250_000);

    // March cash uses the due date, not the payment date.
    assert_eq!(snapshot.rows[2].cash, 250_000);

    // The merch sale and the dateless booking are invisible to the funnel.
    assert_eq!(snapshot.metrics.totals.closes, 2 + 2 + 1 + 1 + 1);
    assert_eq!(snapshot.metrics.totals.bookings, 4_065_000);
    assert_eq!(snapshot.metrics.months_with_data, 5);

    // Attribution: Instagram is the only advertised source, and the
    // duplicate February campaign is ignored.
    assert_eq!(snapshot.advertising.total_ad_spend, 215_000);
    assert_eq!(snapshot.advertising.closes_from_ads, 5);
    assert_eq!(snapshot.advertising.total_booked_from_ads, 2_505_000);
    let roi = snapshot.advertising.overall_roi.expect("spend and revenue");
    assert!((roi - 2_505_000.0 / 215_000.0).abs() < 1e-9);

    let by_count = &snapshot.lead_sources.by_count;
    assert_eq!(by_count[0].name, "Instagram");
    assert_eq!(by_count[0].count, 5);
    assert_eq!(by_count[1].name, "Referral");
    assert_eq!(by_count[1].count, 3);
    let pct_sum: u64 = by_count.iter().map(|s| s.pct_count).sum();
    assert!((99..=101).contains(&pct_sum));

    // Forecast: six months forward from June.
    assert_eq!(snapshot.forecast.months.len(), 6);
    assert_eq!(snapshot.forecast.months[0].month, 7);
    assert_eq!(snapshot.forecast.months[5].month, 12);
    assert_eq!(
        snapshot.forecast.totals.bookings,
        6 * snapshot.forecast.months[0].bookings
    );

    // Goal: 4.065M of 80M by June is behind pace.
    let goal = snapshot.goal.expect("goal configured");
    assert_eq!(goal.achieved, 4_065_000);
    assert_eq!(goal.status, GoalPacing::Behind);
}

#[test]
fn test_sliding_window_snapshot() {
    let data = sample_account();
    let now = MonthIndex::from_ym(2024, 4);
    let config = AppConfig::default();

    let snapshot = build_snapshot(&data, &RangeSelector::PastMonths(3), now, &config);

    // Window mode materializes only stored months in [Feb, Apr].
    let months: Vec<u32> = snapshot.rows.iter().map(|r| r.month).collect();
    assert_eq!(months, vec![2, 3, 4]);

    // January bookings fall outside the window.
    assert_eq!(snapshot.metrics.totals.bookings, 1_500_000 + 610_000 + 475_000);
    assert_eq!(snapshot.metrics.months_with_data, 3);
}

#[test]
fn test_empty_account_never_panics() {
    let data = AccountData::default();
    let now = MonthIndex::from_ym(2024, 6);
    let config = AppConfig::default();

    for selector in [
        RangeSelector::CurrentYear,
        RangeSelector::PastMonths(6),
        RangeSelector::Year(2020),
        RangeSelector::AllTime,
    ] {
        let snapshot = build_snapshot(&data, &selector, now, &config);
        assert_eq!(snapshot.metrics.totals.bookings, 0);
        assert_eq!(snapshot.metrics.rates.inquiry_to_close, "0.0");
        assert_eq!(snapshot.advertising.overall_roi, None);
        assert!(snapshot.goal.is_none());
    }
}

#[test]
fn test_snapshot_serializes_for_the_presentation_layer() {
    let data = sample_account();
    let now = MonthIndex::from_ym(2024, 6);
    let config = AppConfig::default();

    let snapshot = build_snapshot(&data, &RangeSelector::CurrentYear, now, &config);
    let json = serde_json::to_value(&snapshot).unwrap();

    assert!(json["rows"].as_array().unwrap().len() == 12);
    assert!(json["metrics"]["rates"]["inquiry_to_close"].is_string());
    assert!(json["advertising"]["overall_roi"].is_number());
}
