use super::*;
use crate::model::{CampaignStatus, test_helpers};
use time::macros::{datetime, offset};

fn lead_at(at: OffsetDateTime, status: LeadStatus) -> Lead {
    test_helpers::lead("L", "l@x.io", None, status, at)
}

#[test]
fn month_key_formats_and_labels() {
    let key = MonthKey::of(datetime!(2024-03-15 10:00 UTC));
    assert_eq!(key, MonthKey { year: 2024, month: 3 });
    assert_eq!(key.to_string(), "2024-03");
    assert_eq!(key.label(), "Mar 2024");
}

#[test]
fn month_key_uses_utc_month() {
    // 23:30 on Jan 31 at -05:00 is already February in UTC.
    let key = MonthKey::of(datetime!(2024-01-31 23:30).assume_offset(offset!(-5)));
    assert_eq!(key.to_string(), "2024-02");
}

#[test]
fn month_keys_order_across_years() {
    let dec = MonthKey { year: 2023, month: 12 };
    let jan = MonthKey { year: 2024, month: 1 };
    assert!(dec < jan);
}

#[test]
fn empty_input_yields_no_buckets() {
    assert!(bucket_leads(&[]).is_empty());
    assert!(bucket_campaigns(&[]).is_empty());
}

#[test]
fn lead_buckets_count_statuses() {
    let leads = vec![
        lead_at(datetime!(2024-02-01 00:00 UTC), LeadStatus::New),
        lead_at(datetime!(2024-02-10 00:00 UTC), LeadStatus::Contacted),
        lead_at(datetime!(2024-02-20 00:00 UTC), LeadStatus::Qualified),
        lead_at(datetime!(2024-02-28 00:00 UTC), LeadStatus::Converted),
        lead_at(datetime!(2024-03-01 00:00 UTC), LeadStatus::Lost),
    ];

    let buckets = bucket_leads(&leads);
    assert_eq!(buckets.len(), 2);

    let feb = &buckets[0];
    assert_eq!(feb.key, "2024-02");
    assert_eq!(feb.month, "Feb 2024");
    assert_eq!((feb.leads, feb.new, feb.contacted, feb.converted), (4, 1, 1, 1));

    let mar = &buckets[1];
    assert_eq!(mar.key, "2024-03");
    assert_eq!((mar.leads, mar.new, mar.contacted, mar.converted), (1, 0, 0, 0));
}

#[test]
fn more_than_six_months_keeps_the_six_most_recent_in_ascending_order() {
    // Newest first, spanning Sep 2023 .. Apr 2024 (8 months), as the list
    // query returns them.
    let mut leads = Vec::new();
    for (year, month) in [(2024, 4), (2024, 3), (2024, 2), (2024, 1), (2023, 12), (2023, 11), (2023, 10), (2023, 9)] {
        let date = time::Date::from_calendar_date(year, time::Month::try_from(month).unwrap(), 5).unwrap();
        leads.push(lead_at(date.midnight().assume_utc(), LeadStatus::New));
    }

    let buckets = bucket_leads(&leads);
    let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["2023-11", "2023-12", "2024-01", "2024-02", "2024-03", "2024-04"]);
}

#[test]
fn ordering_is_chronological_not_alphabetical_by_label() {
    // "Apr 2024" < "Jan 2024" alphabetically; the keys must still sort Jan first.
    let leads = vec![
        lead_at(datetime!(2024-04-01 00:00 UTC), LeadStatus::New),
        lead_at(datetime!(2024-01-01 00:00 UTC), LeadStatus::New),
    ];
    let labels: Vec<String> = bucket_leads(&leads).into_iter().map(|b| b.month).collect();
    assert_eq!(labels, vec!["Jan 2024".to_owned(), "Apr 2024".to_owned()]);
}

#[test]
fn campaign_buckets_sum_counters() {
    let campaigns = vec![
        test_helpers::campaign_with_counts(CampaignStatus::Active, datetime!(2024-05-02 00:00 UTC), [10, 8, 3, 1]),
        test_helpers::campaign_with_counts(CampaignStatus::Paused, datetime!(2024-05-20 00:00 UTC), [6, 4, 2, 2]),
        test_helpers::campaign_with_counts(CampaignStatus::Draft, datetime!(2024-06-01 00:00 UTC), [0, 0, 0, 0]),
    ];

    let buckets = bucket_campaigns(&campaigns);
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].key, "2024-05");
    assert_eq!(buckets[0].campaigns, 2);
    assert_eq!(buckets[0].contacted, 12);
    assert_eq!(buckets[0].responses, 5);
    assert_eq!(buckets[0].conversions, 3);
    assert_eq!(buckets[1].month, "Jun 2024");
    assert_eq!(buckets[1].campaigns, 1);
}
