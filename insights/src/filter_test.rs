use super::*;
use crate::model::test_helpers;
use time::macros::datetime;

fn sample_leads() -> Vec<Lead> {
    let at = datetime!(2024-04-01 12:00 UTC);
    vec![
        test_helpers::lead("Ada Lovelace", "ada@analytical.io", Some("Analytical Engines"), LeadStatus::New, at),
        test_helpers::lead("Grace Hopper", "grace@navy.mil", None, LeadStatus::Contacted, at),
        test_helpers::lead("Alan Turing", "alan@bletchley.uk", Some("Bletchley"), LeadStatus::Qualified, at),
        test_helpers::lead("Linus", "linus@kernel.org", Some("Linux Foundation"), LeadStatus::Converted, at),
        test_helpers::lead("Barbara Liskov", "liskov@mit.edu", Some("MIT"), LeadStatus::Lost, at),
        test_helpers::lead("Ken", "ken@bell-labs.com", None, LeadStatus::New, at),
    ]
}

fn names(leads: &[Lead]) -> Vec<&str> {
    leads.iter().map(|l| l.name.as_str()).collect()
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn empty_search_with_all_status_returns_input_unchanged() {
    let leads = sample_leads();
    let filtered = ListFilter::new("", StatusFilter::All).apply(leads.clone());
    assert_eq!(filtered, leads);
}

#[test]
fn search_is_case_insensitive_across_name_email_and_company() {
    let leads = sample_leads();

    let by_name = ListFilter::new("HOPPER", StatusFilter::All).apply(leads.clone());
    assert_eq!(names(&by_name), vec!["Grace Hopper"]);

    let by_email = ListFilter::new("kernel.ORG", StatusFilter::All).apply(leads.clone());
    assert_eq!(names(&by_email), vec!["Linus"]);

    let by_company = ListFilter::new("bletch", StatusFilter::All).apply(leads);
    assert_eq!(names(&by_company), vec!["Alan Turing"]);
}

#[test]
fn search_skips_missing_company_without_matching() {
    let leads = sample_leads();
    let filtered = ListFilter::new("none", StatusFilter::All).apply(leads);
    assert!(filtered.is_empty());
}

#[test]
fn search_preserves_original_order() {
    let leads = sample_leads();
    let filtered = ListFilter::new("a", StatusFilter::All).apply(leads);
    assert_eq!(
        names(&filtered),
        vec!["Ada Lovelace", "Grace Hopper", "Alan Turing", "Linus", "Barbara Liskov", "Ken"]
    );
}

#[test]
fn campaign_search_covers_name_and_description_only() {
    let at = datetime!(2024-04-01 12:00 UTC);
    let campaigns = vec![
        test_helpers::campaign("Spring outbound", Some("Founders in fintech"), CampaignStatus::Active, at),
        test_helpers::campaign("Reactivation", None, CampaignStatus::Draft, at),
    ];

    let hits = ListFilter::new("FINTECH", StatusFilter::All).apply(campaigns.clone());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Spring outbound");

    let by_type = ListFilter::new("email", StatusFilter::All).apply(campaigns);
    assert!(by_type.is_empty());
}

// =============================================================================
// Status
// =============================================================================

#[test]
fn status_filter_keeps_only_matching_status() {
    let leads = sample_leads();
    let only_new = ListFilter::new("", StatusFilter::Only(LeadStatus::New)).apply(leads);
    assert_eq!(names(&only_new), vec!["Ada Lovelace", "Ken"]);
    assert!(only_new.iter().all(|l| l.status == LeadStatus::New));
}

#[test]
fn status_filters_partition_the_input() {
    let leads = sample_leads();
    let mut total = 0;
    let mut seen = std::collections::HashSet::new();

    for status in LeadStatus::ALL {
        let part = ListFilter::new("", StatusFilter::Only(status)).apply(leads.clone());
        assert!(part.iter().all(|l| l.status == status));
        total += part.len();
        for lead in part {
            assert!(seen.insert(lead.id), "lead appeared in two partitions");
        }
    }

    assert_eq!(total, leads.len());
    assert_eq!(ListFilter::new("", StatusFilter::All).apply(leads.clone()).len(), leads.len());
}

#[test]
fn search_and_status_combine_with_and() {
    let leads = sample_leads();
    let filtered = ListFilter::new("ada", StatusFilter::Only(LeadStatus::New)).apply(leads);
    assert_eq!(names(&filtered), vec!["Ada Lovelace"]);
}

#[test]
fn status_filter_parse_accepts_all_blank_and_known_values() {
    assert_eq!(StatusFilter::parse(None, LeadStatus::parse), Some(StatusFilter::All));
    assert_eq!(StatusFilter::parse(Some(""), LeadStatus::parse), Some(StatusFilter::All));
    assert_eq!(StatusFilter::parse(Some("all"), LeadStatus::parse), Some(StatusFilter::All));
    assert_eq!(
        StatusFilter::parse(Some("lost"), LeadStatus::parse),
        Some(StatusFilter::Only(LeadStatus::Lost))
    );
    assert_eq!(StatusFilter::parse(Some("paused"), LeadStatus::parse), None);
    assert_eq!(
        StatusFilter::parse(Some("paused"), CampaignStatus::parse),
        Some(StatusFilter::Only(CampaignStatus::Paused))
    );
}

#[test]
fn noop_filter_detection() {
    assert!(ListFilter::<LeadStatus>::default().is_noop());
    assert!(!ListFilter::new("x", StatusFilter::<LeadStatus>::All).is_noop());
    assert!(!ListFilter::new("", StatusFilter::Only(LeadStatus::New)).is_noop());
}
