use super::*;
use time::OffsetDateTime;

fn new_lead(name: &str, email: &str) -> NewLead {
    NewLead { name: name.into(), email: email.into(), ..NewLead::default() }
}

fn sample_leads(n: usize) -> Vec<Lead> {
    let now = OffsetDateTime::now_utc();
    (0..n)
        .map(|i| Lead {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: format!("Lead {i}"),
            email: format!("lead{i}@example.com"),
            company: None,
            position: None,
            phone: None,
            linkedin_url: None,
            source: None,
            notes: None,
            status: LeadStatus::New,
            score: 0,
            last_contacted: None,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

// =============================================================================
// is_email_shaped
// =============================================================================

#[test]
fn email_shape_accepts_local_at_domain() {
    for email in ["ada@example.com", "a.b+tag@sub.example.io", "x@localhost"] {
        assert!(is_email_shaped(email), "expected valid: {email}");
    }
}

#[test]
fn email_shape_rejects_malformed() {
    for email in ["", "ada", "@example.com", "ada@", "a@b@c", "ada lovelace@example.com", "ada@.com", "ada@example."] {
        assert!(!is_email_shaped(email), "expected invalid: {email:?}");
    }
}

// =============================================================================
// NewLead / LeadPatch validation
// =============================================================================

#[test]
fn new_lead_requires_name_and_email() {
    assert!(new_lead("Ada", "ada@example.com").validate().is_ok());
    assert!(matches!(new_lead("", "ada@example.com").validate(), Err(LeadError::Invalid(_))));
    assert!(matches!(new_lead("   ", "ada@example.com").validate(), Err(LeadError::Invalid(_))));
    assert!(matches!(new_lead("Ada", "").validate(), Err(LeadError::Invalid(_))));
    assert!(matches!(new_lead("Ada", "not-an-email").validate(), Err(LeadError::Invalid(_))));
}

#[test]
fn new_lead_email_is_trimmed_before_shape_check() {
    assert!(new_lead("Ada", "  ada@example.com ").validate().is_ok());
}

#[test]
fn new_lead_deserializes_with_optional_fields_missing() {
    let lead: NewLead = serde_json::from_str(r#"{"name":"Ada","email":"ada@example.com","company":""}"#).unwrap();
    assert_eq!(lead.company.as_deref(), Some(""));
    assert!(lead.status.is_none());
    assert!(lead.score.is_none());
}

#[test]
fn new_lead_rejects_unknown_status_at_parse_time() {
    let parsed: Result<NewLead, _> = serde_json::from_str(r#"{"name":"Ada","email":"a@b.io","status":"archived"}"#);
    assert!(parsed.is_err());
}

#[test]
fn empty_patch_is_valid() {
    assert!(LeadPatch::default().validate().is_ok());
}

#[test]
fn patch_validates_only_present_fields() {
    let patch = LeadPatch { company: Some(String::new()), ..LeadPatch::default() };
    assert!(patch.validate().is_ok());

    let patch = LeadPatch { name: Some(" ".into()), ..LeadPatch::default() };
    assert!(matches!(patch.validate(), Err(LeadError::Invalid(_))));

    let patch = LeadPatch { email: Some("nope".into()), ..LeadPatch::default() };
    assert!(matches!(patch.validate(), Err(LeadError::Invalid(_))));
}

// =============================================================================
// paging
// =============================================================================

#[test]
fn full_page_reports_more() {
    let page = page_from(sample_leads(50), 0);
    assert!(page.has_more);
    assert_eq!(page.next_offset, 50);
}

#[test]
fn partial_page_is_the_end() {
    let page = page_from(sample_leads(7), 50);
    assert!(!page.has_more);
    assert_eq!(page.next_offset, 57);
}

#[test]
fn empty_page_keeps_offset() {
    let page = page_from(Vec::new(), 100);
    assert!(!page.has_more);
    assert_eq!(page.next_offset, 100);
    assert!(page.leads.is_empty());
}

#[test]
fn lead_error_display() {
    let id = Uuid::nil();
    assert_eq!(LeadError::NotFound(id).to_string(), format!("lead not found: {id}"));
    assert_eq!(LeadError::Invalid("name is required".into()).to_string(), "invalid lead: name is required");
}

// =============================================================================
// LIVE DATABASE
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn lead_create_list_and_status_round_trip() {
    use crate::services::test_db::{integration_pool, seed_user};

    let pool = integration_pool().await;
    let user_id = seed_user(&pool).await;

    let created = create_lead(&pool, user_id, new_lead("Ada Lovelace", "ada@example.com"))
        .await
        .expect("create_lead should succeed");
    assert_eq!(created.status, LeadStatus::New);
    assert!(created.last_contacted.is_none());

    let page = list_leads(&pool, user_id, 0).await.expect("list_leads should succeed");
    assert_eq!(page.leads.len(), 1);
    assert!(!page.has_more);

    let contacted = update_lead_status(&pool, user_id, created.id, LeadStatus::Contacted)
        .await
        .expect("status update should succeed");
    assert_eq!(contacted.status, LeadStatus::Contacted);
    assert!(contacted.last_contacted.is_some());

    let qualified = update_lead_status(&pool, user_id, created.id, LeadStatus::Qualified)
        .await
        .expect("status update should succeed");
    assert_eq!(qualified.last_contacted, contacted.last_contacted);

    let other_user = seed_user(&pool).await;
    let hidden = get_lead(&pool, other_user, created.id).await;
    assert!(matches!(hidden, Err(LeadError::NotFound(_))));
    assert_eq!(count_leads(&pool, user_id).await.expect("count should succeed"), 1);
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn lead_pages_are_contiguous() {
    use crate::services::test_db::{integration_pool, seed_user};

    let pool = integration_pool().await;
    let user_id = seed_user(&pool).await;
    for i in 0..55 {
        create_lead(&pool, user_id, new_lead(&format!("Lead {i}"), &format!("l{i}@x.io")))
            .await
            .expect("create_lead should succeed");
    }

    let first = list_leads(&pool, user_id, 0).await.expect("first page");
    assert_eq!(first.leads.len(), 50);
    assert!(first.has_more);

    let second = list_leads(&pool, user_id, first.next_offset).await.expect("second page");
    assert_eq!(second.leads.len(), 5);
    assert!(!second.has_more);
    assert!(second.leads.iter().all(|l| first.leads.iter().all(|f| f.id != l.id)));
}
