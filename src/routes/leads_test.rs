use super::*;

fn query(search: Option<&str>, status: Option<&str>) -> LeadListQuery {
    LeadListQuery { offset: None, search: search.map(str::to_owned), status: status.map(str::to_owned) }
}

#[test]
fn missing_params_give_noop_filter() {
    let filter = lead_filter(&LeadListQuery::default()).unwrap();
    assert!(filter.is_noop());
}

#[test]
fn all_status_is_unrestricted() {
    let filter = lead_filter(&query(None, Some("all"))).unwrap();
    assert_eq!(filter.status(), StatusFilter::All);
}

#[test]
fn known_status_restricts() {
    let filter = lead_filter(&query(Some("acme"), Some("qualified"))).unwrap();
    assert_eq!(filter.status(), StatusFilter::Only(LeadStatus::Qualified));
    assert!(!filter.is_noop());
}

#[test]
fn unknown_status_is_bad_request() {
    assert_eq!(lead_filter(&query(None, Some("archived"))).unwrap_err(), StatusCode::BAD_REQUEST);
}

#[test]
fn lead_error_status_mapping() {
    assert_eq!(lead_error_to_status(LeadError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(lead_error_to_status(LeadError::Invalid("name is required".into())), StatusCode::BAD_REQUEST);
    assert_eq!(
        lead_error_to_status(LeadError::Database(sqlx::Error::RowNotFound)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn status_body_reads_raw_text() {
    let body: StatusBody = serde_json::from_str(r#"{"status":"contacted"}"#).unwrap();
    assert_eq!(LeadStatus::parse(&body.status), Some(LeadStatus::Contacted));
}
