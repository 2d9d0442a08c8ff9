use super::*;
use uuid::Uuid;

fn user(name: Option<&str>) -> SessionUser {
    SessionUser { id: Uuid::nil(), email: "grace@navy.mil".into(), name: name.map(str::to_owned) }
}

#[test]
fn default_profile_mirrors_session_user() {
    let profile = default_profile(&user(Some("Grace Hopper")));
    assert_eq!(profile.email, "grace@navy.mil");
    assert_eq!(profile.full_name.as_deref(), Some("Grace Hopper"));
    assert!(profile.avatar_url.is_none());
    assert!(profile.updated_at.is_none());
    assert_eq!(profile.notifications, NotificationSettings::default());
}

#[test]
fn view_derives_initials_from_name_then_email() {
    assert_eq!(ProfileView::new(default_profile(&user(Some("Grace Hopper")))).initials, "GH");
    assert_eq!(ProfileView::new(default_profile(&user(None))).initials, "G");
}

#[test]
fn view_serializes_flat() {
    let view = ProfileView::new(default_profile(&user(Some("Grace Hopper"))));
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["email"], "grace@navy.mil");
    assert_eq!(json["initials"], "GH");
    assert_eq!(json["notifications"]["lead_notifications"], false);
    assert_eq!(json["notifications"]["weekly_reports"], true);
    assert!(json.get("profile").is_none());
}

#[test]
fn profile_update_ignores_email_field() {
    let update: ProfileUpdate =
        serde_json::from_str(r#"{"full_name":"G. Hopper","email":"other@x.io","avatar_url":null}"#).unwrap();
    assert_eq!(update.full_name.as_deref(), Some("G. Hopper"));
    assert!(update.avatar_url.is_none());
}

// =============================================================================
// LIVE DATABASE
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn profile_upserts_keep_session_email() {
    use crate::services::test_db::{integration_pool, seed_user};

    let pool = integration_pool().await;
    let id = seed_user(&pool).await;
    let session_user = SessionUser { id, email: format!("{id}@test.leadboard"), name: None };

    let before = get_profile(&pool, &session_user).await.expect("get should succeed");
    assert!(before.profile.updated_at.is_none());

    let saved = update_profile(
        &pool,
        &session_user,
        ProfileUpdate { full_name: Some("Ada Lovelace".into()), avatar_url: None },
    )
    .await
    .expect("update should succeed");
    assert_eq!(saved.profile.email, session_user.email);
    assert_eq!(saved.initials, "AL");

    let flags = NotificationSettings { weekly_reports: false, ..NotificationSettings::default() };
    let saved = update_notifications(&pool, &session_user, flags).await.expect("update should succeed");
    assert!(!saved.profile.notifications.weekly_reports);
    assert_eq!(saved.profile.full_name.as_deref(), Some("Ada Lovelace"));
}
