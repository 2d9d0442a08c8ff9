use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn dev_user_id_is_stable() {
    assert_eq!(DEV_USER_ID.to_string(), "00000000-0000-0000-0000-00000000f00d");
}

#[test]
fn session_user_serializes_optional_name() {
    let user = SessionUser { id: Uuid::nil(), email: "ada@example.com".into(), name: None };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["email"], "ada@example.com");
    assert!(json["name"].is_null());
}

// =============================================================================
// LIVE DATABASE
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn dev_session_validates_then_revokes() {
    let pool = crate::services::test_db::integration_pool().await;

    let (user, token) = create_dev_session(&pool)
        .await
        .expect("dev session should be created");
    assert_eq!(user.id, DEV_USER_ID);

    let validated = validate_session(&pool, &token)
        .await
        .expect("validate should succeed")
        .expect("session should exist");
    assert_eq!(validated.email, DEV_USER_EMAIL);

    delete_session(&pool, &token).await.expect("delete should succeed");
    let gone = validate_session(&pool, &token).await.expect("validate should succeed");
    assert!(gone.is_none());
}
