use super::*;

#[test]
fn login_request_reads_body_sent_by_client() {
    let body = serde_json::to_string(&LoginRequest {
        email: "ops@example.test".into(),
        password: "secret".into(),
    })
    .unwrap();
    assert_eq!(body, r#"{"email":"ops@example.test","password":"secret"}"#);

    let parsed: LoginRequest = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed.email, "ops@example.test");
}

#[test]
fn user_created_at_is_optional() {
    let user: User =
        serde_json::from_str(r#"{"id":"u1","email":"a@b.test","role":"admin"}"#).unwrap();
    assert_eq!(user.created_at, None);

    let user: User = serde_json::from_str(
        r#"{"id":"u1","email":"a@b.test","role":"admin","createdAt":"2025-11-01T10:00:00Z"}"#,
    )
    .unwrap();
    assert!(user.created_at.is_some());
}
