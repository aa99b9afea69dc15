//! Integration tests for user accounts and role enforcement.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_list_users_admin_only() {
    let app = TestApp::new().await;
    app.create_test_user("member@example.com", "password123", "user")
        .await;
    app.create_test_user("librarian@example.com", "password123", "librarian")
        .await;
    app.create_test_user("admin@example.com", "password123", "admin")
        .await;

    let member_token = app.login("member@example.com", "password123").await;
    let member = app.request("GET", "/api/users", None, Some(&member_token)).await;
    assert_eq!(member.status, StatusCode::FORBIDDEN);

    // Librarians are not admins; the list stays closed to them.
    let librarian_token = app.login("librarian@example.com", "password123").await;
    let librarian = app
        .request("GET", "/api/users", None, Some(&librarian_token))
        .await;
    assert_eq!(librarian.status, StatusCode::FORBIDDEN);

    let admin_token = app.login("admin@example.com", "password123").await;
    let admin = app.request("GET", "/api/users", None, Some(&admin_token)).await;
    assert_eq!(admin.status, StatusCode::OK);
    let items = admin
        .body
        .pointer("/data/items")
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_member_reads_own_profile_not_others() {
    let app = TestApp::new().await;
    let own_id = app
        .create_test_user("self@example.com", "password123", "user")
        .await;
    let other_id = app
        .create_test_user("other@example.com", "password123", "user")
        .await;
    let token = app.login("self@example.com", "password123").await;

    let own = app
        .request("GET", &format!("/api/users/{}", own_id), None, Some(&token))
        .await;
    assert_eq!(own.status, StatusCode::OK);

    let other = app
        .request("GET", &format!("/api/users/{}", other_id), None, Some(&token))
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_member_cannot_grant_themselves_a_role() {
    let app = TestApp::new().await;
    let id = app
        .create_test_user("climber@example.com", "password123", "user")
        .await;
    let token = app.login("climber@example.com", "password123").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}", id),
            Some(serde_json::json!({ "role": "admin" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_admin_unlocks_account() {
    let app = TestApp::new().await;
    let locked_id = app
        .create_test_user("locked@example.com", "password123", "user")
        .await;
    app.create_test_user("admin2@example.com", "password123", "admin")
        .await;

    sqlx::query("UPDATE users SET locked = TRUE, failed_login_attempts = 4 WHERE id = $1")
        .bind(locked_id)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let admin_token = app.login("admin2@example.com", "password123").await;
    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}", locked_id),
            Some(serde_json::json!({ "unlock": true })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(
        response.body.pointer("/data/locked").and_then(|v| v.as_bool()),
        Some(false)
    );

    // The account can sign in again.
    app.login("locked@example.com", "password123").await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_change_password_requires_current_password() {
    let app = TestApp::new().await;
    let id = app
        .create_test_user("pwchange@example.com", "password123", "user")
        .await;
    let token = app.login("pwchange@example.com", "password123").await;

    let wrong = app
        .request(
            "PUT",
            &format!("/api/users/{}/password", id),
            Some(serde_json::json!({
                "current_password": "not-my-password",
                "new_password": "newpassword1",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let ok = app
        .request(
            "PUT",
            &format!("/api/users/{}/password", id),
            Some(serde_json::json!({
                "current_password": "password123",
                "new_password": "newpassword1",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK, "{:?}", ok.body);

    app.login("pwchange@example.com", "newpassword1").await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_admin_cannot_change_another_users_password() {
    let app = TestApp::new().await;
    let member_id = app
        .create_test_user("target@example.com", "password123", "user")
        .await;
    app.create_test_user("admin3@example.com", "password123", "admin")
        .await;
    let admin_token = app.login("admin3@example.com", "password123").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}/password", member_id),
            Some(serde_json::json!({
                "current_password": "password123",
                "new_password": "hijacked1",
            })),
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_delete_user_closes_their_sessions() {
    let app = TestApp::new().await;
    let member_id = app
        .create_test_user("doomed@example.com", "password123", "user")
        .await;
    app.create_test_user("admin4@example.com", "password123", "admin")
        .await;

    let member_token = app.login("doomed@example.com", "password123").await;
    let admin_token = app.login("admin4@example.com", "password123").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/users/{}", member_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let me = app
        .request("GET", "/api/auth/me", None, Some(&member_token))
        .await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_admin_cannot_delete_own_account() {
    let app = TestApp::new().await;
    let admin_id = app
        .create_test_user("admin5@example.com", "password123", "admin")
        .await;
    let token = app.login("admin5@example.com", "password123").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/users/{}", admin_id),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_admin_creates_account_with_chosen_role() {
    let app = TestApp::new().await;
    app.create_test_user("member6@example.com", "password123", "user")
        .await;
    app.create_test_user("admin7@example.com", "password123", "admin")
        .await;

    let body = serde_json::json!({
        "name": "Nora",
        "surname": "Quist",
        "email": "nora@example.com",
        "password": "password123",
        "role": "librarian",
    });

    let member_token = app.login("member6@example.com", "password123").await;
    let forbidden = app
        .request("POST", "/api/users", Some(body.clone()), Some(&member_token))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let admin_token = app.login("admin7@example.com", "password123").await;
    let created = app
        .request("POST", "/api/users", Some(body), Some(&admin_token))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(
        created.body.pointer("/data/role").and_then(|v| v.as_str()),
        Some("librarian")
    );

    // The new account is live and can sign in.
    app.login("nora@example.com", "password123").await;
}
