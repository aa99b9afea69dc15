//! Integration tests for loans: borrowing, returning, and visibility.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_borrow_decrements_availability() {
    let app = TestApp::new().await;
    app.create_test_user("reader@example.com", "password123", "user")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 2).await;
    let token = app.login("reader@example.com", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(
        response.body.pointer("/data/status").and_then(|v| v.as_str()),
        Some("active")
    );

    let available: i32 =
        sqlx::query_scalar("SELECT available_copies FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(available, 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_borrow_last_copy_then_conflict() {
    let app = TestApp::new().await;
    app.create_test_user("reader2@example.com", "password123", "user")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 1).await;
    let token = app.login("reader2@example.com", "password123").await;

    let first = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_member_cannot_borrow_for_someone_else() {
    let app = TestApp::new().await;
    app.create_test_user("member2@example.com", "password123", "user")
        .await;
    let other_id = app
        .create_test_user("victim@example.com", "password123", "user")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 1).await;
    let token = app.login("member2@example.com", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({ "book_id": book_id, "user_id": other_id })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_librarian_borrows_on_behalf_of_member() {
    let app = TestApp::new().await;
    let member_id = app
        .create_test_user("member3@example.com", "password123", "user")
        .await;
    app.create_test_user("librarian@example.com", "password123", "librarian")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 1).await;
    let token = app.login("librarian@example.com", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({ "book_id": book_id, "user_id": member_id })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(
        response.body.pointer("/data/user_id").and_then(|v| v.as_str()),
        Some(member_id.to_string().as_str())
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_due_date_in_past_rejected_and_copy_restored() {
    let app = TestApp::new().await;
    app.create_test_user("reader3@example.com", "password123", "user")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 1).await;
    let token = app.login("reader3@example.com", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({
                "book_id": book_id,
                "due_at": "2020-01-01T00:00:00Z",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let available: i32 =
        sqlx::query_scalar("SELECT available_copies FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(available, 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_return_restores_availability_and_is_idempotent_conflict() {
    let app = TestApp::new().await;
    app.create_test_user("reader4@example.com", "password123", "user")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 1).await;
    let token = app.login("reader4@example.com", "password123").await;

    let loan = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&token),
        )
        .await;
    let loan_id = loan
        .body
        .pointer("/data/id")
        .and_then(|v| v.as_str())
        .unwrap()
        .to_string();

    let returned = app
        .request(
            "PUT",
            &format!("/api/loans/{}/return", loan_id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(returned.status, StatusCode::OK, "{:?}", returned.body);
    assert_eq!(
        returned.body.pointer("/data/status").and_then(|v| v.as_str()),
        Some("returned")
    );

    let available: i32 =
        sqlx::query_scalar("SELECT available_copies FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(available, 1);

    // A second return attempt conflicts instead of incrementing again.
    let again = app
        .request(
            "PUT",
            &format!("/api/loans/{}/return", loan_id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_members_see_only_their_own_loans() {
    let app = TestApp::new().await;
    app.create_test_user("alice@example.com", "password123", "user")
        .await;
    app.create_test_user("bob@example.com", "password123", "user")
        .await;
    let book_a = app.create_test_book("Dune", "9780441172719", 1).await;
    let book_b = app.create_test_book("Neuromancer", "9780441569595", 1).await;

    let alice_token = app.login("alice@example.com", "password123").await;
    let bob_token = app.login("bob@example.com", "password123").await;

    app.request(
        "POST",
        "/api/loans",
        Some(serde_json::json!({ "book_id": book_a })),
        Some(&alice_token),
    )
    .await;
    app.request(
        "POST",
        "/api/loans",
        Some(serde_json::json!({ "book_id": book_b })),
        Some(&bob_token),
    )
    .await;

    let response = app
        .request("GET", "/api/loans", None, Some(&alice_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response
        .body
        .pointer("/data/items")
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(items.len(), 1, "member must not see other members' loans");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_stats_staff_only() {
    let app = TestApp::new().await;
    app.create_test_user("member4@example.com", "password123", "user")
        .await;
    app.create_test_user("librarian2@example.com", "password123", "librarian")
        .await;

    let member_token = app.login("member4@example.com", "password123").await;
    let forbidden = app
        .request("GET", "/api/loans/stats", None, Some(&member_token))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let staff_token = app.login("librarian2@example.com", "password123").await;
    let stats = app
        .request("GET", "/api/loans/stats", None, Some(&staff_token))
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    assert!(stats.body.pointer("/data/total").is_some());
    assert!(stats.body.pointer("/data/overdue").is_some());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_delete_loan_admin_only_and_after_return() {
    let app = TestApp::new().await;
    app.create_test_user("member5@example.com", "password123", "user")
        .await;
    app.create_test_user("librarian3@example.com", "password123", "librarian")
        .await;
    app.create_test_user("admin6@example.com", "password123", "admin")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 1).await;

    let member_token = app.login("member5@example.com", "password123").await;
    let loan = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&member_token),
        )
        .await;
    let loan_id = loan
        .body
        .pointer("/data/id")
        .and_then(|v| v.as_str())
        .unwrap()
        .to_string();

    // Librarians may manage loans but not erase them.
    let librarian_token = app.login("librarian3@example.com", "password123").await;
    let forbidden = app
        .request(
            "DELETE",
            &format!("/api/loans/{}", loan_id),
            None,
            Some(&librarian_token),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    // Still out on loan, so even an admin cannot delete it yet.
    let admin_token = app.login("admin6@example.com", "password123").await;
    let active = app
        .request(
            "DELETE",
            &format!("/api/loans/{}", loan_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(active.status, StatusCode::CONFLICT);

    app.request(
        "PUT",
        &format!("/api/loans/{}/return", loan_id),
        None,
        Some(&member_token),
    )
    .await;

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/loans/{}", loan_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK, "{:?}", deleted.body);
}
