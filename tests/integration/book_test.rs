//! Integration tests for the book catalog.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_list_books_is_public() {
    let app = TestApp::new().await;
    app.create_test_book("Dune", "9780441172719", 3).await;

    let response = app.request("GET", "/api/books", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response
        .body
        .pointer("/data/items")
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_search_matches_title_and_author() {
    let app = TestApp::new().await;
    app.create_test_book("Dune", "9780441172719", 1).await;
    app.create_test_book("Neuromancer", "9780441569595", 1).await;

    let response = app
        .request("GET", "/api/books?search=dune", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response
        .body
        .pointer("/data/items")
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].get("title").and_then(|v| v.as_str()),
        Some("Dune")
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_create_book_requires_staff() {
    let app = TestApp::new().await;
    app.create_test_user("member@example.com", "password123", "user")
        .await;
    app.create_test_user("staff@example.com", "password123", "librarian")
        .await;

    let body = serde_json::json!({
        "title": "The Dispossessed",
        "author": "Ursula K. Le Guin",
        "isbn": "9780061054884",
        "total_copies": 2,
    });

    let anonymous = app
        .request("POST", "/api/books", Some(body.clone()), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let member_token = app.login("member@example.com", "password123").await;
    let forbidden = app
        .request("POST", "/api/books", Some(body.clone()), Some(&member_token))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let staff_token = app.login("staff@example.com", "password123").await;
    let created = app
        .request("POST", "/api/books", Some(body), Some(&staff_token))
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(
        created.body.pointer("/data/available_copies").and_then(|v| v.as_i64()),
        Some(2)
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_duplicate_isbn_conflict() {
    let app = TestApp::new().await;
    app.create_test_user("staff2@example.com", "password123", "librarian")
        .await;
    app.create_test_book("Dune", "9780441172719", 1).await;
    let token = app.login("staff2@example.com", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/books",
            Some(serde_json::json!({
                "title": "Dune (reissue)",
                "author": "Frank Herbert",
                "isbn": "9780441172719",
                "total_copies": 1,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_update_total_copies_adjusts_availability() {
    let app = TestApp::new().await;
    app.create_test_user("staff3@example.com", "password123", "admin")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 2).await;
    let token = app.login("staff3@example.com", "password123").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/books/{}", book_id),
            Some(serde_json::json!({ "total_copies": 5 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(
        response.body.pointer("/data/total_copies").and_then(|v| v.as_i64()),
        Some(5)
    );
    assert_eq!(
        response.body.pointer("/data/available_copies").and_then(|v| v.as_i64()),
        Some(5)
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_get_book_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/books/00000000-0000-0000-0000-999999999999",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_delete_book_admin_only() {
    let app = TestApp::new().await;
    app.create_test_user("shelver@example.com", "password123", "librarian")
        .await;
    app.create_test_user("chief@example.com", "password123", "admin")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 1).await;

    // Librarians manage the catalog but may not remove titles.
    let librarian_token = app.login("shelver@example.com", "password123").await;
    let forbidden = app
        .request(
            "DELETE",
            &format!("/api/books/{}", book_id),
            None,
            Some(&librarian_token),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let admin_token = app.login("chief@example.com", "password123").await;
    let deleted = app
        .request(
            "DELETE",
            &format!("/api/books/{}", book_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK, "{:?}", deleted.body);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_cannot_reduce_copies_below_outstanding_loans() {
    let app = TestApp::new().await;
    app.create_test_user("reader@example.com", "password123", "user")
        .await;
    app.create_test_user("curator@example.com", "password123", "admin")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 2).await;

    let reader_token = app.login("reader@example.com", "password123").await;
    for _ in 0..2 {
        let loan = app
            .request(
                "POST",
                "/api/loans",
                Some(serde_json::json!({ "book_id": book_id })),
                Some(&reader_token),
            )
            .await;
        assert_eq!(loan.status, StatusCode::OK, "{:?}", loan.body);
    }

    // Both copies are out; shrinking the stock to one would drive
    // availability negative.
    let admin_token = app.login("curator@example.com", "password123").await;
    let response = app
        .request(
            "PUT",
            &format!("/api/books/{}", book_id),
            Some(serde_json::json!({ "total_copies": 1 })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT, "{:?}", response.body);

    let (total, available): (i32, i32) =
        sqlx::query_as("SELECT total_copies, available_copies FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(total, 2);
    assert_eq!(available, 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (config/test.toml)"]
async fn test_delete_book_with_loans_conflicts() {
    let app = TestApp::new().await;
    app.create_test_user("borrower@example.com", "password123", "user")
        .await;
    app.create_test_user("admin@example.com", "password123", "admin")
        .await;
    let book_id = app.create_test_book("Dune", "9780441172719", 1).await;

    let borrower_token = app.login("borrower@example.com", "password123").await;
    let loan = app
        .request(
            "POST",
            "/api/loans",
            Some(serde_json::json!({ "book_id": book_id })),
            Some(&borrower_token),
        )
        .await;
    assert_eq!(loan.status, StatusCode::OK, "{:?}", loan.body);

    let admin_token = app.login("admin@example.com", "password123").await;
    let response = app
        .request(
            "DELETE",
            &format!("/api/books/{}", book_id),
            None,
            Some(&admin_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}
