use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use booktrack::config::Config;
use booktrack::db;
use booktrack::infrastructure::AppState;
use booktrack::server;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

const BOUNDARY: &str = "booktrack-test-boundary";

async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    server::build_router(AppState::new(db), &Config::default())
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn read_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn book_payload(title: &str) -> Value {
    json!({
        "title": title,
        "author": "Frank Herbert",
        "isbn": "9783161484100",
        "genre": "Science Fiction",
        "availableCopies": 3
    })
}

// Build a multipart body by hand: text fields first, then an optional image part
fn multipart_body(fields: &[(&str, &str)], image: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cover.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn update_fields<'a>(title: &'a str, copies: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("title", title),
        ("author", "Frank Herbert"),
        ("isbn", "9783161484100"),
        ("genre", "Science Fiction"),
        ("availableCopies", copies),
    ]
}

fn put_multipart(id: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .uri(format!("/updateBook/{}", id))
        .method("PUT")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn add_book(app: &Router, payload: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri("/addBook")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

async fn create_book(app: &Router, title: &str) -> String {
    let (status, body) = add_book(app, book_payload(title)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book added successfully!");
    body["book"]["_id"].as_str().unwrap().to_string()
}

async fn get_book(app: &Router, id: &str) -> axum::response::Response {
    let req = Request::builder()
        .uri(format!("/books/{}", id))
        .method("GET")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app().await;
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["service"], "booktrack");
}

#[tokio::test]
async fn test_get_book_by_id() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let response = get_book(&app, &id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["_id"], id.as_str());
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["availableCopies"], 3);
    assert!(body.get("image").is_none());
}

#[tokio::test]
async fn test_get_book_invalid_id_format() {
    let app = setup_app().await;

    let response = get_book(&app, "invalid-id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_text(response).await, "Invalid book ID format");
}

#[tokio::test]
async fn test_get_book_not_found() {
    let app = setup_app().await;

    let response = get_book(&app, "9b2f4c1e-3a5d-4e6f-8a7b-1c2d3e4f5a6b").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_text(response).await, "Book not found");
}

#[tokio::test]
async fn test_update_book_with_image_then_without_keeps_image() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let body = multipart_body(&update_fields("Dune Messiah", "2"), Some(b"jpeg-bytes"));
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Book updated successfully!");
    assert_eq!(body["book"]["title"], "Dune Messiah");
    assert_eq!(body["book"]["image"], "anBlZy1ieXRlcw==");

    // No image part: stored image untouched
    let body = multipart_body(&update_fields("Dune Messiah", "5"), None);
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["book"]["availableCopies"], 5);
    assert_eq!(body["book"]["image"], "anBlZy1ieXRlcw==");

    let stored = read_json(get_book(&app, &id).await).await;
    assert_eq!(stored["image"], "anBlZy1ieXRlcw==");
    assert_eq!(stored["availableCopies"], 5);
}

#[tokio::test]
async fn test_update_book_accepts_zero_copies() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let body = multipart_body(&update_fields("Dune", "0"), None);
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["book"]["availableCopies"], 0);
}

#[tokio::test]
async fn test_update_book_negative_copies_rejected() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let body = multipart_body(&update_fields("Dune", "-1"), None);
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Available copies should be more that 0");
}

#[tokio::test]
async fn test_update_book_malformed_copies_rejected() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let body = multipart_body(&update_fields("Dune", "three"), None);
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Available copies must be a whole number.");
}

#[tokio::test]
async fn test_update_book_title_and_author_limits() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let long_title = "a".repeat(101);
    let body = multipart_body(&update_fields(&long_title, "1"), None);
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Title must be 100 characters or fewer.");

    // Exactly 100 characters is fine
    let max_title = "b".repeat(100);
    let body = multipart_body(&update_fields(&max_title, "1"), None);
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let long_author = "c".repeat(151);
    let fields = vec![
        ("title", "Dune"),
        ("author", long_author.as_str()),
        ("isbn", "9783161484100"),
        ("genre", "Science Fiction"),
        ("availableCopies", "1"),
    ];
    let response = app
        .clone()
        .oneshot(put_multipart(&id, multipart_body(&fields, None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Author name must be 150 characters or fewer.");
}

#[tokio::test]
async fn test_update_book_invalid_isbn_rejected() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let fields = vec![
        ("title", "Dune"),
        ("author", "Frank Herbert"),
        ("isbn", "1234567890"),
        ("genre", "Science Fiction"),
        ("availableCopies", "1"),
    ];
    let response = app
        .clone()
        .oneshot(put_multipart(&id, multipart_body(&fields, None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        "Invalid ISBN. Please enter a valid ISBN-10 or ISBN-13."
    );
}

#[tokio::test]
async fn test_update_book_missing_field_rejected() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let fields = vec![("title", "Dune"), ("author", "Frank Herbert")];
    let response = app
        .clone()
        .oneshot(put_multipart(&id, multipart_body(&fields, None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Missing required field: availableCopies.");
}

#[tokio::test]
async fn test_update_book_duplicate_title_rejected() {
    let app = setup_app().await;
    let dune = create_book(&app, "Dune").await;
    create_book(&app, "Hyperion").await;

    let body = multipart_body(&update_fields("Hyperion", "1"), None);
    let response = app.clone().oneshot(put_multipart(&dune, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Title already exists.");

    // Keeping its own title is not a conflict
    let body = multipart_body(&update_fields("Dune", "1"), None);
    let response = app.clone().oneshot(put_multipart(&dune, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_book_not_found() {
    let app = setup_app().await;

    let body = multipart_body(&update_fields("Dune", "1"), None);
    let response = app
        .clone()
        .oneshot(put_multipart("9b2f4c1e-3a5d-4e6f-8a7b-1c2d3e4f5a6b", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn test_update_book_image_size_boundary() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;
    let limit = 16 * 1024 * 1024;

    let too_large = vec![0u8; limit + 1];
    let body = multipart_body(&update_fields("Dune", "1"), Some(&too_large));
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Image size should not exceed 16MB.");

    let exact = vec![0u8; limit];
    let body = multipart_body(&update_fields("Dune", "1"), Some(&exact));
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_book_image_beyond_body_limit_rejected() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    // Larger than the 32 MiB default request limit
    let huge = vec![0u8; 33 * 1024 * 1024];
    let body = multipart_body(&update_fields("Dune", "1"), Some(&huge));
    let response = app.clone().oneshot(put_multipart(&id, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Image size should not exceed 16MB.");

    let stored = read_json(get_book(&app, &id).await).await;
    assert!(stored.get("image").is_none());
}

#[tokio::test]
async fn test_update_book_accepts_uppercase_id() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;
    let upper = id.to_uppercase();

    let response = get_book(&app, &upper).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = multipart_body(&update_fields("Dune", "7"), None);
    let response = app.clone().oneshot(put_multipart(&upper, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["book"]["_id"], id.as_str());
    assert_eq!(body["book"]["availableCopies"], 7);
}

#[tokio::test]
async fn test_update_book_accepts_json_body() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let req = Request::builder()
        .uri(format!("/updateBook/{}", id))
        .method("PUT")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(book_payload("Children of Dune").to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["book"]["title"], "Children of Dune");
}

#[tokio::test]
async fn test_add_book_duplicate_title_rejected() {
    let app = setup_app().await;
    create_book(&app, "Dune").await;

    let (status, body) = add_book(&app, book_payload("Dune")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title already exists.");
}

#[tokio::test]
async fn test_list_and_search_books() {
    let app = setup_app().await;
    create_book(&app, "Neuromancer").await;
    create_book(&app, "Dune").await;

    let req = Request::builder()
        .uri("/books")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune", "Neuromancer"]);

    let req = Request::builder()
        .uri("/search?query=neuro")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Neuromancer");
}

async fn post_transaction(app: &Router, payload: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri("/addTransaction")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

#[tokio::test]
async fn test_borrow_and_return_adjust_copies() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let (status, body) = post_transaction(
        &app,
        json!({ "bookId": id, "borrowerName": "Alice", "transactionType": "borrow" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Transaction recorded successfully!");
    assert_eq!(body["transaction"]["transactionType"], "borrow");

    let stored = read_json(get_book(&app, &id).await).await;
    assert_eq!(stored["availableCopies"], 2);

    let (status, _) = post_transaction(
        &app,
        json!({ "bookId": id, "borrowerName": "Alice", "transactionType": "return" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let stored = read_json(get_book(&app, &id).await).await;
    assert_eq!(stored["availableCopies"], 3);

    let req = Request::builder()
        .uri(format!("/transactions?bookId={}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_borrow_without_copies_rejected() {
    let app = setup_app().await;
    let mut payload = book_payload("Dune");
    payload["availableCopies"] = json!(0);
    let (status, body) = add_book(&app, payload).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["book"]["_id"].as_str().unwrap().to_string();

    let (status, body) = post_transaction(
        &app,
        json!({ "bookId": id, "borrowerName": "Bob", "transactionType": "borrow" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No copies available to borrow.");

    let stored = read_json(get_book(&app, &id).await).await;
    assert_eq!(stored["availableCopies"], 0);
}

#[tokio::test]
async fn test_transaction_for_unknown_book() {
    let app = setup_app().await;

    let (status, body) = post_transaction(
        &app,
        json!({
            "bookId": "9b2f4c1e-3a5d-4e6f-8a7b-1c2d3e4f5a6b",
            "borrowerName": "Bob",
            "transactionType": "return"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn test_transaction_invalid_type_rejected() {
    let app = setup_app().await;
    let id = create_book(&app, "Dune").await;

    let (status, body) = post_transaction(
        &app,
        json!({ "bookId": id, "borrowerName": "Bob", "transactionType": "steal" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Transaction type must be 'borrow' or 'return'.");
}
