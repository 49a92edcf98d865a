//! Router tests that never reach the database.
//!
//! The pool is created lazily and no test issues a query: every request here
//! is answered by routing, id parsing or form validation.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::util::ServiceExt; // for `oneshot`
use uuid::Uuid;

use gigbook_server::clock::FixedClock;
use gigbook_server::{create_routes, AppState};

fn setup_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/gigbook_unused")
        .expect("lazy pool");
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    create_routes(AppState::with_clock(pool, FixedClock(now)))
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn health_check_ok_with_security_headers() {
    let response = setup_app().oneshot(request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn index_lists_sections() {
    let response = setup_app().oneshot(request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["data"]["sections"][0], "/venues");
}

#[tokio::test]
async fn unknown_path_is_404_page() {
    let response = setup_app()
        .oneshot(request("GET", "/stages"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn wrong_method_is_405_page() {
    let response = setup_app()
        .oneshot(request("PUT", "/venues"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn malformed_ids_are_404_on_every_entity_route() {
    let cases = [
        ("GET", "/venues/1"),
        ("GET", "/venues/1/edit"),
        ("DELETE", "/venues/1"),
        ("GET", "/artists/abc"),
        ("GET", "/artists/abc/edit"),
        ("DELETE", "/artists/abc"),
    ];

    for (method, uri) in cases {
        let response = setup_app().oneshot(request(method, uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn create_venue_form_offers_choices() {
    let response = setup_app()
        .oneshot(request("GET", "/venues/create"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let genres = body["data"]["genres"].as_array().unwrap();
    assert!(genres.iter().any(|g| g == "Jazz"));
    assert_eq!(body["data"]["states"].as_array().unwrap().len(), 51);
}

#[tokio::test]
async fn create_show_form_defaults_to_clock() {
    let response = setup_app()
        .oneshot(request("GET", "/shows/create"))
        .await
        .unwrap();

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["data"]["start_time"], "2024-06-01 12:00:00");
}

#[tokio::test]
async fn invalid_venue_is_rejected_before_saving() {
    let response = setup_app()
        .oneshot(form_request(
            "/venues/create",
            "name=&address=1015+Folsom+Street&city=San+Francisco&state=CA&genres=Jazz",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "name cannot be empty");
}

#[tokio::test]
async fn invalid_artist_update_is_rejected_before_saving() {
    let uri = format!("/artists/{}/edit", Uuid::new_v4());
    let response = setup_app()
        .oneshot(form_request(
            &uri,
            "name=Guns+N+Petals&city=San+Francisco&state=CA&phone=12345&genres=Rock+n+Roll",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn show_with_malformed_reference_is_rejected() {
    let body = format!(
        "venue_id=1&artist_id={}&start_time=2035-04-01+20%3A00%3A00",
        Uuid::new_v4()
    );
    let response = setup_app()
        .oneshot(form_request("/shows/create", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn form_post_without_content_type_is_422_page() {
    let response = setup_app()
        .oneshot(request("POST", "/artists/create"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
}
