//! Tests for the HTTP transport module

use super::client::decode_listing;
use super::*;
use crate::error::{Error, ErrorKind};
use crate::pagination::{ListingTransport, PageRequest, PageResponse};
use crate::types::User;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpListingClient {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .no_rate_limit()
        .build();
    HttpListingClient::with_config(format!("{}/users/list", server.uri()), config).unwrap()
}

fn user(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "username": format!("user{id}"),
        "first_name": "Ada",
        "last_name": "Lovelace",
        "type": "admin",
        "email": format!("user{id}@example.com")
    })
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("solidafy-pager/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .rate_limit(RateLimiterConfig::new(2, 4))
        .header("X-Tenant", "acme")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 4)));
    assert_eq!(
        config.default_headers.get("X-Tenant"),
        Some(&"acme".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_decode_listing_success() {
    let body = r#"{"users": [1, 2, 3], "next_cursor": 3}"#;
    let page: PageResponse<u64> = decode_listing(StatusCode::OK, body).unwrap();
    assert_eq!(page, PageResponse::new(vec![1, 2, 3], Some(3)));
}

#[test]
fn test_decode_listing_null_and_missing_cursor() {
    let page: PageResponse<u64> =
        decode_listing(StatusCode::OK, r#"{"users": [], "next_cursor": null}"#).unwrap();
    assert!(!page.has_more());

    let page: PageResponse<u64> = decode_listing(StatusCode::OK, r#"{"users": [7]}"#).unwrap();
    assert_eq!(page.items, vec![7]);
    assert!(!page.has_more());
}

#[test]
fn test_decode_listing_message_wins_over_status() {
    let err = decode_listing::<u64>(StatusCode::OK, r#"{"message": "database offline"}"#)
        .unwrap_err();
    assert!(matches!(err, Error::Application { ref message } if message == "database offline"));

    let err = decode_listing::<u64>(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message": "database offline"}"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApplicationError);
}

#[test]
fn test_decode_listing_empty_message_is_ignored() {
    let page: PageResponse<u64> =
        decode_listing(StatusCode::OK, r#"{"message": "", "users": [1]}"#).unwrap();
    assert_eq!(page.items, vec![1]);
}

#[test]
fn test_decode_listing_bad_status() {
    let err = decode_listing::<u64>(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
    assert_eq!(err.kind(), ErrorKind::NetworkError);
}

#[test]
fn test_decode_listing_malformed_body() {
    let err = decode_listing::<u64>(StatusCode::OK, "<html>").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));

    let err = decode_listing::<u64>(StatusCode::OK, r#"{"items": []}"#).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert_eq!(err.kind(), ErrorKind::NetworkError);
}

#[tokio::test]
async fn test_fetch_page_sends_wire_body_and_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/list"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_json(json!({"limit": 2, "last_seen_id": 0, "search": "ada"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [user(1), user(2)],
            "next_cursor": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page: PageResponse<User> = client
        .fetch(&PageRequest::first(2, "ada"), "token-1")
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, 1);
    assert_eq!(page.items[0].user_type, "admin");
    assert_eq!(page.next_cursor, Some(2));
}

#[tokio::test]
async fn test_fetch_page_continues_from_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({"limit": 20, "last_seen_id": 20, "search": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [user(21)],
            "next_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = PageRequest {
        cursor: Some(20),
        limit: 20,
        search_term: String::new(),
    };
    let page = ListingTransport::<User>::fetch_page(&client, &request, "token-1")
        .await
        .unwrap();

    assert_eq!(page.items[0].username, "user21");
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_fetch_page_401_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .fetch::<User>(&PageRequest::first(20, ""), "stale")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
}

#[tokio::test]
async fn test_fetch_page_application_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "search too broad"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .fetch::<User>(&PageRequest::first(20, "a"), "token-1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApplicationError);
    assert!(err.to_string().contains("search too broad"));
}

#[tokio::test]
async fn test_fetch_page_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .fetch::<User>(&PageRequest::first(20, ""), "token-1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, ref body } if body == "maintenance"));
}

#[tokio::test]
async fn test_fetch_page_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"users": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .timeout(Duration::from_millis(100))
        .build();
    let client =
        HttpListingClient::with_config(format!("{}/users/list", server.uri()), config).unwrap();

    let err = client
        .fetch::<User>(&PageRequest::first(20, ""), "token-1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 100 }));
}

#[tokio::test]
async fn test_fetch_page_connection_refused() {
    let client = HttpListingClient::new("http://127.0.0.1:9/users/list").unwrap();
    let err = client
        .fetch::<User>(&PageRequest::first(20, ""), "token-1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkError);
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-tenant", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder().header("X-Tenant", "acme").build();
    let client =
        HttpListingClient::with_config(format!("{}/users/list", server.uri()), config).unwrap();

    let page = client
        .fetch::<User>(&PageRequest::first(20, ""), "token-1")
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_rate_limited_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .expect(2)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .rate_limit(RateLimiterConfig::new(100, 2))
        .build();
    let client =
        HttpListingClient::with_config(format!("{}/users/list", server.uri()), config).unwrap();
    assert!(client.has_rate_limiter());

    for _ in 0..2 {
        client
            .fetch::<User>(&PageRequest::first(20, ""), "token-1")
            .await
            .unwrap();
    }
}
