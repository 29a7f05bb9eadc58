//! HTTP collaborators against a mock API.

use serde_json::json;
use std::time::Duration;
use storefront_auth::{Credentials, Role};
use storefront_commerce::search::FilterSpec;
use storefront_commerce::{Money, ProductId};
use storefront_data::{
    AuthClient, BackoffStrategy, CatalogLoader, CatalogOrigin, CategorySource, FetchClient,
    FetchError, FetchPolicy, HttpProductSource, ProductSource, RetryPolicy, TimeoutConfig,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_policy(attempts: u32) -> FetchPolicy {
    FetchPolicy::new(
        TimeoutConfig::from_total(Duration::from_secs(2)),
        RetryPolicy::new(attempts).with_backoff(BackoffStrategy::None),
    )
}

fn products_source(server: &MockServer, attempts: u32) -> HttpProductSource {
    let client = FetchClient::new(server.uri(), fast_policy(attempts)).unwrap();
    HttpProductSource::new(client)
}

fn sample_products() -> serde_json::Value {
    json!([
        {"_id": "p1", "name": "Desk Lamp", "price": 24.5, "category": "home", "stock": 3},
        {"id": 2, "title": "Headphones", "price": "89.99", "category": "audio", "inStock": true},
        {"id": 3, "name": "Broken", "price": -1}
    ])
}

#[tokio::test]
async fn test_fetches_bare_array_with_filter_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("category", "home"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_products()))
        .expect(1)
        .mount(&server)
        .await;

    let spec = FilterSpec::new().with_category("home").with_pagination(3, 12);
    let products = products_source(&server, 1).fetch_products(&spec).await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, ProductId::new("p1"));
    assert_eq!(products[0].price, Money::new(2450));
    assert_eq!(products[1].id, ProductId::new("2"));
}

#[tokio::test]
async fn test_fetches_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": sample_products(),
            "meta": {"request_id": "abc"}
        })))
        .mount(&server)
        .await;

    let products = products_source(&server, 1)
        .fetch_products(&FilterSpec::new())
        .await
        .unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_follows_every_page_of_a_large_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "new", "name": "Newest", "price": 5, "stock": 1}],
            "pagination": {"page": 1, "limit": 1000, "totalItems": 1001, "totalPages": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "old", "name": "Oldest", "price": 7, "stock": 2}],
            "pagination": {"page": 2, "limit": 1000, "totalItems": 1001, "totalPages": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = products_source(&server, 1)
        .fetch_products(&FilterSpec::new())
        .await
        .unwrap();

    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_products()))
        .expect(1)
        .mount(&server)
        .await;

    let products = products_source(&server, 3)
        .fetch_products(&FilterSpec::new())
        .await
        .unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"code": "not_found", "message": "no catalog"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = products_source(&server, 3)
        .fetch_products(&FilterSpec::new())
        .await
        .unwrap_err();
    match err {
        FetchError::Http { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no catalog");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_source_serves_demo_catalog() {
    let client = FetchClient::new("http://127.0.0.1:9", fast_policy(1)).unwrap();
    let loader = CatalogLoader::new(HttpProductSource::new(client));

    let load = loader.load(&FilterSpec::new()).await;
    assert!(load.is_demo());
    assert!(!load.products.is_empty());
    assert!(matches!(load.origin, CatalogOrigin::Demo { .. }));
    assert!(load.notice().is_some());
}

#[tokio::test]
async fn test_categories_fall_back_on_empty_and_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let defaults = storefront_commerce::catalog::default_categories();
    let source = CategorySource::new(server.uri()).unwrap();
    assert!(source.fetch().await.unwrap().is_empty());
    assert_eq!(source.load().await, defaults);

    let offline = CategorySource::new("http://127.0.0.1:9").unwrap();
    assert!(offline.fetch().await.is_err());
    assert_eq!(offline.load().await, defaults);
}

#[tokio::test]
async fn test_categories_from_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "garden", "displayName": "Garden"}
        ])))
        .mount(&server)
        .await;

    let categories = CategorySource::new(server.uri()).unwrap().load().await;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].label(), "Garden");
}

#[tokio::test]
async fn test_auth_login_and_me() {
    let server = MockServer::start().await;
    let user = json!({"_id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"});
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"user": user.clone(), "token": "tok-1", "tokenExpiry": 1_900_000_000_000i64},
            "meta": {}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user})))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthClient::new(FetchClient::new(server.uri(), fast_policy(1)).unwrap());
    let response = auth
        .login(&Credentials {
            email: "ada@example.com".into(),
            password: "Secret123".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.token, "tok-1");
    assert_eq!(response.token_expiry, Some(1_900_000_000_000));

    let me = auth.me(&response.token).await.unwrap();
    assert_eq!(me.role, Role::Admin);
    assert_eq!(me.email, "ada@example.com");
}

#[tokio::test]
async fn test_auth_rejection_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid token"})))
        .mount(&server)
        .await;

    let auth = AuthClient::new(FetchClient::new(server.uri(), fast_policy(3)).unwrap());
    let err = auth.me("stale").await.unwrap_err();
    assert!(err.is_unauthorized());
}
