use super::*;

fn test_client(base_url: &str) -> CommerceClient {
    CommerceClient::new(base_url, 5, "storefront-test/0.1")
        .expect("client construction should not fail")
}

#[test]
fn endpoint_appends_below_api_prefix() {
    let client = test_client("http://localhost:8000/api");
    let url = client.endpoint("cart/").unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/api/cart/");
}

#[test]
fn endpoint_strips_repeated_trailing_slashes() {
    let client = test_client("http://localhost:8000/api//");
    let url = client.endpoint("cart/7").unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/api/cart/7");
}

#[test]
fn new_rejects_unparsable_base_url() {
    let result = CommerceClient::new("not a url", 5, "ua");
    assert!(
        matches!(result, Err(ApiError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl, got: {result:?}"
    );
}

#[test]
fn error_detail_reads_fastapi_body() {
    let detail = error_detail(
        StatusCode::NOT_FOUND,
        r#"{"detail": "Item not found in cart"}"#,
    );
    assert_eq!(detail, "Item not found in cart");
}

#[test]
fn error_detail_serializes_structured_detail() {
    let detail = error_detail(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"detail": [{"loc": ["body", "quantity"]}]}"#,
    );
    assert!(detail.contains("quantity"), "got: {detail}");
}

#[test]
fn error_detail_falls_back_to_reason_phrase() {
    let detail = error_detail(StatusCode::BAD_GATEWAY, "<html>oops</html>");
    assert_eq!(detail, "Bad Gateway");
}

#[test]
fn from_config_applies_retry_policy() {
    let config = AppConfig {
        api_url: "http://localhost:8000/api".to_string(),
        env: storefront_core::Environment::Test,
        log_level: "info".to_string(),
        request_timeout_secs: 5,
        user_agent: "ua".to_string(),
        max_retries: 4,
        retry_backoff_base_ms: 100,
        cart_timeout_ms: 1000,
        payment_method: "card".to_string(),
    };
    let client = CommerceClient::from_config(&config).unwrap();
    assert_eq!(client.max_retries, 4);
    assert_eq!(client.backoff_base_ms, 100);
    assert_eq!(client.base_url().as_str(), "http://localhost:8000/api/");
}
