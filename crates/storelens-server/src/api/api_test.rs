use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use chrono::TimeZone;
use serde_json::json;
use storelens_core::LlmConfig;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME_HTML: &str = r#"<html><head>
<title>Acme Goods | Home</title>
<meta name="description" content="Bags built to last a lifetime.">
</head><body><h1>Welcome</h1></body></html>"#;

fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        client: StorefrontClient::new(5, "storelens-test/0.1").expect("client"),
        enhancer: None,
        cache_ttl: chrono::Duration::hours(24),
    }
}

fn test_app(pool: PgPool) -> Router {
    build_app(test_state(pool), rate_limit_state(100))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn analyze_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze-store")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

async fn mock_storefront() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(HOME_HTML, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                {
                    "id": 1,
                    "title": "Canvas Tote",
                    "handle": "canvas-tote",
                    "vendor": "Acme",
                    "variants": [{"id": 10, "price": "35.00", "available": true}]
                },
                {
                    "id": 2,
                    "title": "Field Pack",
                    "handle": "field-pack",
                    "vendor": "Acme",
                    "variants": [{"id": 20, "price": "120.00", "available": true}]
                }
            ]
        })))
        .mount(&server)
        .await;
    server
}

fn llm_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        api_key: Some("sk-test".to_owned()),
        model: "gpt-4o-mini".to_owned(),
        base_url: base_url.to_owned(),
        timeout_secs: 5,
    }
}

// ---------------------------------------------------------------------------
// Pure unit tests (no DB)
// ---------------------------------------------------------------------------

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 50);
    assert_eq!(normalize_limit(Some(0)), 1);
    assert_eq!(normalize_limit(Some(1_000)), 200);
    assert_eq!(normalize_limit(Some(25)), 25);
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[test]
fn store_response_flattens_the_record() {
    let analyzed_at = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let response = StoreInsightsResponse {
        id: 9,
        cached: true,
        insights: BrandInsights::empty("https://shop.example.com", analyzed_at),
    };

    let json = serde_json::to_value(&response).expect("serialize");
    assert_eq!(json["id"], 9);
    assert_eq!(json["cached"], true);
    assert_eq!(json["store_url"], "https://shop.example.com");
    assert!(json["product_catalog"].is_array());
    assert!(json.get("insights").is_none());
}

// ---------------------------------------------------------------------------
// Route tests (with DB)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn health_reports_ok_with_live_database(pool: PgPool) {
    let response = test_app(pool)
        .oneshot(get_request("/health"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({"status": "ok", "database": "ok"}));
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_store_is_404_and_echoes_request_id(pool: PgPool) {
    let response = test_app(pool)
        .oneshot(
            Request::builder()
                .uri("/store/987654")
                .header("x-request-id", "req-abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["meta"]["request_id"], "req-abc");
}

#[sqlx::test(migrations = "../../migrations")]
async fn non_numeric_store_id_is_400(pool: PgPool) {
    let response = test_app(pool)
        .oneshot(get_request("/store/not-a-number"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn analyze_rejects_invalid_url(pool: PgPool) {
    let response = test_app(pool)
        .oneshot(analyze_request(&json!({"website_url": "ftp://shop.example.com"})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn analyze_rejects_body_without_url(pool: PgPool) {
    let response = test_app(pool)
        .oneshot(analyze_request(&json!({"use_llm": true})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn analyze_stores_then_serves_from_cache(pool: PgPool) {
    let storefront = mock_storefront().await;
    let app = test_app(pool);

    let first = app
        .clone()
        .oneshot(analyze_request(&json!({"website_url": storefront.uri()})))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["cached"], false);
    assert_eq!(first["store_url"], storefront.uri());
    assert_eq!(first["store_name"], "Acme Goods");
    assert_eq!(first["total_products"], 2);
    let id = first["id"].as_i64().expect("id");

    let fetched = app
        .clone()
        .oneshot(get_request(&format!("/store/{id}")))
        .await
        .expect("response");
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = body_json(fetched).await;
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["cached"], true);
    assert_eq!(fetched["store_url"], storefront.uri());

    let second = app
        .clone()
        .oneshot(analyze_request(&json!({"website_url": storefront.uri()})))
        .await
        .expect("response");
    let second = body_json(second).await;
    assert_eq!(second["cached"], true);
    assert_eq!(second["id"], id);

    let refreshed = app
        .oneshot(analyze_request(
            &json!({"website_url": storefront.uri(), "force_refresh": true}),
        ))
        .await
        .expect("response");
    let refreshed = body_json(refreshed).await;
    assert_eq!(refreshed["cached"], false);
    assert_eq!(refreshed["id"], id, "re-analysis must update the same row");
}

#[sqlx::test(migrations = "../../migrations")]
async fn stale_record_is_reanalyzed(pool: PgPool) {
    let storefront = mock_storefront().await;
    let stale_at = Utc::now() - chrono::Duration::hours(48);
    let stale = BrandInsights::empty(storefront.uri(), stale_at);
    let row = storelens_db::upsert_store_insights(&pool, &stale)
        .await
        .expect("seed stale record");

    let response = test_app(pool)
        .oneshot(analyze_request(&json!({"website_url": storefront.uri()})))
        .await
        .expect("response");

    let json = body_json(response).await;
    assert_eq!(json["cached"], false);
    assert_eq!(json["id"], row.id);
    assert_eq!(json["total_products"], 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_enhancement_returns_raw_record(pool: PgPool) {
    let storefront = mock_storefront().await;
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&llm)
        .await;

    let mut state = test_state(pool);
    state.enhancer = Some(Enhancer::new(llm_config(&llm.uri())).expect("enhancer"));
    let app = build_app(state, rate_limit_state(100));

    let response = app
        .oneshot(analyze_request(
            &json!({"website_url": storefront.uri(), "use_llm": true}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["enhanced"], false);
    assert_eq!(json["brand_context"], "Bags built to last a lifetime.");
}

#[sqlx::test(migrations = "../../migrations")]
async fn successful_enhancement_is_stored(pool: PgPool) {
    let storefront = mock_storefront().await;
    let llm = MockServer::start().await;
    let content = json!({
        "brand_context": "Acme Goods makes durable everyday bags.",
        "faqs": [],
        "payment_methods": ["Visa"],
        "currencies": ["USD"]
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })))
        .mount(&llm)
        .await;

    let mut state = test_state(pool.clone());
    state.enhancer = Some(Enhancer::new(llm_config(&llm.uri())).expect("enhancer"));
    let app = build_app(state, rate_limit_state(100));

    let response = app
        .oneshot(analyze_request(
            &json!({"website_url": storefront.uri(), "use_llm": true}),
        ))
        .await
        .expect("response");
    let json = body_json(response).await;
    assert_eq!(json["enhanced"], true);
    assert_eq!(json["payment_methods"], json!(["Visa"]));

    let id = json["id"].as_i64().expect("id");
    let stored = storelens_db::get_store_insights(&pool, id)
        .await
        .expect("stored row")
        .into_insights();
    assert!(stored.enhanced);
    assert_eq!(
        stored.brand_context.as_deref(),
        Some("Acme Goods makes durable everyday bags.")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn stores_list_most_recent_first_with_limit(pool: PgPool) {
    for host in ["one", "two", "three"] {
        let record = BrandInsights::empty(format!("https://{host}.example.com"), Utc::now());
        storelens_db::upsert_store_insights(&pool, &record)
            .await
            .expect("seed");
    }

    let response = test_app(pool)
        .oneshot(get_request("/stores?limit=2"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["store_url"], "https://three.example.com");
    assert!(rows[0]["last_analyzed"].is_string());
}

#[sqlx::test(migrations = "../../migrations")]
async fn non_numeric_stores_limit_is_json_validation_error(pool: PgPool) {
    let response = test_app(pool)
        .oneshot(get_request("/stores?limit=abc"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["meta"]["request_id"].is_string());
}

#[sqlx::test(migrations = "../../migrations")]
async fn analyze_is_rate_limited_but_reads_are_not(pool: PgPool) {
    let app = build_app(test_state(pool), rate_limit_state(1));
    let invalid = json!({"website_url": "ftp://shop.example.com"});

    let first = app
        .clone()
        .oneshot(analyze_request(&invalid))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = app
        .clone()
        .oneshot(analyze_request(&invalid))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(second).await;
    assert_eq!(json["error"]["code"], "rate_limited");

    let health = app.oneshot(get_request("/health")).await.expect("response");
    assert_eq!(health.status(), StatusCode::OK);
}
