//! `Enhancer` against a local `wiremock` chat-completions endpoint.

use chrono::Utc;
use serde_json::json;
use storelens_core::{BrandInsights, Faq, LlmConfig};
use storelens_enhancer::{Enhancer, EnhancerError};
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_url: &str) -> LlmConfig {
    LlmConfig {
        api_key: Some("sk-test".to_owned()),
        model: "gpt-4o-mini".to_owned(),
        base_url: base_url.to_owned(),
        timeout_secs: 5,
    }
}

fn raw_record() -> BrandInsights {
    let mut record = BrandInsights::empty("https://shop.example.com", Utc::now());
    record.store_name = Some("Acme Goods".to_owned());
    record.brand_context = Some("we make bags. we make them good".to_owned());
    record.faqs = vec![Faq {
        question: "do u ship".to_owned(),
        answer: "yes worldwide".to_owned(),
    }];
    record
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn successful_reply_replaces_fields_and_marks_record() {
    let server = MockServer::start().await;
    let content = json!({
        "brand_context": "Acme Goods makes durable everyday bags.",
        "faqs": [{"question": "Do you ship internationally?", "answer": "Yes, worldwide."}],
        "payment_methods": ["Visa", "Shop Pay"],
        "currencies": ["usd"]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(bearer_token("sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content)))
        .expect(1)
        .mount(&server)
        .await;

    let enhancer = Enhancer::new(config(&server.uri())).expect("enhancer");
    let enhanced = enhancer.enhance(raw_record()).await;

    assert!(enhanced.enhanced);
    assert_eq!(
        enhanced.brand_context.as_deref(),
        Some("Acme Goods makes durable everyday bags.")
    );
    assert_eq!(enhanced.faqs[0].question, "Do you ship internationally?");
    assert_eq!(enhanced.payment_methods, vec!["Visa", "Shop Pay"]);
    assert_eq!(enhanced.currencies_accepted, vec!["USD"]);
    assert_eq!(enhanced.store_name.as_deref(), Some("Acme Goods"));
}

#[tokio::test]
async fn server_error_returns_record_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
        .mount(&server)
        .await;

    let enhancer = Enhancer::new(config(&server.uri())).expect("enhancer");
    let raw = raw_record();

    let err = enhancer.try_enhance(&raw).await.unwrap_err();
    assert!(matches!(err, EnhancerError::UnexpectedStatus { status: 500 }));
    assert_eq!(enhancer.enhance(raw.clone()).await, raw);
}

#[tokio::test]
async fn malformed_content_returns_record_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("I cannot help with that.")),
        )
        .mount(&server)
        .await;

    let enhancer = Enhancer::new(config(&server.uri())).expect("enhancer");
    let raw = raw_record();

    let err = enhancer.try_enhance(&raw).await.unwrap_err();
    assert!(matches!(err, EnhancerError::Malformed(_)));
    assert_eq!(enhancer.enhance(raw.clone()).await, raw);
}

#[tokio::test]
async fn empty_choices_are_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let enhancer = Enhancer::new(config(&server.uri())).expect("enhancer");
    let err = enhancer.try_enhance(&raw_record()).await.unwrap_err();
    assert!(matches!(err, EnhancerError::EmptyResponse));
}

#[test]
fn missing_api_key_disables_enhancer() {
    let mut cfg = config("http://127.0.0.1:1");
    cfg.api_key = None;
    assert!(matches!(Enhancer::new(cfg), Err(EnhancerError::Disabled)));
}
