//! HTTP surface tests using `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use userinsight_enrichment::{router, AppState, Enricher, EnrichmentConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(config: EnrichmentConfig) -> Router {
    let enricher = Enricher::from_config(&config).expect("enricher");
    router(AppState::new(enricher, config))
}

fn mock_app() -> Router {
    app(EnrichmentConfig::builder().mock_mode(true).build())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn missing_text_is_bad_request() {
    for uri in ["/enrichment/sentiment", "/enrichment/tags"] {
        let response = mock_app().oneshot(post_json(uri, "{}")).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().contains_key("x-correlation-id"));
        assert_eq!(body_json(response).await, json!({ "error": "text is required" }));
    }
}

#[tokio::test]
async fn empty_body_is_bad_request() {
    let response = mock_app()
        .oneshot(post_json("/enrichment/sentiment", ""))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let response = mock_app()
        .oneshot(post_json("/enrichment/tags", "{not json"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sentiment_envelope_in_mock_mode() {
    let mut request = post_json("/enrichment/sentiment", r#"{"text":"hi"}"#);
    request
        .headers_mut()
        .insert("x-correlation-id", "abc-123".parse().expect("header"));

    let response = mock_app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-correlation-id")
            .and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
    assert_eq!(
        body_json(response).await,
        json!({
            "sentimentScore": 0.0,
            "label": "Neutral",
            "fallback": true,
            "provider": "mock",
            "correlationId": "abc-123"
        })
    );
}

#[tokio::test]
async fn insights_accepts_partial_profile() {
    let response = mock_app()
        .oneshot(post_json("/enrichment/insights", r#"{"firstName":"Sara"}"#))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["summary"], json!(""));
    assert_eq!(body["engagementLevel"], json!("Medium"));
    assert_eq!(body["recommendedActions"], json!([]));
    assert_eq!(body["fallback"], json!(true));
    assert!(body["correlationId"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn insights_with_empty_body_uses_empty_profile() {
    let response = mock_app()
        .oneshot(post_json("/enrichment/insights", ""))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_in_mock_mode() {
    let response = mock_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "status": "ok", "provider": "mock", "dependency": "n/a", "mock": true })
    );
}

#[tokio::test]
async fn health_probes_local_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(EnrichmentConfig::builder().ollama_url(server.uri()).build());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        body_json(response).await,
        json!({ "status": "ok", "provider": "local", "dependency": "reachable", "mock": false })
    );
}

#[tokio::test]
async fn health_reports_missing_hosted_key() {
    let app = app(
        EnrichmentConfig::builder()
            .provider(userinsight_enrichment::ProviderKind::Hosted)
            .build(),
    );
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let body = body_json(response).await;
    assert_eq!(body["provider"], json!("hosted"));
    assert_eq!(body["dependency"], json!("missing_key"));
}
