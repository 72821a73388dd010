use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{test, web, App};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fluxgate::{
    error::{GatewayError, Result},
    router::ImageProvider,
    server::{self, AppState},
};
use serde_json::{json, Value};

enum StubBehavior {
    Bytes(Vec<u8>),
    Fail(String),
}

struct StubProvider {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    behavior: StubBehavior,
}

impl StubProvider {
    fn returning(bytes: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            behavior: StubBehavior::Bytes(bytes.to_vec()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            behavior: StubBehavior::Fail(message.to_string()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for StubProvider {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behavior {
            StubBehavior::Bytes(bytes) => Ok(bytes.clone()),
            StubBehavior::Fail(message) => Err(GatewayError::UpstreamError(message.clone())),
        }
    }
}

fn app_state(stub: &Arc<StubProvider>) -> web::Data<AppState> {
    let provider: Arc<dyn ImageProvider> = Arc::clone(stub);
    web::Data::new(AppState { provider })
}

#[actix_web::test]
async fn missing_or_empty_prompts_are_rejected_before_any_outbound_call() {
    let stub = StubProvider::returning(b"unused");
    let app = test::init_service(
        App::new()
            .app_data(app_state(&stub))
            .configure(server::configure),
    )
    .await;

    for body in [json!({ "prompt": "" }), json!({ "prompt": "  \n\t " }), json!({})] {
        let request = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(&body)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 400);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Prompt is required");
    }

    assert_eq!(stub.calls(), 0);
}

#[actix_web::test]
async fn upstream_bytes_come_back_as_a_jpeg_data_uri() {
    // Deliberately not real image bytes: the proxy must not care.
    let bytes = b"definitely not a jpeg".to_vec();
    let stub = StubProvider::returning(&bytes);
    let app = test::init_service(
        App::new()
            .app_data(app_state(&stub))
            .configure(server::configure),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({ "prompt": "a red fox" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body["imageUrl"],
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&bytes))
    );

    assert_eq!(stub.calls(), 1);
}

#[actix_web::test]
async fn the_forwarded_prompt_is_trimmed() {
    let stub = StubProvider::returning(b"img");
    let app = test::init_service(
        App::new()
            .app_data(app_state(&stub))
            .configure(server::configure),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({ "prompt": "  framed sunset  " }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);

    assert_eq!(stub.prompts(), vec!["framed sunset".to_string()]);
}

#[actix_web::test]
async fn upstream_failure_maps_to_a_500_with_the_message() {
    let stub = StubProvider::failing("HTTP error! status: 424");
    let app = test::init_service(
        App::new()
            .app_data(app_state(&stub))
            .configure(server::configure),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/api/generate")
        .set_json(json!({ "prompt": "doomed" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 500);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "HTTP error! status: 424");
}

#[actix_web::test]
async fn malformed_request_bodies_become_a_500_error_payload() {
    let stub = StubProvider::returning(b"unused");
    let app = test::init_service(
        App::new()
            .app_data(app_state(&stub))
            .configure(server::configure),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/api/generate")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not valid json")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 500);

    let body: Value = test::read_body_json(response).await;
    assert!(!body["error"].as_str().unwrap_or_default().is_empty());
    assert_eq!(stub.calls(), 0);
}

#[actix_web::test]
async fn the_front_end_page_is_served_at_the_root() {
    let stub = StubProvider::returning(b"unused");
    let app = test::init_service(
        App::new()
            .app_data(app_state(&stub))
            .configure(server::configure),
    )
    .await;

    let request = test::TestRequest::get().uri("/").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = test::read_body(response).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Generate Image"));
}
