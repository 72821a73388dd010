use crate::{
    models::{ErrorResponse, GenerateRequest, GenerateResponse},
    router::ImageProvider,
    server::AppState,
};
use actix_web::{error::InternalError, get, post, web, HttpResponse, Responder};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[post("/api/generate")]
pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> impl Responder {
    let request_id = Uuid::new_v4().simple().to_string();

    let prompt = match body.prompt.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => {
            log::warn!("[{}] Rejected submission without a prompt", request_id);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Prompt is required".to_string(),
            });
        }
    };

    log::info!(
        "[{}] Forwarding prompt to the image router ({} chars)",
        request_id,
        prompt.len()
    );

    match state.provider.generate_image(&prompt).await {
        Ok(bytes) => {
            // Whatever the upstream really sent is labeled JPEG here; the
            // submitter re-probes the true shape on its side.
            let image_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(&bytes));
            log::info!(
                "[{}] Returning {} upstream bytes as a data URI",
                request_id,
                bytes.len()
            );
            HttpResponse::Ok().json(GenerateResponse { image_url })
        }
        Err(e) => {
            log::error!("[{}] Image generation failed: {}", request_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

/// A body that fails JSON extraction is an unexpected fault, not a prompt
/// validation failure: it comes back as a 500 carrying the usual error shape.
pub fn json_error_handler() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::error!("Rejecting malformed request body: {}", err);
        let response = HttpResponse::InternalServerError().json(ErrorResponse {
            error: err.to_string(),
        });
        InternalError::from_response(err, response).into()
    })
}
