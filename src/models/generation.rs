use serde::{Deserialize, Serialize};

/// Body accepted by `POST /api/generate`. The prompt is optional at the wire
/// level so that a well-formed body without the field is handled as a
/// validation failure rather than a deserialization fault.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String, // http(s) URL or data URI
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
