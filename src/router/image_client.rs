use crate::{
    config::RouterConfig,
    error::{GatewayError, Result},
    router::ImageProvider,
};
use async_trait::async_trait;
use serde_json::json;

#[derive(Clone)]
pub struct RouterClient {
    config: RouterConfig,
    client: reqwest::Client,
}

impl RouterClient {
    pub fn new(config: RouterConfig) -> Self {
        // No request timeout: image generation can legitimately take longer
        // than any general-purpose default, and a hung call holds only its
        // own request open.
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

#[async_trait]
impl ImageProvider for RouterClient {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let request_payload = json!({
            "prompt": prompt,
            "response_format": "base64",
            "model": self.config.model,
        });

        log::info!("Generating image with model: {}", self.config.model);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_token)
            .json(&request_payload)
            .send()
            .await
            .map_err(|e| GatewayError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::UpstreamError(format!(
                "HTTP error! status: {}",
                response.status().as_u16()
            )));
        }

        // The body is opaque: raw image bytes in whatever format the backend
        // chose. No decoding happens here.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::ResponseError(e.to_string()))?;

        log::debug!("Upstream returned {} bytes", bytes.len());

        Ok(bytes.to_vec())
    }
}
