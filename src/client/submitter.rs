use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::GenericImageView;

use crate::{
    client::decode::{data_uri_bytes, decode_image_reference, png_fallback, DecodedImage},
    error::{GatewayError, Result},
    models::GenerateResponse,
};

/// Client half of the generation flow: validates the prompt, submits it to a
/// running proxy, and resolves the answer into a renderable reference.
#[derive(Clone)]
pub struct SubmitterClient {
    base_url: String,
    client: reqwest::Client,
    in_flight: Arc<AtomicBool>,
}

/// Outcome of a successful load check: the reference that finally decoded,
/// its bytes, and the reported dimensions.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub reference: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Holds the in-flight flag for one submission. Dropping it is the
/// finalization step, so the flag clears on every exit path.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(GatewayError::Busy);
        }
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl SubmitterClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Submits a prompt and returns the resolved image reference. At most one
    /// submission runs at a time; an overlapping call fails fast with
    /// `GatewayError::Busy` instead of queueing.
    pub async fn submit(&self, prompt: &str) -> Result<String> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::ValidationError(
                "Please enter a prompt".to_string(),
            ));
        }

        let _in_flight = InFlightGuard::acquire(&self.in_flight)?;

        log::info!("Submitting prompt ({} chars)", trimmed.len());

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&serde_json::json!({ "prompt": trimmed }))
            .send()
            .await
            .map_err(|e| GatewayError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            log::error!("Proxy returned status {}", response.status());
            return Err(GatewayError::UpstreamError(
                "Failed to generate image".to_string(),
            ));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ResponseError(e.to_string()))?;

        match decode_image_reference(&body.image_url) {
            DecodedImage::RawImage(reference) => {
                log::debug!("Resolved a directly renderable data URI");
                Ok(reference)
            }
            DecodedImage::ImageUrl(reference) => {
                log::debug!("Resolved a remote image URL");
                Ok(reference)
            }
            DecodedImage::Unrecognized => Err(GatewayError::FormatError(
                "no recognizable image reference in the response envelope".to_string(),
            )),
        }
    }

    /// Verifies that a resolved reference actually decodes as an image. A
    /// JPEG-labeled data URI that fails gets exactly one retry with the same
    /// payload relabeled PNG; there is no third attempt.
    pub async fn load_image(&self, reference: &str) -> Result<LoadedImage> {
        let first_failure = match self.try_load(reference).await {
            Ok(loaded) => return Ok(loaded),
            Err(e) => e,
        };

        if let Some(retry) = png_fallback(reference) {
            log::warn!("Image failed to load ({}), retrying as PNG", first_failure);
            if let Ok(loaded) = self.try_load(&retry).await {
                return Ok(loaded);
            }
        } else {
            log::error!("Image failed to load: {}", first_failure);
        }

        Err(GatewayError::FormatError(
            "failed to load the generated image; the format may not be supported".to_string(),
        ))
    }

    async fn try_load(&self, reference: &str) -> Result<LoadedImage> {
        let bytes = self.fetch_image_bytes(reference).await?;

        // A data URI promises a format; hold the payload to it. Anything
        // else is sniffed from the bytes.
        let decoded = match declared_format(reference) {
            Some(format) => image::load_from_memory_with_format(&bytes, format),
            None => image::load_from_memory(&bytes),
        }
        .map_err(|e| GatewayError::FormatError(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        Ok(LoadedImage {
            reference: reference.to_string(),
            bytes,
            width,
            height,
        })
    }

    pub(crate) async fn fetch_image_bytes(&self, reference: &str) -> Result<Vec<u8>> {
        if reference.starts_with("data:") {
            return data_uri_bytes(reference);
        }

        let response = self
            .client
            .get(reference)
            .send()
            .await
            .map_err(|e| GatewayError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::RequestError(format!(
                "image fetch returned status {}",
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::ResponseError(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

fn declared_format(reference: &str) -> Option<image::ImageFormat> {
    let media_type = reference.strip_prefix("data:")?.split(';').next()?;
    image::ImageFormat::from_mime_type(media_type)
}
