use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;

use crate::error::{GatewayError, Result};

pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Number of base64 characters decoded when probing for an embedded envelope.
const PROBE_LEN: usize = 100;

/// Resolved shape of the reference the proxy returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedImage {
    /// A data URI whose payload is image bytes, renderable as-is.
    RawImage(String),
    /// A remote http(s) location the image has to be fetched from.
    ImageUrl(String),
    /// The payload was a JSON envelope with no recognizable image field.
    Unrecognized,
}

/// Disambiguates the reference handed back by the proxy. The proxy labels
/// everything `data:image/jpeg;base64,`, but the payload underneath may be a
/// base64 JSON envelope pointing at the real image instead of image bytes.
pub fn decode_image_reference(reference: &str) -> DecodedImage {
    if let Some(payload) = reference.strip_prefix(JPEG_DATA_URI_PREFIX) {
        if let Some(resolved) = probe_envelope(payload) {
            return resolved;
        }
        // Not an envelope: the payload really is base64 image bytes.
        return DecodedImage::RawImage(reference.to_string());
    }

    if !reference.starts_with("http") && !reference.starts_with("data:") {
        // Bare base64 with no scheme at all.
        return DecodedImage::RawImage(format!("{}{}", JPEG_DATA_URI_PREFIX, reference));
    }

    if reference.starts_with("http") {
        return DecodedImage::ImageUrl(reference.to_string());
    }

    DecodedImage::RawImage(reference.to_string())
}

/// Decodes a short prefix of the payload; only when that prefix reads as the
/// start of a JSON object is the full payload decoded and searched. Any
/// decode or parse failure means "not an envelope".
fn probe_envelope(payload: &str) -> Option<DecodedImage> {
    let head_len = payload.len().min(PROBE_LEN);
    let head = STANDARD.decode(&payload.as_bytes()[..head_len]).ok()?;
    if !String::from_utf8_lossy(&head).trim().starts_with('{') {
        return None;
    }

    let document = STANDARD.decode(payload).ok()?;
    let envelope: Value = serde_json::from_slice(&document).ok()?;
    Some(resolve_envelope(&envelope))
}

fn resolve_envelope(envelope: &Value) -> DecodedImage {
    // First match wins; mixed envelopes are never merged.
    if let Some(b64) = envelope["data"][0]["b64_json"].as_str() {
        return DecodedImage::RawImage(format!("{}{}", PNG_DATA_URI_PREFIX, b64));
    }
    if let Some(url) = envelope["data"][0]["url"].as_str() {
        return DecodedImage::ImageUrl(url.to_string());
    }
    if let Some(url) = envelope["url"].as_str() {
        return DecodedImage::ImageUrl(url.to_string());
    }
    if let Some(image) = envelope["image"].as_str() {
        return DecodedImage::RawImage(format!("{}{}", PNG_DATA_URI_PREFIX, image));
    }
    DecodedImage::Unrecognized
}

/// The one-shot recovery for a reference that refuses to render: the same
/// payload relabeled PNG. Only JPEG-labeled data URIs have a fallback.
pub fn png_fallback(reference: &str) -> Option<String> {
    reference
        .strip_prefix(JPEG_DATA_URI_PREFIX)
        .map(|payload| format!("{}{}", PNG_DATA_URI_PREFIX, payload))
}

/// Decodes the byte payload of a base64 data URI.
pub fn data_uri_bytes(reference: &str) -> Result<Vec<u8>> {
    let payload = reference
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or_else(|| {
            GatewayError::FormatError("reference is not a base64 data URI".to_string())
        })?;

    STANDARD
        .decode(payload)
        .map_err(|e| GatewayError::FormatError(e.to_string()))
}
