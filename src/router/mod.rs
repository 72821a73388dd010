pub mod image_client;

use crate::error::Result;
use async_trait::async_trait;

pub use image_client::RouterClient;

/// Outbound half of the proxy: turns a prompt into raw image bytes. The
/// transport and the upstream wire format stay behind this seam so the HTTP
/// handlers can run against a substitute.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}
