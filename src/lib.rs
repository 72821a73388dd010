//! Prompt-to-image gateway: an HTTP proxy that forwards prompts to a hosted
//! image-generation router and hands the result back as a data URI, plus the
//! client side that disambiguates, verifies, and saves what came back.

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod router;
pub mod server;

pub use client::{decode_image_reference, png_fallback, DecodedImage, LoadedImage, SubmitterClient};
pub use config::{Config, RouterConfig};
pub use error::{GatewayError, Result};
pub use models::{ErrorResponse, GenerateRequest, GenerateResponse};
pub use router::{ImageProvider, RouterClient};
