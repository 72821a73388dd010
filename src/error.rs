use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("a generation request is already in flight")]
    Busy,
    #[error("Request error: {0}")]
    RequestError(String),
    // Bare message so the proxy's 500 body carries the upstream text verbatim.
    #[error("{0}")]
    UpstreamError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Invalid image format: {0}")]
    FormatError(String),
    #[error("Download error: {0}")]
    DownloadError(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
