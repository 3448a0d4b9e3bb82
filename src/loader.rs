//! Multi-source image loading with prioritized fallback
//!
//! A request may carry up to three representations of the same image: raw
//! encoded bytes, a base64 string, and a URL. Exactly one is consumed per
//! call, in the fixed priority order bytes > base64 > url. Once a source is
//! present its outcome is final; a failing high-priority source never falls
//! through to a lower-priority one.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

use crate::image::{self, BgrImage};

/// Fetch budget applied to the URL source when none is given.
pub const DEFAULT_URL_TIMEOUT: Duration = Duration::from_secs(10);

/// The closed set of ways a load can fail. Exactly one code per call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// Local bytes (raw or base64-decoded) were malformed, undecodable, or
    /// decoded to an all-zero buffer.
    #[error("unsupported or corrupt image data")]
    UnsupportedFormat,

    /// The URL fetch itself failed: timeout, connect error, DNS failure, or
    /// a non-success HTTP status.
    #[error("image download failed or timed out")]
    DownloadTimeout,

    /// The URL fetch succeeded but the body did not decode as an image.
    #[error("url did not yield a decodable image")]
    InvalidImageUrl,

    /// No source was supplied.
    #[error("no image source supplied")]
    MissingArguments,
}

/// Up to three optional representations of one image, plus the URL fetch
/// timeout.
#[derive(Debug, Clone, Default)]
pub struct ImageRequest<'a> {
    pub raw_bytes: Option<&'a [u8]>,
    pub base64_text: Option<&'a str>,
    pub url: Option<&'a str>,
    /// Applies to the URL source only. `None` means [`DEFAULT_URL_TIMEOUT`].
    pub timeout: Option<Duration>,
}

impl<'a> ImageRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw_bytes(mut self, bytes: &'a [u8]) -> Self {
        self.raw_bytes = Some(bytes);
        self
    }

    pub fn with_base64_text(mut self, text: &'a str) -> Self {
        self.base64_text = Some(text);
        self
    }

    pub fn with_url(mut self, url: &'a str) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Load an image from the highest-priority source present in `request`.
///
/// Every failure is classified into one [`LoadError`] code; the function
/// never panics on malformed input.
///
/// A decode that yields an all-zero buffer is reported as
/// [`LoadError::UnsupportedFormat`]. Note this rejects genuinely all-black
/// images as well.
pub fn load_image(request: &ImageRequest<'_>) -> Result<BgrImage, LoadError> {
    if let Some(bytes) = request.raw_bytes {
        decode_local(bytes)
    } else if let Some(text) = request.base64_text {
        let bytes = BASE64.decode(text.trim()).map_err(|e| {
            log::debug!("base64 decode failed: {e}");
            LoadError::UnsupportedFormat
        })?;
        decode_local(&bytes)
    } else if let Some(url) = request.url {
        let body = fetch(url, request.timeout.unwrap_or(DEFAULT_URL_TIMEOUT))?;
        let img = image::decode(&body).map_err(|e| {
            log::debug!("decode of fetched body failed: {e}");
            LoadError::InvalidImageUrl
        })?;
        if img.is_blank() {
            return Err(LoadError::UnsupportedFormat);
        }
        Ok(img)
    } else {
        Err(LoadError::MissingArguments)
    }
}

/// Shared decode step for the two local sources.
fn decode_local(bytes: &[u8]) -> Result<BgrImage, LoadError> {
    let img = image::decode(bytes).map_err(|e| {
        log::debug!("image decode failed: {e}");
        LoadError::UnsupportedFormat
    })?;
    if img.is_blank() {
        return Err(LoadError::UnsupportedFormat);
    }
    Ok(img)
}

/// Blocking GET with a per-request timeout covering connect and body read.
fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            log::warn!("failed to build http client: {e}");
            LoadError::DownloadTimeout
        })?;

    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            log::warn!("image download from {url} failed: {e}");
            LoadError::DownloadTimeout
        })?;

    let body = response.bytes().map_err(|e| {
        log::warn!("reading image download body from {url} failed: {e}");
        LoadError::DownloadTimeout
    })?;

    Ok(body.to_vec())
}
