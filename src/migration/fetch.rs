use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Content type used when the source does not report one
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Nothing to fetch: empty URL")]
    EmptyUrl,
}

/// A file downloaded from a legacy location
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub data: Bytes,
    pub content_type: String,
}

/// Retrieves the bytes behind a legacy link
#[async_trait]
pub trait FileSource: Send + Sync + 'static {
    async fn fetch(&self, url: &str) -> Result<FetchedFile, FetchError>;
}

/// Fetches over HTTP(S); inline `data:` URLs are decoded without a request
pub struct HttpFileSource {
    client: reqwest::Client,
}

impl HttpFileSource {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FileSource for HttpFileSource {
    async fn fetch(&self, url: &str) -> Result<FetchedFile, FetchError> {
        if url.is_empty() {
            return Err(FetchError::EmptyUrl);
        }
        if url.starts_with("data:") {
            return decode_data_url(url);
        }

        debug!("Downloading legacy file from {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let data = response.bytes().await?;
        Ok(FetchedFile { data, content_type })
    }
}

/// Decode `data:[<mime>][;base64],<payload>`
pub fn decode_data_url(url: &str) -> Result<FetchedFile, FetchError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| FetchError::InvalidDataUrl("missing data: scheme".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| FetchError::InvalidDataUrl("missing ',' separator".to_string()))?;

    let (mime, is_base64) = match meta.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (meta, false),
    };
    let content_type = match mime.split(';').next() {
        Some(mime) if !mime.is_empty() => mime.to_string(),
        _ => FALLBACK_CONTENT_TYPE.to_string(),
    };

    let data = if is_base64 {
        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| FetchError::InvalidDataUrl(e.to_string()))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(FetchedFile {
        data: Bytes::from(data),
        content_type,
    })
}
