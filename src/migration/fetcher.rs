//! Media asset fetching
//!
//! This module defines the `AssetFetcher` trait used by the payload compiler
//! to download the binary content of media assets, along with an HTTP
//! implementation backed by reqwest.

use async_trait::async_trait;

use super::error::FetchError;

/// Downloaded content of a media asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAsset {
    /// Raw bytes
    pub bytes: Vec<u8>,
    /// `Content-Type` reported by the host, if any
    pub content_type: Option<String>,
}

impl FetchedAsset {
    /// Create a fetched asset from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Trait for media download implementations
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Download the asset at an absolute URL
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError>;
}

/// Resolve an asset URL against the source system's base URL
///
/// Absolute `http(s)` URLs are returned unchanged.
pub fn resolve_asset_url(base_url: Option<&str>, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    match base_url {
        Some(base) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            url.trim_start_matches('/')
        ),
        None => url.to_string(),
    }
}

/// HTTP asset fetcher
#[cfg(feature = "api-backend")]
#[derive(Debug, Clone)]
pub struct HttpAssetFetcher {
    /// Request timeout in seconds
    timeout_seconds: u64,
    /// HTTP client
    client: reqwest::Client,
}

#[cfg(feature = "api-backend")]
impl HttpAssetFetcher {
    /// Create a new HTTP fetcher
    pub fn new() -> Self {
        Self {
            timeout_seconds: 60,
            client: reqwest::Client::new(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

#[cfg(feature = "api-backend")]
impl Default for HttpAssetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "api-backend")]
#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError> {
        tracing::debug!("Fetching media asset: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(std::time::Duration::from_secs(self.timeout_seconds))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout_seconds)
                } else {
                    FetchError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::ConnectionError(e.to_string()))?;

        Ok(FetchedAsset {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockAssetFetcher;
    use super::*;

    #[test]
    fn test_resolve_relative_url() {
        assert_eq!(
            resolve_asset_url(Some("http://localhost:1337/"), "/uploads/a.png"),
            "http://localhost:1337/uploads/a.png"
        );
        assert_eq!(
            resolve_asset_url(Some("http://localhost:1337"), "uploads/a.png"),
            "http://localhost:1337/uploads/a.png"
        );
        assert_eq!(resolve_asset_url(None, "/uploads/a.png"), "/uploads/a.png");
    }

    #[test]
    fn test_absolute_url_unchanged() {
        assert_eq!(
            resolve_asset_url(Some("http://localhost:1337"), "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[tokio::test]
    async fn test_mock_fetcher() {
        let fetcher = MockAssetFetcher::new().with_asset("http://x/a.png", b"png");
        let asset = fetcher.fetch("http://x/a.png").await.unwrap();
        assert_eq!(asset.bytes, b"png".to_vec());

        let err = fetcher.fetch("http://x/missing.png").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(fetcher.requests().len(), 2);
    }
}
