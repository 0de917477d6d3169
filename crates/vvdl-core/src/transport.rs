//! Byte transport: authenticated release-asset fetch and plain URL fetch.
//!
//! Both variants buffer the whole body in memory; extraction starts only
//! after the download finished. Nothing is retried; a failure here is fatal
//! for the artifact and therefore for the run.

use url::Url;

use crate::archive::ArchiveKind;
use crate::error::DownloadError;
use crate::release::{GhAsset, ReleaseClient};

const OCTET_STREAM: &str = "application/octet-stream";

impl ReleaseClient {
    /// Fetch a release asset's raw bytes through the API using the resolved
    /// asset id, negotiating binary content.
    pub async fn fetch_asset(&self, asset: &GhAsset) -> Result<Vec<u8>, DownloadError> {
        let url = format!(
            "{}/repos/{}/{}/releases/assets/{}",
            self.api_root(),
            asset.repo.owner,
            asset.repo.repo,
            asset.id
        );
        let response = self
            .get_authenticated(&url)
            .header(reqwest::header::ACCEPT, OCTET_STREAM)
            .send()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| DownloadError::Request { url, source })?;
        Ok(bytes.to_vec())
    }

    /// Fetch a plain HTTP(S) URL. Unauthenticated; success is exactly
    /// status 200 (redirects are followed transparently by the client).
    pub async fn fetch_url(&self, url: &Url, kind: ArchiveKind) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .http()
            .get(url.clone())
            .header(reqwest::header::ACCEPT, kind.accept_header())
            .send()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(DownloadError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}
