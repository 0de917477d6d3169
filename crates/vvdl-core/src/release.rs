//! Release locator: queries the release-hosting API and resolves the asset
//! this tool expects by exact filename match.

use serde::Deserialize;
use std::str::FromStr;

use crate::error::DownloadError;

const DEFAULT_API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("vvdl/", env!("CARGO_PKG_VERSION"));

/// `OWNER/REPO` pair naming a release repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoName {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DownloadError::InvalidRepo {
            input: s.to_string(),
        };
        let (owner, repo) = s.split_once('/').ok_or_else(invalid)?;
        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        };
        if !valid(owner) || !valid(repo) {
            return Err(invalid());
        }
        Ok(RepoName {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// One release asset resolved for download: the tag is for status reporting,
/// the id is the opaque handle the transport fetches by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhAsset {
    pub repo: RepoName,
    pub tag: String,
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct Release {
    html_url: String,
    tag_name: String,
    assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    id: u64,
    name: String,
}

/// Client for the release-hosting service. Cheap to clone; the credential is
/// read once at startup and held read-only for the run.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http: reqwest::Client,
    api_root: String,
    token: Option<String>,
}

impl ReleaseClient {
    pub fn new(token: Option<String>) -> Result<Self, DownloadError> {
        Self::with_api_root(DEFAULT_API_ROOT, token)
    }

    /// Client against a non-default API root (tests point this at a local
    /// server). A trailing slash is tolerated.
    pub fn with_api_root(
        api_root: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, DownloadError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| DownloadError::Client { source })?;
        let mut api_root = api_root.into();
        while api_root.ends_with('/') {
            api_root.pop();
        }
        Ok(ReleaseClient {
            http,
            api_root,
            token,
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Request builder with the bearer credential applied when present.
    pub(crate) fn get_authenticated(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.get(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Resolves `version` ("latest" or an explicit tag) against `repo`, then
    /// scans the release's asset list for an exact match of
    /// `asset_name(resolved_tag)`.
    ///
    /// This is the only check that a release actually carries the artifact
    /// this tool expects; a miss reports the release URL and the expected
    /// filename.
    pub async fn find_asset(
        &self,
        repo: &RepoName,
        version: &str,
        asset_name: impl FnOnce(&str) -> String,
    ) -> Result<GhAsset, DownloadError> {
        let url = match version {
            "latest" => format!(
                "{}/repos/{}/{}/releases/latest",
                self.api_root, repo.owner, repo.repo
            ),
            tag => format!(
                "{}/repos/{}/{}/releases/tags/{}",
                self.api_root, repo.owner, repo.repo, tag
            ),
        };

        let response = self
            .get_authenticated(&url)
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
        let release: Release =
            response
                .json()
                .await
                .map_err(|source| DownloadError::Request {
                    url: url.clone(),
                    source,
                })?;

        let wanted = asset_name(&release.tag_name);
        let asset = release
            .assets
            .into_iter()
            .find(|asset| asset.name == wanted)
            .ok_or(DownloadError::AssetNotFound {
                asset_name: wanted,
                release_url: release.html_url,
            })?;

        Ok(GhAsset {
            repo: repo.clone(),
            tag: release.tag_name,
            id: asset.id,
            name: asset.name,
        })
    }
}
