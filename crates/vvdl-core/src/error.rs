//! Error taxonomy for a download/install run.
//!
//! Every variant is terminal: nothing is retried, the CLI reports the message
//! and exits non-zero. Artifacts already extracted by other tasks are left in
//! place.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The running host's CPU architecture has no mapping to a published
    /// artifact. Detected before any network activity.
    #[error("{raw:?} is not a supported CPU architecture")]
    UnsupportedArch { raw: String },

    /// The running host's OS has no mapping to a published artifact.
    #[error("{raw:?} is not a supported OS")]
    UnsupportedOs { raw: String },

    /// A label (os / cpu-arch / accelerator) did not parse.
    #[error("{value:?} is not a valid {what}")]
    InvalidLabel { what: &'static str, value: String },

    /// A repository was not given as `OWNER/REPO`.
    #[error("invalid repository {input:?}, expected OWNER/REPO")]
    InvalidRepo { input: String },

    /// The installation plan would let two targets collide.
    #[error("invalid installation plan: {reason}")]
    InvalidPlan { reason: String },

    /// The resolved release does not carry the asset this tool expects.
    /// Carries the release's human-facing URL so the user can inspect it.
    #[error("could not find {asset_name:?} in {release_url}")]
    AssetNotFound {
        asset_name: String,
        release_url: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("could not construct HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// Network-layer failure (connect, TLS, body read, JSON decode).
    #[error("request for {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status. Plain-URL fetches require exactly 200.
    #[error("got HTTP {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The downloaded bytes are not a readable archive.
    #[error("{name}: malformed archive")]
    MalformedArchive {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// An archive entry would escape the output directory after path
    /// normalization; it is rejected instead of written.
    #[error("archive entry {entry:?} escapes the output directory")]
    UnsafeEntryPath { entry: String },

    /// Filesystem failure while unpacking (create dir, write file, tar unpack).
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A download/extract task panicked or was cancelled by the runtime.
    #[error("background task failed")]
    TaskFailed {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl DownloadError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        DownloadError::Io {
            context: context.into(),
            source,
        }
    }
}
