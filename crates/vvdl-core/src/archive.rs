//! Archive extraction: zip (per-entry, in memory) and gzip tarball (via a
//! scratch file).
//!
//! Entry paths are normalized (backslashes from archives produced on other
//! OS conventions become forward slashes) and validated: anything that would
//! land outside the output root is rejected, never written.

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use zip::ZipArchive;

use crate::error::DownloadError;

/// Container format of a downloaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tgz,
}

impl ArchiveKind {
    /// Accept header sent when fetching an archive of this kind by plain URL.
    pub fn accept_header(self) -> &'static str {
        match self {
            ArchiveKind::Zip => "application/zip",
            ArchiveKind::Tgz => "application/gzip",
        }
    }
}

/// Whether the archive's single top-level wrapper directory is collapsed
/// away so its contents land directly under the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stripping {
    None,
    FirstDir,
}

/// Extracts `bytes` into `output_root`, creating it and any intermediate
/// directories. Decompression and filesystem writes run on the blocking
/// thread pool; entries within one archive are processed sequentially.
pub async fn extract(
    bytes: Vec<u8>,
    kind: ArchiveKind,
    stripping: Stripping,
    output_root: &Path,
    display_name: &str,
) -> Result<(), DownloadError> {
    let output_root = output_root.to_owned();
    let display_name = display_name.to_owned();
    tokio::task::spawn_blocking(move || match kind {
        ArchiveKind::Zip => extract_zip(&bytes, stripping, &output_root, &display_name),
        ArchiveKind::Tgz => extract_tgz(&bytes, stripping, &output_root, &display_name),
    })
    .await
    .map_err(|source| DownloadError::TaskFailed { source })?
}

fn extract_zip(
    bytes: &[u8],
    stripping: Stripping,
    output_root: &Path,
    display_name: &str,
) -> Result<(), DownloadError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|source| DownloadError::MalformedArchive {
            name: display_name.to_string(),
            source,
        })?;

    for index in 0..archive.len() {
        let mut entry =
            archive
                .by_index(index)
                .map_err(|source| DownloadError::MalformedArchive {
                    name: display_name.to_string(),
                    source,
                })?;
        // Directory entries are never materialized; their structure is
        // created from the paths of the file entries below them.
        if entry.is_dir() {
            continue;
        }
        let stored = entry.name().to_owned();
        let Some(relative) = entry_relative_path(&stored, stripping)? else {
            continue;
        };
        let destination = output_root.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DownloadError::io(format!("create {}", parent.display()), e))?;
        }
        let mut out = fs::File::create(&destination)
            .map_err(|e| DownloadError::io(format!("create {}", destination.display()), e))?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| DownloadError::io(format!("write {}", destination.display()), e))?;
    }
    Ok(())
}

/// Normalizes one stored zip entry name into a relative path under the
/// output root. Returns `Ok(None)` for entries that reduce to nothing (e.g.
/// the wrapper directory itself once stripped).
///
/// Rejects absolute paths, drive prefixes, and any `..` component: the
/// stored name is attacker-controlled and must not escape the output root.
fn entry_relative_path(
    stored: &str,
    stripping: Stripping,
) -> Result<Option<PathBuf>, DownloadError> {
    let normalized = stored.replace('\\', "/");
    let relative = match stripping {
        Stripping::None => normalized.as_str(),
        // Drop everything up to and including the first slash; a name with
        // no slash at all is kept as-is.
        Stripping::FirstDir => match normalized.split_once('/') {
            Some((_, rest)) => rest,
            None => normalized.as_str(),
        },
    };
    if relative.is_empty() {
        return Ok(None);
    }
    if relative.starts_with('/') {
        return Err(DownloadError::UnsafeEntryPath {
            entry: stored.to_string(),
        });
    }
    let mut path = PathBuf::new();
    for component in relative.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                return Err(DownloadError::UnsafeEntryPath {
                    entry: stored.to_string(),
                })
            }
            c if c.contains(':') => {
                // Drive-letter style component ("C:") after normalization.
                return Err(DownloadError::UnsafeEntryPath {
                    entry: stored.to_string(),
                });
            }
            c => path.push(c),
        }
    }
    if path.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(path))
    }
}

fn extract_tgz(
    bytes: &[u8],
    stripping: Stripping,
    output_root: &Path,
    display_name: &str,
) -> Result<(), DownloadError> {
    // The dictionary tarball is already rooted correctly; nothing in the
    // current product configuration strips a tgz, and tar's own unpack is
    // what enforces containment, so refuse the combination outright.
    if stripping == Stripping::FirstDir {
        return Err(DownloadError::InvalidPlan {
            reason: format!("{display_name}: first-directory stripping is not supported for tarballs"),
        });
    }

    let mut scratch = tempfile::NamedTempFile::new()
        .map_err(|e| DownloadError::io("create scratch file", e))?;
    scratch
        .write_all(bytes)
        .map_err(|e| DownloadError::io("write scratch file", e))?;
    let file = scratch
        .reopen()
        .map_err(|e| DownloadError::io("reopen scratch file", e))?;

    fs::create_dir_all(output_root)
        .map_err(|e| DownloadError::io(format!("create {}", output_root.display()), e))?;
    tar::Archive::new(GzDecoder::new(file))
        .unpack(output_root)
        .map_err(|e| {
            DownloadError::io(format!("{display_name}: unpack into {}", output_root.display()), e)
        })?;
    Ok(())
}
