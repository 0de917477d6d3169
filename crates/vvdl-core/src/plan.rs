//! Installation plan: which artifacts to download, from where, and how each
//! archive is unpacked.

use std::path::PathBuf;

use url::Url;

use crate::archive::{ArchiveKind, Stripping};
use crate::config::{
    ADDITIONAL_LIBRARIES_DISPLAY_NAME, CORE_DISPLAY_NAME, OPEN_JTALK_DIC_DISPLAY_NAME,
};
use crate::error::DownloadError;
use crate::release::GhAsset;

/// Where an artifact's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Resolved release asset, fetched through the authenticated API.
    GhAsset(GhAsset),
    /// Plain URL, fetched unauthenticated.
    Url(Url),
}

/// One artifact to download and extract.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub display_name: String,
    pub source: Source,
    pub kind: ArchiveKind,
    pub stripping: Stripping,
    pub output: PathBuf,
}

/// Ordered set of targets for one run. At most three: core, dictionary,
/// extra libraries.
#[derive(Debug)]
pub struct InstallationPlan {
    targets: Vec<DownloadTarget>,
}

impl InstallationPlan {
    pub fn targets(&self) -> &[DownloadTarget] {
        &self.targets
    }

    pub fn into_targets(self) -> Vec<DownloadTarget> {
        self.targets
    }
}

/// Builds the plan from the resolved assets.
///
/// Always includes core; includes the dictionary unless `min`; includes the
/// extra libraries only when they were resolved (accelerator ≠ cpu) and not
/// `min`. Targets run concurrently and must own disjoint extracted paths, so
/// a plan with two targets sharing a name or a source is rejected here
/// rather than letting them race on the filesystem.
pub fn build_plan(
    core: GhAsset,
    additional_libraries: Option<GhAsset>,
    open_jtalk_dic_url: Url,
    output: &PathBuf,
    min: bool,
) -> Result<InstallationPlan, DownloadError> {
    let mut targets = vec![DownloadTarget {
        display_name: CORE_DISPLAY_NAME.to_string(),
        source: Source::GhAsset(core),
        kind: ArchiveKind::Zip,
        stripping: Stripping::FirstDir,
        output: output.clone(),
    }];

    if !min {
        targets.push(DownloadTarget {
            display_name: OPEN_JTALK_DIC_DISPLAY_NAME.to_string(),
            source: Source::Url(open_jtalk_dic_url),
            kind: ArchiveKind::Tgz,
            stripping: Stripping::None,
            output: output.clone(),
        });

        if let Some(additional_libraries) = additional_libraries {
            targets.push(DownloadTarget {
                display_name: ADDITIONAL_LIBRARIES_DISPLAY_NAME.to_string(),
                source: Source::GhAsset(additional_libraries),
                kind: ArchiveKind::Zip,
                stripping: Stripping::FirstDir,
                output: output.clone(),
            });
        }
    }

    validate(&targets)?;
    Ok(InstallationPlan { targets })
}

/// Rejects target collisions: identical display names or identical sources
/// would make two concurrent tasks write the same extracted paths.
fn validate(targets: &[DownloadTarget]) -> Result<(), DownloadError> {
    for (i, a) in targets.iter().enumerate() {
        for b in &targets[i + 1..] {
            if a.display_name == b.display_name {
                return Err(DownloadError::InvalidPlan {
                    reason: format!("duplicate target {:?}", a.display_name),
                });
            }
            if a.source == b.source {
                return Err(DownloadError::InvalidPlan {
                    reason: format!(
                        "targets {:?} and {:?} share a download source",
                        a.display_name, b.display_name
                    ),
                });
            }
        }
        if a.kind == ArchiveKind::Tgz && a.stripping == Stripping::FirstDir {
            return Err(DownloadError::InvalidPlan {
                reason: format!(
                    "{}: first-directory stripping is not supported for tarballs",
                    a.display_name
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::RepoName;

    fn asset(repo: &str, id: u64, name: &str) -> GhAsset {
        GhAsset {
            repo: repo.parse::<RepoName>().unwrap(),
            tag: "0.14.0".to_string(),
            id,
            name: name.to_string(),
        }
    }

    fn dic_url() -> Url {
        Url::parse("https://example.com/open_jtalk_dic_utf_8-1.11.tar.gz").unwrap()
    }

    #[test]
    fn full_plan_has_three_targets_in_order() {
        let plan = build_plan(
            asset("VOICEVOX/voicevox_core", 1, "voicevox_core-linux-x64-gpu-0.14.0.zip"),
            Some(asset("VOICEVOX/voicevox_additional_libraries", 2, "CUDA-linux-x64.zip")),
            dic_url(),
            &PathBuf::from("./out"),
            false,
        )
        .unwrap();
        let names: Vec<_> = plan.targets().iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(
            names,
            ["voicevox_core", "open_jtalk_dic", "voicevox_additional_libraries"]
        );
    }

    #[test]
    fn cpu_plan_has_no_additional_libraries_target() {
        let plan = build_plan(
            asset("VOICEVOX/voicevox_core", 1, "voicevox_core-linux-x64-cpu-0.14.0.zip"),
            None,
            dic_url(),
            &PathBuf::from("./out"),
            false,
        )
        .unwrap();
        let names: Vec<_> = plan.targets().iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(names, ["voicevox_core", "open_jtalk_dic"]);
    }

    #[test]
    fn min_plan_is_core_only_regardless_of_accelerator() {
        let plan = build_plan(
            asset("VOICEVOX/voicevox_core", 1, "voicevox_core-linux-x64-gpu-0.14.0.zip"),
            Some(asset("VOICEVOX/voicevox_additional_libraries", 2, "CUDA-linux-x64.zip")),
            dic_url(),
            &PathBuf::from("./out"),
            true,
        )
        .unwrap();
        let names: Vec<_> = plan.targets().iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(names, ["voicevox_core"]);
    }

    #[test]
    fn dictionary_target_keeps_its_root_directory() {
        let plan = build_plan(
            asset("VOICEVOX/voicevox_core", 1, "voicevox_core-linux-x64-cpu-0.14.0.zip"),
            None,
            dic_url(),
            &PathBuf::from("./out"),
            false,
        )
        .unwrap();
        let dic = &plan.targets()[1];
        assert_eq!(dic.kind, ArchiveKind::Tgz);
        assert_eq!(dic.stripping, Stripping::None);
    }

    #[test]
    fn duplicate_source_is_rejected() {
        let same = asset("VOICEVOX/voicevox_core", 1, "voicevox_core-linux-x64-gpu-0.14.0.zip");
        let err = build_plan(
            same.clone(),
            Some(same),
            dic_url(),
            &PathBuf::from("./out"),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, DownloadError::InvalidPlan { .. }));
    }
}
