//! Orchestrator: resolve releases, fan out downloads, extract, report.
//!
//! Release resolution is sequential (metadata-only); downloads and
//! extractions run concurrently, one task per artifact. Any task failure is
//! fatal to the run, but the run still waits for every task so completed
//! artifacts stay on disk (no rollback).

use std::path::PathBuf;

use tokio::task::JoinSet;
use tracing::info;
use url::Url;

use crate::archive;
use crate::asset_name::{additional_libraries_asset_name, core_asset_name};
use crate::config::CORE_DISPLAY_NAME;
use crate::error::DownloadError;
use crate::plan::{build_plan, DownloadTarget, InstallationPlan, Source};
use crate::platform::{Accelerator, CpuArch, Os};
use crate::release::{ReleaseClient, RepoName};

/// Per-invocation inputs, already reduced to plain values by the CLI.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Root of the extracted tree; created if absent.
    pub output: PathBuf,
    /// Core version: explicit tag or "latest".
    pub version: String,
    /// Extra-libraries version: explicit tag or "latest".
    pub additional_libraries_version: String,
    /// Suppresses the dictionary and extra-libraries targets.
    pub min: bool,
    pub accelerator: Accelerator,
    /// Override; the running host's architecture when `None`.
    pub cpu_arch: Option<CpuArch>,
    /// Override; the running host's OS when `None`.
    pub os: Option<Os>,
    pub core_repo: RepoName,
    pub additional_libraries_repo: RepoName,
    pub open_jtalk_dic_url: Url,
}

/// Runs one full acquisition: platform resolution, release lookup, plan
/// build, concurrent download + extraction.
pub async fn run_install(
    client: &ReleaseClient,
    options: &InstallOptions,
) -> Result<(), DownloadError> {
    // Platform must resolve before any network activity.
    let os = match options.os {
        Some(os) => os,
        None => Os::default_for_host()?,
    };
    let cpu_arch = match options.cpu_arch {
        Some(arch) => arch,
        None => CpuArch::default_for_host()?,
    };
    let accelerator = options.accelerator;

    let core = client
        .find_asset(&options.core_repo, &options.version, |tag| {
            core_asset_name(tag, os, cpu_arch, accelerator)
        })
        .await?;

    // The extra-libraries release is never even looked up for cpu.
    let additional_libraries = if accelerator == Accelerator::Cpu {
        None
    } else {
        let name = additional_libraries_asset_name(os, cpu_arch, accelerator)?;
        Some(
            client
                .find_asset(
                    &options.additional_libraries_repo,
                    &options.additional_libraries_version,
                    move |_| name,
                )
                .await?,
        )
    };

    info!("target OS: {os}");
    info!("target CPU architecture: {cpu_arch}");
    info!("accelerator: {accelerator}");
    info!("{CORE_DISPLAY_NAME} version: {}", core.tag);
    if let Some(additional_libraries) = &additional_libraries {
        info!("additional libraries version: {}", additional_libraries.tag);
    }

    let plan = build_plan(
        core,
        additional_libraries,
        options.open_jtalk_dic_url.clone(),
        &options.output,
        options.min,
    )?;
    execute(client, plan).await
}

/// Launches one task per target and waits for all of them; the first error
/// is reported after every task has settled.
async fn execute(client: &ReleaseClient, plan: InstallationPlan) -> Result<(), DownloadError> {
    let mut tasks = JoinSet::new();
    for target in plan.into_targets() {
        let client = client.clone();
        tasks.spawn(async move { download_and_extract(&client, target).await });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let result = match joined {
            Ok(result) => result,
            Err(source) => Err(DownloadError::TaskFailed { source }),
        };
        if let Err(error) = result {
            if first_error.is_none() {
                first_error = Some(error);
            }
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => {
            info!("all requested artifacts are installed");
            Ok(())
        }
    }
}

async fn download_and_extract(
    client: &ReleaseClient,
    target: DownloadTarget,
) -> Result<(), DownloadError> {
    info!("{}: downloading", target.display_name);
    let bytes = match &target.source {
        Source::GhAsset(asset) => client.fetch_asset(asset).await?,
        Source::Url(url) => client.fetch_url(url, target.kind).await?,
    };

    info!("{}: extracting", target.display_name);
    archive::extract(
        bytes,
        target.kind,
        target.stripping,
        &target.output,
        &target.display_name,
    )
    .await?;

    info!("{}: done", target.display_name);
    Ok(())
}
