//! CLI for the vvdl artifact downloader.

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use url::Url;

use vvdl_core::config;
use vvdl_core::install::{self, InstallOptions};
use vvdl_core::platform::{Accelerator, CpuArch, Os};
use vvdl_core::release::{ReleaseClient, RepoName};

/// Download voicevox_core and its companion artifacts.
#[derive(Debug, Parser)]
#[command(name = "vvdl")]
#[command(about = "Download and install voicevox_core, its dictionary and accelerator libraries", long_about = None)]
pub struct Cli {
    /// Download only the core library.
    #[arg(long, conflicts_with = "additional_libraries_version")]
    min: bool,

    /// Output directory for the extracted tree.
    #[arg(short, long, value_name = "DIRECTORY", default_value = config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// voicevox_core version: a git tag or "latest".
    #[arg(short, long, value_name = "GIT_TAG_OR_LATEST", default_value = "latest")]
    version: String,

    /// Additional-libraries version: a git tag or "latest".
    #[arg(long, value_name = "GIT_TAG_OR_LATEST", default_value = "latest")]
    additional_libraries_version: String,

    /// Accelerator to download artifacts for (cuda is published for Linux only).
    #[arg(long, value_name = "cpu|cuda|directml", default_value = "cpu")]
    accelerator: Accelerator,

    /// CPU architecture; defaults to the running host's.
    #[arg(long, value_name = "x86|x64|aarch64")]
    cpu_arch: Option<CpuArch>,

    /// Target OS; defaults to the running host's.
    #[arg(long, value_name = "windows|linux|osx")]
    os: Option<Os>,

    /// Core release repository override (OWNER/REPO).
    #[arg(long, value_name = "REPOSITORY")]
    core_repo: Option<String>,

    /// Additional-libraries release repository override (OWNER/REPO).
    #[arg(long, value_name = "REPOSITORY")]
    additional_libraries_repo: Option<String>,
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    // Without a token the release API is heavily rate limited, so pass one
    // through whenever the environment provides it.
    let token = env::var("GITHUB_TOKEN").ok();

    let core_repo: RepoName = cli
        .core_repo
        .as_deref()
        .unwrap_or(&cfg.core_repo)
        .parse()?;
    let additional_libraries_repo: RepoName = cli
        .additional_libraries_repo
        .as_deref()
        .unwrap_or(&cfg.additional_libraries_repo)
        .parse()?;
    let open_jtalk_dic_url = Url::parse(&cfg.open_jtalk_dic_url)
        .with_context(|| format!("invalid open_jtalk_dic_url {:?} in config", cfg.open_jtalk_dic_url))?;

    let client = match &cfg.github_api_root {
        Some(root) => ReleaseClient::with_api_root(root.clone(), token)?,
        None => ReleaseClient::new(token)?,
    };

    let options = InstallOptions {
        output: cli.output,
        version: cli.version,
        additional_libraries_version: cli.additional_libraries_version,
        min: cli.min,
        accelerator: cli.accelerator,
        cpu_arch: cli.cpu_arch,
        os: cli.os,
        core_repo,
        additional_libraries_repo,
        open_jtalk_dic_url,
    };
    install::run_install(&client, &options).await?;
    Ok(())
}
