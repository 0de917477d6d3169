//! Product constants and the optional config file.
//!
//! The config file (`~/.config/vvdl/config.toml`) only overrides where the
//! artifacts come from; everything else is per-invocation CLI input.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Display name of the core library artifact (also its asset-name prefix).
pub const CORE_DISPLAY_NAME: &str = "voicevox_core";
/// Display name of the accelerator extra-libraries artifact.
pub const ADDITIONAL_LIBRARIES_DISPLAY_NAME: &str = "voicevox_additional_libraries";
/// Display name of the dictionary artifact.
pub const OPEN_JTALK_DIC_DISPLAY_NAME: &str = "open_jtalk_dic";

/// Default output directory for the extracted tree.
pub const DEFAULT_OUTPUT: &str = "./voicevox_core";

const DEFAULT_CORE_REPO: &str = "VOICEVOX/voicevox_core";
const DEFAULT_ADDITIONAL_LIBRARIES_REPO: &str = "VOICEVOX/voicevox_additional_libraries";
const DEFAULT_OPEN_JTALK_DIC_URL: &str = "https://jaist.dl.sourceforge.net/project/open-jtalk/Dictionary/open_jtalk_dic-1.11/open_jtalk_dic_utf_8-1.11.tar.gz";

/// Configuration loaded from `~/.config/vvdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VvdlConfig {
    /// Repository (`OWNER/REPO`) holding core library releases.
    pub core_repo: String,
    /// Repository (`OWNER/REPO`) holding the accelerator extra libraries.
    pub additional_libraries_repo: String,
    /// Direct URL of the dictionary tarball.
    pub open_jtalk_dic_url: String,
    /// Optional release-hosting API root override (no trailing slash).
    #[serde(default)]
    pub github_api_root: Option<String>,
}

impl Default for VvdlConfig {
    fn default() -> Self {
        Self {
            core_repo: DEFAULT_CORE_REPO.to_string(),
            additional_libraries_repo: DEFAULT_ADDITIONAL_LIBRARIES_REPO.to_string(),
            open_jtalk_dic_url: DEFAULT_OPEN_JTALK_DIC_URL.to_string(),
            github_api_root: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vvdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VvdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VvdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: VvdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
