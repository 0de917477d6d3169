//! Release asset naming.
//!
//! The upstream naming scheme is asymmetric: some labels are rewritten per
//! OS, some unconditionally. The rewrites are encoded as explicit match
//! tables so each cell stays auditable; do not fold them into string
//! heuristics.

use crate::config::CORE_DISPLAY_NAME;
use crate::error::DownloadError;
use crate::platform::{Accelerator, CpuArch, Os};

/// Asset filename of the core library for one release tag.
///
/// Linux releases label `aarch64` as `arm64` and `cuda` as `gpu`; every other
/// OS keeps the canonical labels.
pub fn core_asset_name(tag: &str, os: Os, arch: CpuArch, accelerator: Accelerator) -> String {
    let arch = match (os, arch) {
        (Os::Linux, CpuArch::Aarch64) => "arm64",
        (_, arch) => arch.as_str(),
    };
    let accelerator = match (os, accelerator) {
        (Os::Linux, Accelerator::Cuda) => "gpu",
        (_, accelerator) => accelerator.as_str(),
    };
    format!("{CORE_DISPLAY_NAME}-{os}-{arch}-{accelerator}-{tag}.zip")
}

/// Asset filename of the accelerator extra libraries. Not tagged: the same
/// name matches any release of that repository.
///
/// The accelerator is rendered in its display form (`CUDA` / `DirectML`) on
/// every OS; the architecture is never rewritten. There is no cpu variant of
/// this artifact, so asking for one is a planning bug.
pub fn additional_libraries_asset_name(
    os: Os,
    arch: CpuArch,
    accelerator: Accelerator,
) -> Result<String, DownloadError> {
    let accelerator = match accelerator {
        Accelerator::Cuda => "CUDA",
        Accelerator::Directml => "DirectML",
        Accelerator::Cpu => {
            return Err(DownloadError::InvalidPlan {
                reason: "no additional libraries exist for the cpu accelerator".to_string(),
            })
        }
    };
    Ok(format!("{accelerator}-{os}-{arch}.zip"))
}
