//! Target platform descriptor: OS, CPU architecture, accelerator.
//!
//! Defaults are derived from the running process (`std::env::consts`); an
//! architecture with no mapping fails the run before any network activity.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::DownloadError;

/// Operating system an artifact is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    Linux,
    Osx,
}

impl Os {
    /// Maps a raw OS identifier (`std::env::consts::OS` vocabulary); `macos`
    /// becomes `osx`, `windows` and `linux` pass through.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "windows" => Some(Os::Windows),
            "linux" => Some(Os::Linux),
            "macos" => Some(Os::Osx),
            _ => None,
        }
    }

    /// OS of the running process.
    pub fn default_for_host() -> Result<Self, DownloadError> {
        Self::from_raw(env::consts::OS).ok_or_else(|| DownloadError::UnsupportedOs {
            raw: env::consts::OS.to_string(),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::Osx => "osx",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "windows" => Ok(Os::Windows),
            "linux" => Ok(Os::Linux),
            "osx" => Ok(Os::Osx),
            _ => Err(DownloadError::InvalidLabel {
                what: "OS",
                value: s.to_string(),
            }),
        }
    }
}

/// CPU architecture an artifact is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuArch {
    X86,
    X64,
    Aarch64,
}

impl CpuArch {
    /// Maps a raw architecture identifier (`std::env::consts::ARCH`
    /// vocabulary). Anything outside the table is unsupported.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "x86" => Some(CpuArch::X86),
            "x86_64" => Some(CpuArch::X64),
            "aarch64" => Some(CpuArch::Aarch64),
            _ => None,
        }
    }

    /// Architecture of the running process; surfaces the raw identifier in
    /// the error so the user sees what was detected.
    pub fn default_for_host() -> Result<Self, DownloadError> {
        Self::from_raw(env::consts::ARCH).ok_or_else(|| DownloadError::UnsupportedArch {
            raw: env::consts::ARCH.to_string(),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CpuArch::X86 => "x86",
            CpuArch::X64 => "x64",
            CpuArch::Aarch64 => "aarch64",
        }
    }
}

impl fmt::Display for CpuArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CpuArch {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86" => Ok(CpuArch::X86),
            "x64" => Ok(CpuArch::X64),
            "aarch64" => Ok(CpuArch::Aarch64),
            _ => Err(DownloadError::InvalidLabel {
                what: "CPU architecture",
                value: s.to_string(),
            }),
        }
    }
}

/// Hardware execution backend the artifacts should support. Decides which
/// optional artifacts are planned and how asset names are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    Cpu,
    Cuda,
    Directml,
}

impl Accelerator {
    pub fn as_str(self) -> &'static str {
        match self {
            Accelerator::Cpu => "cpu",
            Accelerator::Cuda => "cuda",
            Accelerator::Directml => "directml",
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accelerator {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Accelerator::Cpu),
            "cuda" => Ok(Accelerator::Cuda),
            "directml" => Ok(Accelerator::Directml),
            _ => Err(DownloadError::InvalidLabel {
                what: "accelerator",
                value: s.to_string(),
            }),
        }
    }
}
