//! Build request validation and derived naming.
//!
//! All inputs are collected into a [`BuildParams`] and validated exactly once;
//! the resulting [`BuildRequest`] is immutable for the rest of the pipeline.

use crate::errors::BuildError;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Fixed-name base configuration file consumed from the working directory.
pub const INSTALL_CONFIG_FILE: &str = "install-config.yaml";

/// File name the downloaded live image is stored under.
pub const LIVE_ISO_FILE: &str = "rhcos-live.iso";

/// Default mirror hosting the versioned client/installer archives.
pub const DEFAULT_MIRROR_BASE: &str = "https://mirror.openshift.com/pub/openshift-v4/clients/ocp";

pub const DEFAULT_ARCHITECTURE: &str = "x86_64";
pub const DEFAULT_BASE_DOMAIN: &str = "example.com";
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 600;

const CLUSTER_NAME_PREFIX: &str = "greyerof";
const OUTPUT_DIR_PREFIX: &str = "ocp_";

/// Raw, unvalidated inputs (CLI flags or environment variables).
#[derive(Debug, Clone, Default)]
pub struct BuildParams {
    pub version: Option<String>,
    pub cluster_name: Option<String>,
    pub architecture: Option<String>,
    pub base_domain: Option<String>,
    pub pull_secret_file: Option<PathBuf>,
    pub ssh_public_key_file: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub mirror_base: Option<String>,
    pub iso_checksum: Option<String>,
    pub download_timeout_secs: Option<u64>,
}

/// A validated, immutable build request.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub ocp_version: String,
    pub cluster_name: String,
    pub architecture: String,
    pub base_domain: String,
    pub pull_secret_path: PathBuf,
    pub ssh_key_path: PathBuf,
    pub output_root: PathBuf,
    pub mirror_base: String,
    pub iso_checksum: Option<String>,
    pub download_timeout_secs: u64,
}

impl BuildRequest {
    /// Validate raw parameters. Fails before any side effect: no directory is
    /// created and no network request is made until this succeeds.
    pub fn validate(params: BuildParams) -> Result<Self> {
        let ocp_version = require_non_empty(params.version, "version")?;
        let pull_secret_path = require_path(params.pull_secret_file, "pull secret file path")?;
        let ssh_key_path = require_path(params.ssh_public_key_file, "SSH public key file path")?;

        let cluster_name = match params.cluster_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => derived_cluster_name(&ocp_version),
        };

        Ok(Self {
            ocp_version,
            cluster_name,
            architecture: params
                .architecture
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ARCHITECTURE.to_string()),
            base_domain: params
                .base_domain
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_DOMAIN.to_string()),
            pull_secret_path,
            ssh_key_path,
            output_root: params.output_root.unwrap_or_else(|| PathBuf::from(".")),
            mirror_base: params
                .mirror_base
                .unwrap_or_else(|| DEFAULT_MIRROR_BASE.to_string()),
            iso_checksum: params.iso_checksum,
            download_timeout_secs: params
                .download_timeout_secs
                .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
        })
    }

    /// Output directory is a pure function of the cluster name.
    pub fn output_dir(&self) -> PathBuf {
        self.output_root
            .join(format!("{}{}", OUTPUT_DIR_PREFIX, self.cluster_name))
    }

    pub fn archive_url(&self, archive: &str) -> String {
        format!("{}/{}/{}", self.mirror_base, self.ocp_version, archive)
    }
}

/// Default cluster name slug: version with dots replaced by dashes.
pub fn derived_cluster_name(version: &str) -> String {
    format!("{}-{}", CLUSTER_NAME_PREFIX, version.replace('.', "-"))
}

fn require_non_empty(value: Option<String>, what: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(BuildError::MissingInput(what).into()),
    }
}

fn require_path(value: Option<PathBuf>, what: &'static str) -> Result<PathBuf> {
    let path = match value {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Err(BuildError::MissingInput(what).into()),
    };
    if !Path::new(&path).is_file() {
        return Err(BuildError::FileNotFound(path).into());
    }
    Ok(path)
}
