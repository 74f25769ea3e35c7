//! CLI argument parsing.
//!
//! Every input also has an environment-variable fallback so the builder can be
//! driven from a plain shell environment, the way the original workflow was.

use crate::config::{BuildParams, DEFAULT_DOWNLOAD_TIMEOUT_SECS};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "snobuilder")]
#[command(about = "Builds a ready-to-boot Single Node OpenShift installation ISO")]
#[command(long_about = "Builds a ready-to-boot Single Node OpenShift installation ISO.\n\n\
    Downloads the versioned OpenShift client and installer, patches the local\n\
    install-config.yaml with cluster name, domain, pull secret and SSH key,\n\
    generates a single-node ignition config, downloads the matching live\n\
    image and embeds the ignition into it.")]
pub struct Cli {
    /// OpenShift version to build (e.g. "4.14.3")
    #[arg(long, env = "VERSION")]
    pub version: Option<String>,

    /// Path to the registry pull secret file
    #[arg(long, env = "PULL_SECRET_FILE_PATH")]
    pub pull_secret_file: Option<PathBuf>,

    /// Path to the SSH public key embedded into the cluster config
    #[arg(long, env = "SSH_PUB_KEY_FILE_PATH")]
    pub ssh_public_key_file: Option<PathBuf>,

    /// Cluster name (default: derived from the version)
    #[arg(long, env = "CLUSTER_NAME")]
    pub cluster_name: Option<String>,

    /// Target CPU architecture for the live image
    #[arg(long, env = "ARCH")]
    pub architecture: Option<String>,

    /// Base DNS domain the cluster is rooted under
    #[arg(long, env = "BASE_DOMAIN")]
    pub base_domain: Option<String>,

    /// Directory the output directory is created in
    #[arg(long, default_value = ".")]
    pub output_root: PathBuf,

    /// Mirror base URL for the client/installer archives
    #[arg(long, env = "OCP_MIRROR")]
    pub mirror_base: Option<String>,

    /// Expected SHA-256 of the downloaded live image (verified when set)
    #[arg(long)]
    pub iso_checksum: Option<String>,

    /// Per-download timeout in seconds
    #[arg(long, default_value_t = DEFAULT_DOWNLOAD_TIMEOUT_SECS)]
    pub download_timeout_secs: u64,

    /// Print the stage plan and exit without side effects
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn into_params(self) -> BuildParams {
        BuildParams {
            version: self.version,
            cluster_name: self.cluster_name,
            architecture: self.architecture,
            base_domain: self.base_domain,
            pull_secret_file: self.pull_secret_file,
            ssh_public_key_file: self.ssh_public_key_file,
            output_root: Some(self.output_root),
            mirror_base: self.mirror_base,
            iso_checksum: self.iso_checksum,
            download_timeout_secs: Some(self.download_timeout_secs),
        }
    }
}
