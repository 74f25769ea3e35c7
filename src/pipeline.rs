//! The build pipeline.
//!
//! A linear sequence of stages, fail-fast: the first failure aborts the run
//! and the partially populated output directory is left on disk as evidence.
//! There is no retry and no rollback; a rerun requires removing the directory.

use crate::config::{BuildRequest, INSTALL_CONFIG_FILE, LIVE_ISO_FILE};
use crate::dns::{self, DnsEntry};
use crate::downloader::{self, Downloader};
use crate::errors::BuildError;
use crate::install_config::{self, ConfigOverrides};
use crate::stream;
use crate::tool_runner::ToolRunner;
use crate::tools;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Ignition bundle file name produced by the installer for SNO builds.
pub const IGNITION_FILE: &str = "bootstrap-in-place-for-live-iso.ign";

const STAGES: [&str; 6] = [
    "Prepare output directory",
    "Patch install config",
    "Fetch tools",
    "Download live ISO",
    "Generate ignition",
    "Embed ignition",
];

/// Everything a successful build leaves behind.
#[derive(Debug, Clone)]
pub struct BuildArtifacts {
    pub iso: PathBuf,
    pub credentials_dir: PathBuf,
    pub dns_entries: Vec<DnsEntry>,
}

pub struct Builder<'a> {
    request: BuildRequest,
    runner: &'a dyn ToolRunner,
    downloader: Downloader,
    base_config_path: PathBuf,
}

impl<'a> Builder<'a> {
    pub fn new(request: BuildRequest, runner: &'a dyn ToolRunner) -> Result<Self> {
        let downloader = Downloader::new(request.download_timeout_secs)?;
        Ok(Self {
            request,
            runner,
            downloader,
            base_config_path: PathBuf::from(INSTALL_CONFIG_FILE),
        })
    }

    /// Override where the base install config is read from.
    pub fn with_base_config(mut self, path: PathBuf) -> Self {
        self.base_config_path = path;
        self
    }

    /// Human-readable stage plan, for --dry-run.
    pub fn plan(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!(
            "Build plan for cluster {} (OpenShift {}, {}):",
            self.request.cluster_name, self.request.ocp_version, self.request.architecture
        ));
        for (idx, stage) in STAGES.iter().enumerate() {
            lines.push(format!("{:02}. {}", idx + 1, stage));
        }
        lines.push(format!(
            "Output directory: {}",
            self.request.output_dir().display()
        ));
        lines
    }

    pub fn run(&self) -> Result<BuildArtifacts> {
        let out_dir = self.request.output_dir();

        self.log_stage(1);
        self.prepare_output_dir(&out_dir)?;

        self.log_stage(2);
        self.patch_install_config(&out_dir)?;

        self.log_stage(3);
        let tools = tools::fetch_tools(&self.downloader, &self.request, &out_dir)?;

        self.log_stage(4);
        let iso = self.download_live_iso(&tools.installer, &out_dir)?;

        self.log_stage(5);
        let ignition = self.generate_ignition(&tools.installer, &out_dir)?;

        self.log_stage(6);
        self.runner.embed_ignition(&ignition, &iso)?;

        info!("Build complete: {}", iso.display());
        Ok(BuildArtifacts {
            iso,
            credentials_dir: out_dir.join("auth"),
            dns_entries: dns::compute_dns_entries(
                &self.request.cluster_name,
                &self.request.base_domain,
            ),
        })
    }

    fn log_stage(&self, number: usize) {
        info!("Stage {}/{}: {}", number, STAGES.len(), STAGES[number - 1]);
    }

    fn prepare_output_dir(&self, out_dir: &Path) -> Result<()> {
        if out_dir.exists() {
            return Err(BuildError::OutputAlreadyExists(out_dir.to_path_buf()).into());
        }
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        Ok(())
    }

    fn patch_install_config(&self, out_dir: &Path) -> Result<()> {
        let base = install_config::load_base_config(&self.base_config_path)?;
        let overrides = ConfigOverrides {
            base_domain: self.request.base_domain.clone(),
            cluster_name: self.request.cluster_name.clone(),
            pull_secret: install_config::read_pull_secret(&self.request.pull_secret_path)?,
            ssh_key: install_config::read_ssh_key(&self.request.ssh_key_path)?,
        };
        let patched = install_config::patch_config(&base, &overrides)?;
        install_config::write_config(&patched, &out_dir.join(INSTALL_CONFIG_FILE))
    }

    fn download_live_iso(&self, installer: &Path, out_dir: &Path) -> Result<PathBuf> {
        let stream_json = self.runner.coreos_stream_json(installer)?;
        let location = stream::resolve_iso_location(&stream_json, &self.request.architecture)?;
        let iso = out_dir.join(LIVE_ISO_FILE);
        self.downloader.fetch(&location, &iso)?;
        if let Some(expected) = &self.request.iso_checksum {
            downloader::verify_sha256(&iso, expected)?;
        }
        Ok(iso)
    }

    fn generate_ignition(&self, installer: &Path, out_dir: &Path) -> Result<PathBuf> {
        self.runner.create_ignition(installer, out_dir)?;
        let ignition = out_dir.join(IGNITION_FILE);
        if !ignition.is_file() {
            return Err(BuildError::IgnitionGeneration(format!(
                "installer did not produce {}",
                ignition.display()
            ))
            .into());
        }
        Ok(ignition)
    }
}
