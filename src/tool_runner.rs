//! Interfaces to the external OpenShift tooling.
//!
//! The ignition embed runs a privileged `coreos-installer` container with host
//! device access; it is isolated behind [`ToolRunner`] so the pipeline never
//! reasons about device permissions, and tests can substitute a mock.

use crate::errors::BuildError;
use crate::process;
use anyhow::Result;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

pub const EMBED_CONTAINER_IMAGE: &str = "quay.io/coreos/coreos-installer:release";

pub trait ToolRunner {
    /// Query the installer's CoreOS stream metadata, returning the raw JSON.
    fn coreos_stream_json(&self, installer: &Path) -> Result<String>;

    /// Generate the single-node ignition bundle from the install config in `dir`.
    fn create_ignition(&self, installer: &Path, dir: &Path) -> Result<()>;

    /// Embed `ignition` into `iso` in place. Requires privileged host access.
    fn embed_ignition(&self, ignition: &Path, iso: &Path) -> Result<()>;
}

pub struct ShellToolRunner {
    pub stream_timeout: Duration,
    pub ignition_timeout: Duration,
    pub embed_timeout: Duration,
}

impl Default for ShellToolRunner {
    fn default() -> Self {
        Self {
            stream_timeout: Duration::from_secs(120),
            ignition_timeout: Duration::from_secs(600),
            embed_timeout: Duration::from_secs(1800),
        }
    }
}

impl ToolRunner for ShellToolRunner {
    fn coreos_stream_json(&self, installer: &Path) -> Result<String> {
        let mut cmd = Command::new(installer);
        cmd.args(["coreos", "print-stream-json"]);
        process::capture_stdout("openshift-install", &mut cmd, self.stream_timeout)
            .map_err(|err| BuildError::ImageResolution(format!("stream query failed: {err}")).into())
    }

    fn create_ignition(&self, installer: &Path, dir: &Path) -> Result<()> {
        let mut cmd = Command::new(installer);
        cmd.arg("create")
            .arg("single-node-ignition-config")
            .arg("--dir")
            .arg(dir);
        process::run_checked("openshift-install", &mut cmd, self.ignition_timeout)
            .map_err(|err| BuildError::IgnitionGeneration(err.to_string()).into())
    }

    fn embed_ignition(&self, ignition: &Path, iso: &Path) -> Result<()> {
        let data_dir = iso.parent().ok_or_else(|| {
            BuildError::Embed(format!("ISO path {} has no parent directory", iso.display()))
        })?;
        if ignition.parent() != Some(data_dir) {
            return Err(BuildError::Embed(format!(
                "ignition {} and ISO {} must live in the same directory",
                ignition.display(),
                iso.display()
            ))
            .into());
        }
        let ignition_name = file_name(ignition)?;
        let iso_name = file_name(iso)?;

        let mut cmd = Command::new("podman");
        cmd.arg("run")
            .arg("--privileged")
            .arg("--pull")
            .arg("always")
            .arg("--rm")
            .arg("-v")
            .arg("/dev:/dev")
            .arg("-v")
            .arg("/run/udev:/run/udev")
            .arg("-v")
            .arg(format!("{}:/data", data_dir.display()))
            .arg("-w")
            .arg("/data")
            .arg(EMBED_CONTAINER_IMAGE)
            .args(["iso", "ignition", "embed", "-fi"])
            .arg(ignition_name)
            .arg(iso_name);
        process::run_checked("coreos-installer", &mut cmd, self.embed_timeout)
            .map_err(|err| BuildError::Embed(err.to_string()).into())
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| BuildError::Embed(format!("{} has no file name", path.display())).into())
}
