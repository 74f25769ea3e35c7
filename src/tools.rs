//! Fetching and unpacking of the versioned client and installer archives.

use crate::config::BuildRequest;
use crate::downloader::Downloader;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::info;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tar::Archive;

pub const CLIENT_ARCHIVE: &str = "openshift-client-linux.tar.gz";
pub const INSTALLER_ARCHIVE: &str = "openshift-install-linux.tar.gz";

const TOOL_BINARIES: [&str; 3] = ["oc", "kubectl", "openshift-install"];

/// Extracted tool binaries inside the output directory.
#[derive(Debug, Clone)]
pub struct ToolBinaries {
    pub oc: PathBuf,
    pub installer: PathBuf,
}

/// Fetch both tool archives into `out_dir`, unpack them in place, remove the
/// archives and mark the binaries executable.
pub fn fetch_tools(
    downloader: &Downloader,
    request: &BuildRequest,
    out_dir: &Path,
) -> Result<ToolBinaries> {
    for archive in [CLIENT_ARCHIVE, INSTALLER_ARCHIVE] {
        let url = request.archive_url(archive);
        let dest = out_dir.join(archive);
        downloader.fetch(&url, &dest)?;
        extract_tar_gz(&dest, out_dir)
            .with_context(|| format!("failed to unpack {}", archive))?;
        let _ = fs::remove_file(&dest);
    }

    for name in TOOL_BINARIES {
        let path = out_dir.join(name);
        if path.is_file() {
            mark_executable(&path)?;
        }
    }

    let installer = out_dir.join("openshift-install");
    if !installer.is_file() {
        anyhow::bail!(
            "installer archive did not contain openshift-install (looked in {})",
            out_dir.display()
        );
    }
    info!("Tools extracted to {}", out_dir.display());

    Ok(ToolBinaries {
        oc: out_dir.join("oc"),
        installer,
    })
}

fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("failed to open {}", archive_path.display()))?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);
    archive
        .unpack(dest)
        .with_context(|| format!("failed to extract into {}", dest.display()))?;
    Ok(())
}

fn mark_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("failed to chmod {}", path.display()))?;
    Ok(())
}
