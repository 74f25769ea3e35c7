//! Artifact downloads.
//!
//! Single attempt, fail-fast: a non-success status or a transport error aborts
//! the pipeline immediately. Certificate validation is disabled so the builder
//! also works against lab mirrors with private CAs; this is an operational
//! trust trade-off, not an oversight.

use crate::errors::BuildError;
use anyhow::{Context, Result};
use log::info;
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(true)
            .user_agent("snobuilder")
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` into `dest`. Partial files are removed on failure so a
    /// failed stage never leaves a half-written artifact behind.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        info!("Downloading {} -> {}", url, dest.display());
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| BuildError::Download {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(BuildError::Download {
                url: url.to_string(),
                reason: format!("server returned {}", response.status()),
            }
            .into());
        }

        let mut response = response;
        let mut file = File::create(dest)
            .with_context(|| format!("failed to create {}", dest.display()))?;
        match io::copy(&mut response, &mut file) {
            Ok(bytes) => {
                info!("Downloaded {} bytes", bytes);
                Ok(bytes)
            }
            Err(err) => {
                drop(file);
                let _ = fs::remove_file(dest);
                Err(BuildError::Download {
                    url: url.to_string(),
                    reason: err.to_string(),
                }
                .into())
            }
        }
    }
}

/// Verify the SHA-256 of a file against a hex digest.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let mut file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    let computed = format!("{:x}", hasher.finalize());
    if !computed.eq_ignore_ascii_case(expected) {
        anyhow::bail!(
            "checksum mismatch for {}: {} != {}",
            path.display(),
            computed,
            expected
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use tempfile::tempdir;

    #[test]
    fn fetch_writes_destination_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blob");
            then.status(200).body(b"payload");
        });
        let dir = tempdir().unwrap();
        let dest = dir.path().join("blob.bin");
        let downloader = Downloader::new(5).unwrap();
        let bytes = downloader.fetch(&server.url("/blob"), &dest).unwrap();
        assert_eq!(bytes, 7);
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn non_success_status_is_a_download_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing.bin");
        let downloader = Downloader::new(5).unwrap();
        let err = downloader.fetch(&server.url("/missing"), &dest).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::Download { .. })
        ));
        assert!(!dest.exists());
    }

    #[test]
    fn sha256_verification() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data");
        fs::write(&path, b"abc").unwrap();
        let good = format!("{:x}", Sha256::digest(b"abc"));
        verify_sha256(&path, &good).unwrap();
        assert!(verify_sha256(&path, "deadbeef").is_err());
    }
}
