//! CoreOS stream metadata resolution.
//!
//! The installer's `coreos print-stream-json` output lists artifacts per
//! architecture, per media, per format. The build needs exactly one live ISO
//! for the requested architecture; zero candidates and ambiguous multi-match
//! are both hard failures rather than a silent pick.

use crate::errors::BuildError;
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

#[derive(Debug, Deserialize)]
struct Stream {
    #[serde(default)]
    architectures: BTreeMap<String, Architecture>,
}

#[derive(Debug, Deserialize)]
struct Architecture {
    #[serde(default)]
    artifacts: BTreeMap<String, Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(default)]
    formats: BTreeMap<String, Format>,
}

#[derive(Debug, Deserialize)]
struct Format {
    disk: Option<Disk>,
}

#[derive(Debug, Deserialize)]
struct Disk {
    location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoCandidate {
    pub media: String,
    pub format: String,
    pub location: String,
}

/// Extract the live-ISO download location for `architecture` from the stream
/// JSON, failing on zero or multiple matches.
pub fn resolve_iso_location(stream_json: &str, architecture: &str) -> Result<String> {
    let stream: Stream = serde_json::from_str(stream_json)
        .map_err(|err| BuildError::ImageResolution(format!("invalid stream metadata: {err}")))?;

    let arch_entry = stream.architectures.get(architecture).ok_or_else(|| {
        BuildError::ImageResolution(format!(
            "stream metadata has no artifacts for architecture {architecture}"
        ))
    })?;

    let candidates = collect_iso_candidates(arch_entry);
    let location = match candidates.as_slice() {
        [only] => only.location.clone(),
        [] => {
            return Err(BuildError::ImageResolution(format!(
                "no ISO artifact found for architecture {architecture}"
            ))
            .into())
        }
        many => {
            let listing = many
                .iter()
                .map(|c| format!("{}/{}", c.media, c.format))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(BuildError::ImageResolution(format!(
                "ambiguous ISO artifacts for architecture {architecture}: {listing}"
            ))
            .into());
        }
    };

    Url::parse(&location).map_err(|err| {
        BuildError::ImageResolution(format!("stream location {location} is not a URL: {err}"))
    })?;
    Ok(location)
}

fn collect_iso_candidates(arch_entry: &Architecture) -> Vec<IsoCandidate> {
    let mut candidates = Vec::new();
    for (media, media_entry) in &arch_entry.artifacts {
        for (format, format_entry) in &media_entry.formats {
            if !format.contains("iso") {
                continue;
            }
            if let Some(disk) = &format_entry.disk {
                candidates.push(IsoCandidate {
                    media: media.clone(),
                    format: format.clone(),
                    location: disk.location.clone(),
                });
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stream_with(archs: serde_json::Value) -> String {
        json!({ "stream": "rhcos-4.14", "architectures": archs }).to_string()
    }

    #[test]
    fn resolves_single_iso_location() {
        let stream = stream_with(json!({
            "x86_64": {
                "artifacts": {
                    "metal": {
                        "formats": {
                            "iso": { "disk": { "location": "https://mirror/rhcos-live.x86_64.iso" } },
                            "raw.gz": { "disk": { "location": "https://mirror/rhcos.raw.gz" } }
                        }
                    }
                }
            }
        }));
        let location = resolve_iso_location(&stream, "x86_64").unwrap();
        assert_eq!(location, "https://mirror/rhcos-live.x86_64.iso");
    }

    #[test]
    fn unknown_architecture_fails() {
        let stream = stream_with(json!({
            "x86_64": { "artifacts": {} }
        }));
        let err = resolve_iso_location(&stream, "aarch64").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ImageResolution(_))
        ));
    }

    #[test]
    fn zero_iso_candidates_fail() {
        let stream = stream_with(json!({
            "aarch64": {
                "artifacts": {
                    "metal": { "formats": { "raw.gz": { "disk": { "location": "https://x/raw" } } } }
                }
            }
        }));
        let err = resolve_iso_location(&stream, "aarch64").unwrap_err();
        assert!(format!("{err}").contains("no ISO artifact"));
    }

    #[test]
    fn ambiguous_candidates_fail_instead_of_last_wins() {
        let stream = stream_with(json!({
            "x86_64": {
                "artifacts": {
                    "metal": { "formats": { "iso": { "disk": { "location": "https://a/live.iso" } } } },
                    "metal4k": { "formats": { "iso": { "disk": { "location": "https://b/live.iso" } } } }
                }
            }
        }));
        let err = resolve_iso_location(&stream, "x86_64").unwrap_err();
        assert!(format!("{err}").contains("ambiguous"));
    }

    #[test]
    fn non_url_location_fails() {
        let stream = stream_with(json!({
            "x86_64": {
                "artifacts": {
                    "metal": { "formats": { "iso": { "disk": { "location": "not a url" } } } }
                }
            }
        }));
        let err = resolve_iso_location(&stream, "x86_64").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ImageResolution(_))
        ));
    }
}
