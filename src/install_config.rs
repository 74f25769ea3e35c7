//! Patching of the base `install-config.yaml`.
//!
//! The base document is loaded once, the four cluster-specific fields are
//! overridden in a fixed order on the in-memory document, and the result is
//! written into the output directory. The input file is never mutated.

use crate::errors::BuildError;
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Field values applied over the base document.
#[derive(Debug, Clone)]
pub struct ConfigOverrides {
    pub base_domain: String,
    pub cluster_name: String,
    /// Raw pull secret JSON, embedded as a literal string value.
    pub pull_secret: String,
    pub ssh_key: String,
}

pub fn load_base_config(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(BuildError::FileNotFound(path.to_path_buf()).into());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .map_err(|err| BuildError::ConfigPatch(format!("{} is not valid YAML: {err}", path.display())).into())
}

/// Read the pull secret, rejecting anything that is not a JSON document.
pub fn read_pull_secret(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read pull secret {}", path.display()))?;
    let trimmed = raw.trim().to_string();
    serde_json::from_str::<serde_json::Value>(&trimmed).map_err(|err| {
        BuildError::ConfigPatch(format!("pull secret {} is not valid JSON: {err}", path.display()))
    })?;
    Ok(trimmed)
}

pub fn read_ssh_key(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read SSH public key {}", path.display()))?;
    Ok(raw.trim().to_string())
}

/// Apply the four overrides in order: baseDomain, metadata.name, pullSecret,
/// sshKey. Idempotent: patching an already patched document is a no-op.
pub fn patch_config(base: &Value, overrides: &ConfigOverrides) -> Result<Value> {
    let mut doc = base.clone();
    set_field(&mut doc, &["baseDomain"], overrides.base_domain.as_str())?;
    set_field(&mut doc, &["metadata", "name"], overrides.cluster_name.as_str())?;
    set_field(&mut doc, &["pullSecret"], overrides.pull_secret.as_str())?;
    set_field(&mut doc, &["sshKey"], overrides.ssh_key.as_str())?;
    Ok(doc)
}

pub fn write_config(doc: &Value, path: &Path) -> Result<()> {
    let rendered = serde_yaml::to_string(doc)
        .map_err(|err| BuildError::ConfigPatch(format!("failed to serialize patched config: {err}")))?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn set_field(doc: &mut Value, path: &[&str], value: &str) -> Result<()> {
    let mut cursor = doc;
    for (idx, key) in path.iter().enumerate() {
        let map = cursor.as_mapping_mut().ok_or_else(|| {
            BuildError::ConfigPatch(format!(
                "cannot set {}: parent is not a mapping",
                path.join(".")
            ))
        })?;
        let entry = map
            .entry(Value::String(key.to_string()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if idx == path.len() - 1 {
            *entry = Value::String(value.to_string());
            return Ok(());
        }
        if entry.is_null() {
            *entry = Value::Mapping(Mapping::new());
        }
        cursor = entry;
    }
    Ok(())
}
