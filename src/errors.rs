use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for builder operations
pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Output directory already exists: {} (remove it before retrying)", .0.display())]
    OutputAlreadyExists(PathBuf),

    #[error("Failed to patch install config: {0}")]
    ConfigPatch(String),

    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("Could not resolve OS image location: {0}")]
    ImageResolution(String),

    #[error("Ignition generation failed: {0}")]
    IgnitionGeneration(String),

    #[error("Failed to embed ignition into ISO: {0}")]
    Embed(String),
}
