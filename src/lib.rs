//! Single Node OpenShift image builder.
//!
//! Orchestrates the external OpenShift tooling into one linear pipeline that
//! turns an `install-config.yaml`, a pull secret and an SSH key into a
//! ready-to-boot live ISO with the ignition config embedded.

pub mod cli;
pub mod config;
pub mod dns;
pub mod downloader;
pub mod errors;
pub mod install_config;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod stream;
pub mod tool_runner;
pub mod tools;
