use std::fs;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn dry_run_prints_the_stage_plan_without_side_effects() {
    let tmp = TempDir::new().unwrap();
    let secret = tmp.path().join("pull-secret.json");
    let key = tmp.path().join("id_ed25519.pub");
    fs::write(&secret, "{\"auths\":{}}").unwrap();
    fs::write(&key, "ssh-ed25519 AAAA").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_snobuilder"))
        .arg("--dry-run")
        .arg("--version")
        .arg("4.14.3")
        .arg("--pull-secret-file")
        .arg(&secret)
        .arg("--ssh-public-key-file")
        .arg(&key)
        .arg("--output-root")
        .arg(tmp.path())
        .env_remove("VERSION")
        .env_remove("CLUSTER_NAME")
        .output()
        .expect("failed to run snobuilder binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Build plan for cluster greyerof-4-14-3"));
    assert!(stdout.contains("Embed ignition"));
    assert!(stdout.contains("ocp_greyerof-4-14-3"));
    assert!(!tmp.path().join("ocp_greyerof-4-14-3").exists());
}

#[test]
fn missing_required_inputs_exit_non_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_snobuilder"))
        .arg("--dry-run")
        .env_remove("VERSION")
        .env_remove("PULL_SECRET_FILE_PATH")
        .env_remove("SSH_PUB_KEY_FILE_PATH")
        .output()
        .expect("failed to run snobuilder binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing required input"));
}
