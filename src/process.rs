//! Subprocess helpers with explicit timeouts.
//!
//! Every collaborator this builder shells out to runs under a deadline; a hung
//! external tool must not hang the whole pipeline.

use anyhow::{Context, Result};
use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Run a command to completion, requiring exit status zero.
///
/// On non-zero exit the error message carries the captured stderr.
pub fn run_checked(program: &str, cmd: &mut Command, timeout: Duration) -> Result<()> {
    let output = collect_output(program, cmd, timeout)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "{} exited with {} — {}",
            program,
            output.status,
            stderr.trim()
        );
    }
    Ok(())
}

/// Run a command and return its stdout as UTF-8, requiring exit status zero.
pub fn capture_stdout(program: &str, cmd: &mut Command, timeout: Duration) -> Result<String> {
    let output = collect_output(program, cmd, timeout)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "{} exited with {} — {}",
            program,
            output.status,
            stderr.trim()
        );
    }
    String::from_utf8(output.stdout).with_context(|| format!("{} produced non-UTF-8 output", program))
}

fn collect_output(program: &str, cmd: &mut Command, timeout: Duration) -> Result<Output> {
    // Never let a command block waiting for input.
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {}", program))?;

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();
    let stdout_handle = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout.take() {
            let _ = out.read_to_end(&mut buf);
        }
        buf
    });
    let stderr_handle = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr.take() {
            let _ = err.read_to_end(&mut buf);
        }
        buf
    });

    let status = match child.wait_timeout(timeout).context("wait_timeout failed")? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            let _ = stdout_handle.join();
            let _ = stderr_handle.join();
            anyhow::bail!("{} timed out after {}s", program, timeout.as_secs());
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_stdout_returns_output() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let out = capture_stdout("echo", &mut cmd, Duration::from_secs(5)).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn run_checked_reports_failure_with_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"]);
        let err = run_checked("sh", &mut cmd, Duration::from_secs(5)).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("boom"), "unexpected error: {msg}");
    }

    #[test]
    fn timeout_kills_hung_command() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let err = run_checked("sleep", &mut cmd, Duration::from_millis(100)).unwrap_err();
        assert!(format!("{err}").contains("timed out"));
    }
}
