//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for driving the mw and mwd binaries.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

// Aggressive timeouts for fast tests.
const MW_TIMEOUT_RESPONSE_MS: &str = "2000";
const MW_RESPONSE_POLL_MS: &str = "5";
const MW_BRIDGE_POLL_MS: &str = "20";
const MW_MONITOR_POLL_MS: &str = "50";
const MW_DEBOUNCE_MS: &str = "20";
const MW_GROUND_TRUTH_TIMEOUT_MS: &str = "500";

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Returns the path to a workspace binary.
///
/// Falls back to resolving relative to the test binary itself, which lives
/// at target/debug/deps/specs-<hash>, and finally to assert_cmd's lookup.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    assert_cmd::cargo::cargo_bin(name)
}

pub fn mw_binary() -> PathBuf {
    binary_path("mw")
}

pub fn mwd_binary() -> PathBuf {
    binary_path("mwd")
}

/// Create a CLI builder for mw commands
pub fn cli() -> CliBuilder {
    CliBuilder::new(mw_binary())
}

/// Fluent builder for a single binary invocation
pub struct CliBuilder {
    binary: PathBuf,
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            args: Vec::new(),
            dir: None,
            envs: vec![
                ("MW_TIMEOUT_RESPONSE_MS".into(), MW_TIMEOUT_RESPONSE_MS.into()),
                ("MW_RESPONSE_POLL_MS".into(), MW_RESPONSE_POLL_MS.into()),
                ("MW_BRIDGE_POLL_MS".into(), MW_BRIDGE_POLL_MS.into()),
                ("MW_MONITOR_POLL_MS".into(), MW_MONITOR_POLL_MS.into()),
                ("MW_DEBOUNCE_MS".into(), MW_DEBOUNCE_MS.into()),
                (
                    "MW_GROUND_TRUTH_TIMEOUT_MS".into(),
                    MW_GROUND_TRUTH_TIMEOUT_MS.into(),
                ),
            ],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        // Parent overrides would point tests at a real workspace
        for var in ["MW_WORKSPACE", "MW_COMMAND_DIR", "MW_HOOKS_DIR", "MW_STATE_DIR"] {
            cmd.env_remove(var);
        }

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Workspace
// =============================================================================

/// Temporary workspace with an isolated daemon state directory.
pub struct Workspace {
    dir: tempfile::TempDir,
    state_dir: tempfile::TempDir,
    daemon: Option<Child>,
}

impl Workspace {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            state_dir: tempfile::tempdir().unwrap(),
            daemon: None,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    pub fn command_dir(&self) -> PathBuf {
        self.path().join("_logs/agent_commands")
    }

    pub fn trigger_dir(&self) -> PathBuf {
        self.path().join("_logs/hooks/state_updates")
    }

    /// Run mw against this workspace
    pub fn mw(&self) -> CliBuilder {
        cli().pwd(self.path()).env("MW_WORKSPACE", self.path())
    }

    /// Run mwd against this workspace (in the foreground)
    pub fn mwd(&self) -> CliBuilder {
        CliBuilder::new(mwd_binary())
            .pwd(self.path())
            .env("MW_WORKSPACE", self.path())
            .env("MW_STATE_DIR", self.state_path())
    }

    /// Start mwd in the background and wait for it to report READY.
    pub fn start_daemon(&mut self) {
        let mut child = self
            .mwd()
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("mwd should start");
        let stdout = child.stdout.take().expect("piped stdout");
        let ready = BufReader::new(stdout)
            .lines()
            .map_while(Result::ok)
            .any(|line| line == "READY");
        assert!(ready, "mwd exited before READY\n{}", self.daemon_log());
        self.daemon = Some(child);
    }

    /// Read the daemon log file contents (for debugging test failures)
    pub fn daemon_log(&self) -> String {
        let log_path = self.state_path().join("daemon.log");
        std::fs::read_to_string(&log_path).unwrap_or_else(|_| "(no daemon log)".to_string())
    }

    /// Stop the daemon with SIGTERM and wait for it to exit.
    pub fn stop_daemon(&mut self) -> Option<std::process::ExitStatus> {
        let mut child = self.daemon.take()?;
        let _ = Command::new("kill")
            .args(["-TERM", &child.id().to_string()])
            .status();
        child.wait().ok()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Some(mut child) = self.daemon.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
