//! Common test utilities for valocker integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.local/share/valocker/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
pub use tempfile::TempDir;

/// A test environment with an isolated data directory.
///
/// The `valocker()` method returns a `Command` that sets `VALOCKER_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the valocker binary with isolated data directory.
    pub fn valocker(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_valocker"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("VALOCKER_DATA_DIR", self.data_dir.path());
        cmd.env_remove("VALOCKER_ROSTER");
        cmd.env_remove("VALOCKER_LOG");
        cmd
    }

    /// Run a command that must succeed and parse its JSON output.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.valocker().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "valocker {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Names in a JSON string array.
pub fn names(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}
