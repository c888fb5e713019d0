//! Action logging for valocker commands.
//!
//! Every CLI invocation is appended to `<data-dir>/actions.log` as one JSON
//! line, unless `action-log #false` is set in settings.kdl.

use crate::config::{DataPaths, Settings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Represents a single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// ISO 8601 timestamp when the action occurred
    pub timestamp: DateTime<Utc>,

    /// Command name (e.g., "select", "profile activate")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Profile active when the command ran, if one was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,
}

/// Log an action to the data directory's action log.
///
/// Never fails: logging problems are reported as warnings so they cannot
/// break the command that triggered them.
pub fn log_action(
    paths: &DataPaths,
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) {
    // Unreadable settings fall back to defaults, which log.
    let settings = Settings::load(&paths.settings()).unwrap_or_default();
    if !settings.action_log_enabled() {
        return;
    }

    let entry = ActionLog {
        timestamp: Utc::now(),
        command: command.to_string(),
        args: sanitize_args(&args),
        profile: settings.active_profile,
        success,
        error,
        duration_ms,
    };

    if let Err(e) = write_log_entry(&paths.action_log(), &entry) {
        tracing::warn!(error = %e, "failed to write action log");
    }
}

/// Append one entry, creating the log and its directory as needed.
fn write_log_entry(path: &Path, entry: &ActionLog) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;

    Ok(())
}

/// Shorten arguments for the log: paths become basenames and long agent
/// lists are summarized.
fn sanitize_args(args: &serde_json::Value) -> serde_json::Value {
    match args {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), sanitize_args(value)))
                .collect(),
        ),
        serde_json::Value::Array(arr) => {
            if arr.len() > 10 {
                serde_json::Value::String(format!("[Array with {} items]", arr.len()))
            } else {
                serde_json::Value::Array(arr.iter().map(sanitize_args).collect())
            }
        }
        serde_json::Value::String(s) if s.contains(['/', '\\']) => {
            serde_json::Value::String(s.rsplit(['/', '\\']).next().unwrap_or(s).to_string())
        }
        _ => args.clone(),
    }
}
