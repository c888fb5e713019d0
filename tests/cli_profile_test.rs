//! Integration tests for profiles, preferences and snapshots.

mod common;

use common::{TestEnv, names};
use predicates::prelude::*;
use std::fs;

fn profile_names(list: &serde_json::Value) -> Vec<String> {
    list["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

// === Profiles ===

#[test]
fn test_first_run_creates_default_profile() {
    let env = TestEnv::new();
    let list = env.json(&["profile", "list"]);

    assert_eq!(list["active"], "default");
    assert_eq!(profile_names(&list), vec!["default"]);
    assert!(env.data_path().join("profiles/default.json").is_file());
    assert!(env.data_path().join("settings.kdl").is_file());
}

#[test]
fn test_profiles_keep_separate_state() {
    let env = TestEnv::new();
    env.json(&["select", "jett"]);

    let created = env.json(&["profile", "create", "ranked", "--activate"]);
    assert_eq!(created["active"], "ranked");

    let status = env.json(&["status"]);
    assert_eq!(status["profile"], "ranked");
    assert!(names(&status["pool"]).is_empty());

    env.json(&["profile", "activate", "default"]);
    let status = env.json(&["status"]);
    assert_eq!(names(&status["pool"]), vec!["jett"]);
}

#[test]
fn test_create_duplicate_profile_fails() {
    let env = TestEnv::new();
    env.json(&["profile", "create", "ranked"]);
    env.valocker()
        .args(["profile", "create", "ranked"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_profile_name_fails() {
    let env = TestEnv::new();
    env.valocker()
        .args(["profile", "create", "../escape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid profile name"));
}

#[test]
fn test_activate_missing_profile_fails() {
    let env = TestEnv::new();
    env.valocker()
        .args(["profile", "activate", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'nope' not found"));
}

#[test]
fn test_cannot_delete_active_profile() {
    let env = TestEnv::new();
    env.valocker()
        .args(["profile", "delete", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("active profile"));

    env.json(&["profile", "create", "alt"]);
    env.json(&["profile", "delete", "alt"]);
    assert_eq!(profile_names(&env.json(&["profile", "list"])), vec!["default"]);
}

#[test]
fn test_favorites_listed_first() {
    let env = TestEnv::new();
    env.json(&["profile", "create", "alpha"]);
    env.json(&["profile", "create", "zulu"]);
    env.json(&["profile", "favorite", "zulu"]);

    let list = env.json(&["profile", "list"]);
    assert_eq!(profile_names(&list), vec!["zulu", "alpha", "default"]);
    assert_eq!(list["profiles"][0]["favorite"], true);

    env.json(&["profile", "unfavorite", "zulu"]);
    let list = env.json(&["profile", "list"]);
    assert_eq!(profile_names(&list), vec!["alpha", "default", "zulu"]);
}

#[test]
fn test_profile_list_human_marks_active() {
    let env = TestEnv::new();
    env.valocker()
        .args(["-H", "profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* default"));
}

// === Preferences ===

#[test]
fn test_pick_and_random() {
    let env = TestEnv::new();

    env.valocker()
        .args(["pick", "reyna"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("locked"));

    let result = env.json(&["pick", "jett"]);
    assert_eq!(result["locked_agent"], "jett");

    env.valocker()
        .args(["random", "on"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one agent"));

    env.json(&["select", "sage"]);
    let result = env.json(&["random", "on"]);
    assert_eq!(result["random_pick"], true);

    // Emptying the pool turns random pick off.
    let result = env.json(&["deselect", "--all"]);
    assert_eq!(result["random_pick"], false);
}

#[test]
fn test_locking_picked_agent_clears_pick() {
    let env = TestEnv::new();
    env.json(&["unlock", "reyna"]);
    env.json(&["pick", "reyna"]);

    let result = env.json(&["lock", "reyna"]);
    assert!(result.get("locked_agent").is_none());
}

// === Snapshots ===

#[test]
fn test_snapshot_export_import_round_trip() {
    let env = TestEnv::new();
    env.json(&["unlock", "omen", "viper"]);
    env.json(&["select", "--role", "controller"]);

    let exported = env
        .valocker()
        .args(["snapshot", "export"])
        .output()
        .unwrap();
    assert!(exported.status.success());
    let file = env.data_path().join("backup.json");
    fs::write(&file, &exported.stdout).unwrap();

    env.json(&["profile", "create", "copy", "--activate"]);
    let result = env.json(&["snapshot", "import", file.to_str().unwrap()]);
    assert_eq!(result["profile"], "copy");

    let status = env.json(&["status"]);
    assert_eq!(names(&status["pool"]), vec!["brimstone", "viper", "omen"]);
}

#[test]
fn test_snapshot_import_corrects_bad_entries() {
    let env = TestEnv::new();
    let file = env.data_path().join("bad.json");
    fs::write(
        &file,
        r#"{
            "jett": { "available": false, "selected": true },
            "reyna": { "available": false, "selected": true },
            "tejo": { "available": true, "selected": true }
        }"#,
    )
    .unwrap();

    let result = env.json(&["snapshot", "import", file.to_str().unwrap()]);
    assert_eq!(names(&result["load"]["unknown"]), vec!["tejo"]);
    assert_eq!(names(&result["load"]["corrected"]), vec!["jett", "reyna"]);

    let status = env.json(&["status"]);
    assert_eq!(names(&status["pool"]), vec!["jett"]);
}

#[test]
fn test_snapshot_import_rejects_malformed_json() {
    let env = TestEnv::new();
    let file = env.data_path().join("broken.json");
    fs::write(&file, "not json").unwrap();

    env.valocker()
        .args(["snapshot", "import", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));
}

// === Action log ===

#[test]
fn test_commands_are_logged() {
    let env = TestEnv::new();
    env.json(&["select", "jett"]);
    env.valocker().args(["select", "nobody"]).assert().failure();

    let log = fs::read_to_string(env.data_path().join("actions.log")).unwrap();
    let entries: Vec<serde_json::Value> = log
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["command"], "select");
    assert_eq!(entries[0]["success"], true);
    assert_eq!(entries[0]["profile"], "default");
    assert_eq!(entries[1]["success"], false);
}

#[test]
fn test_action_log_can_be_disabled() {
    let env = TestEnv::new();
    fs::write(env.data_path().join("settings.kdl"), "action-log #false\n").unwrap();

    env.json(&["status"]);
    assert!(!env.data_path().join("actions.log").exists());
}

#[test]
fn test_output_format_from_settings() {
    let env = TestEnv::new();
    fs::write(
        env.data_path().join("settings.kdl"),
        "output-format \"human\"\n",
    )
    .unwrap();

    env.valocker()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile: default"));
}
