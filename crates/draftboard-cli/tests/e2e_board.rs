//! E2E CLI board workflow tests.
//!
//! Each test runs `dboard` as a subprocess in an isolated temp directory:
//! init -> import -> show, then every board intent through the command
//! surface, checking the JSON contract and persistence across invocations.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn dboard(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dboard"));
    cmd.current_dir(dir);
    cmd.env("DRAFTBOARD_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

const PLAYERS: &str = r#"[
  {"name": "Alpha", "team": "BOS", "guard": true, "gamesPlayed": 70, "fantasyPointsPerGame": 50.0, "adp": 4.0},
  {"name": "Bravo", "team": "NYK", "guard": true, "forward": true, "fantasyPointsPerGame": 45.0},
  {"name": "Charlie", "team": "MIA", "guard": true, "fantasyPointsPerGame": 40.0},
  {"name": "Delta", "guard": true, "fantasyPointsPerGame": 35.0},
  {"name": "Echo", "team": "DEN", "forward": true, "fantasyPointsPerGame": 48.0},
  {"name": "Foxtrot", "team": "DEN", "forward": true, "center": true, "fantasyPointsPerGame": 55.0}
]"#;

fn setup() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    dboard(dir.path()).args(["init", "--json"]).assert().success();
    std::fs::write(dir.path().join("players.json"), PLAYERS).expect("write players");
    dboard(dir.path())
        .args(["import", "players.json", "--json"])
        .assert()
        .success();
    dir
}

fn json(dir: &Path, args: &[&str]) -> Value {
    let output = dboard(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn column(dir: &Path, column: &str) -> Vec<(i64, String)> {
    let board = json(dir, &["show", "--column", column]);
    board["columns"][0]["players"]
        .as_array()
        .expect("players array")
        .iter()
        .map(|p| {
            (
                p["id"].as_i64().expect("id"),
                p["name"].as_str().expect("name").to_string(),
            )
        })
        .collect()
}

fn names(dir: &Path, col: &str) -> Vec<String> {
    column(dir, col).into_iter().map(|(_, name)| name).collect()
}

fn id_of(dir: &Path, col: &str, name: &str) -> String {
    column(dir, col)
        .into_iter()
        .find(|(_, n)| n == name)
        .map(|(id, _)| id.to_string())
        .expect("player by name")
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

#[test]
fn init_twice_requires_force() {
    let dir = TempDir::new().expect("temp dir");
    dboard(dir.path()).arg("init").assert().success();
    dboard(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    dboard(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn import_reports_columns() {
    let dir = TempDir::new().expect("temp dir");
    dboard(dir.path()).arg("init").assert().success();
    std::fs::write(dir.path().join("players.json"), PLAYERS).expect("write");
    let report = json(dir.path(), &["import", "players.json"]);
    assert_eq!(report["imported"], 6);
    assert_eq!(report["by_column"]["G"], 4);
    assert_eq!(report["by_column"]["F"], 1);
    assert_eq!(report["by_column"]["C"], 1);
}

#[test]
fn commands_before_init_fail_with_code() {
    let dir = TempDir::new().expect("temp dir");
    dboard(dir.path())
        .args(["show", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn malformed_config_is_reported() {
    let dir = setup();
    std::fs::write(dir.path().join(".draftboard/config.toml"), "[store\n").expect("write");
    dboard(dir.path())
        .args(["show", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

// ---------------------------------------------------------------------------
// Board reads
// ---------------------------------------------------------------------------

#[test]
fn show_orders_by_projection_with_center_priority() {
    let dir = setup();
    assert_eq!(names(dir.path(), "G"), ["Alpha", "Bravo", "Charlie", "Delta"]);
    assert_eq!(names(dir.path(), "F"), ["Echo"]);
    assert_eq!(names(dir.path(), "C"), ["Foxtrot"]);

    let board = json(dir.path(), &["show"]);
    let columns = board["columns"].as_array().expect("columns");
    assert_eq!(columns.len(), 3);
    let foxtrot = &columns[2]["players"][0];
    assert_eq!(foxtrot["positions"], "F/C");
    assert_eq!(foxtrot["displayColumn"], "C");
}

#[test]
fn text_output_shows_na_for_missing_stats() {
    let dir = setup();
    dboard(dir.path())
        .args(["show", "--column", "G", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Delta\tN/A"));
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

#[test]
fn draft_and_undraft_round_trip() {
    let dir = setup();
    let echo = id_of(dir.path(), "F", "Echo");

    let report = json(dir.path(), &["draft", &echo]);
    assert_eq!(report["synced"], true);
    assert_eq!(report["action"], "draft");

    let board = json(dir.path(), &["show", "--column", "F"]);
    assert_eq!(board["columns"][0]["players"][0]["drafted"], true);

    json(dir.path(), &["undraft", &echo]);
    let board = json(dir.path(), &["show", "--column", "F"]);
    assert_eq!(board["columns"][0]["players"][0]["drafted"], false);
}

#[test]
fn drafting_unknown_player_is_ignored() {
    let dir = setup();
    let report = json(dir.path(), &["draft", "9999"]);
    assert_eq!(report["synced"], false);
    assert!(
        report["ignored"]
            .as_str()
            .is_some_and(|r| r.contains("not on the board"))
    );
}

#[test]
fn up_and_down_swap_neighbours_and_stop_at_edges() {
    let dir = setup();
    let charlie = id_of(dir.path(), "G", "Charlie");
    let alpha = id_of(dir.path(), "G", "Alpha");

    json(dir.path(), &["up", &charlie]);
    assert_eq!(names(dir.path(), "G"), ["Alpha", "Charlie", "Bravo", "Delta"]);

    let top = json(dir.path(), &["up", &alpha]);
    assert_eq!(top["synced"], false);
    assert_eq!(names(dir.path(), "G"), ["Alpha", "Charlie", "Bravo", "Delta"]);

    json(dir.path(), &["down", &charlie]);
    assert_eq!(names(dir.path(), "G"), ["Alpha", "Bravo", "Charlie", "Delta"]);
}

#[test]
fn reorder_sets_full_order() {
    let dir = setup();
    let ids: Vec<String> = column(dir.path(), "G")
        .into_iter()
        .rev()
        .map(|(id, _)| id.to_string())
        .collect();

    let mut args = vec!["reorder", "G"];
    args.extend(ids.iter().map(String::as_str));
    let report = json(dir.path(), &args);
    assert_eq!(report["synced"], true);
    assert_eq!(names(dir.path(), "G"), ["Delta", "Charlie", "Bravo", "Alpha"]);
}

#[test]
fn reorder_missing_a_member_is_refused() {
    let dir = setup();
    let alpha = id_of(dir.path(), "G", "Alpha");
    dboard(dir.path())
        .args(["reorder", "G", &alpha, "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E4002"));
    assert_eq!(names(dir.path(), "G"), ["Alpha", "Bravo", "Charlie", "Delta"]);
}

#[test]
fn drag_to_row_lands_between_cards() {
    let dir = setup();
    let charlie = id_of(dir.path(), "G", "Charlie");

    let report = json(dir.path(), &["drag", &charlie, "--to-row", "1"]);
    assert_eq!(report["synced"], true);
    assert_eq!(names(dir.path(), "G"), ["Alpha", "Charlie", "Bravo", "Delta"]);
}

#[test]
fn drag_over_another_column_changes_nothing() {
    let dir = setup();
    let bravo = id_of(dir.path(), "G", "Bravo");

    let report = json(dir.path(), &["drag", &bravo, "--to-row", "0", "--over", "F"]);
    assert_eq!(report["synced"], false);
    assert_eq!(names(dir.path(), "G"), ["Alpha", "Bravo", "Charlie", "Delta"]);
    assert_eq!(names(dir.path(), "F"), ["Echo"]);
}

#[test]
fn tier_markers_follow_players_and_split_tiers() {
    let dir = setup();
    let bravo = id_of(dir.path(), "G", "Bravo");
    let delta = id_of(dir.path(), "G", "Delta");

    json(dir.path(), &["tier", "add", &bravo, "--label", "Tier 1"]);
    json(dir.path(), &["drag", &delta, "--to-row", "0"]);
    assert_eq!(names(dir.path(), "G"), ["Delta", "Alpha", "Bravo", "Charlie"]);

    let tiers = json(dir.path(), &["tiers", "G"]);
    let tiers = tiers["tiers"].as_array().expect("tiers");
    assert_eq!(tiers.len(), 2);
    assert_eq!(tiers[0]["closing_label"], "Tier 1");
    assert_eq!(tiers[0]["players"].as_array().map(Vec::len), Some(3));
    assert_eq!(tiers[1]["players"][0]["name"], "Charlie");

    json(dir.path(), &["tier", "rm", &bravo]);
    let tiers = json(dir.path(), &["tiers", "G"]);
    assert_eq!(tiers["tiers"].as_array().map(Vec::len), Some(1));
}

#[test]
fn assign_moves_player_to_bottom_of_other_column() {
    let dir = setup();
    let bravo = id_of(dir.path(), "G", "Bravo");

    let report = json(dir.path(), &["assign", &bravo, "F"]);
    assert_eq!(report["synced"], true);
    assert_eq!(report["column"], "F");
    assert_eq!(names(dir.path(), "F"), ["Echo", "Bravo"]);
    assert_eq!(names(dir.path(), "G"), ["Alpha", "Charlie", "Delta"]);
}

#[test]
fn completions_generate_script() {
    let dir = TempDir::new().expect("temp dir");
    dboard(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dboard"));
}
