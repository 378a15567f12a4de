//! Integration tests for the botica binary.
//!
//! These tests verify end-to-end behavior including:
//! - Turn actions, meals and sleep against the saved state
//! - Treatment history generation and patient journals
//! - Config overrides

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("botica"))
}

fn read_state(data_dir: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(data_dir.join("state.json")).expect("state.json missing");
    serde_json::from_str(&raw).expect("state.json is not JSON")
}

fn write_state(data_dir: &Path, health: i32, energy: i32, wealth: u32, streak: u32) {
    fs::create_dir_all(data_dir).unwrap();
    let state = serde_json::json!({
        "health": health,
        "energy": energy,
        "wealth": wealth,
        "consecutiveLowEnergyTurns": streak,
    });
    fs::write(data_dir.join("state.json"), state.to_string()).unwrap();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "An apothecary's ledger for 1680s Mexico City",
        ));
}

#[test]
fn test_default_command_shows_fresh_status() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Health: 100/100"))
        .stdout(predicate::str::contains("Energy: 100/100"))
        .stdout(predicate::str::contains("vigorous"));

    // Status alone never writes state
    assert!(!temp_dir.path().join("state.json").exists());
}

#[test]
fn test_new_game_with_custom_wealth() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["new", "--wealth", "3"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 reales"));

    let output = cli()
        .args(["status", "--json"])
        .arg("--data-dir")
        .arg(data_dir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["state"]["wealth"], 3);
    assert_eq!(status["state"]["health"], 100);
    assert_eq!(status["status"], "vigorous");
}

#[test]
fn test_act_spends_energy() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["act", "study", "--seed", "1"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("energy 100 → 85"));

    let state = read_state(data_dir);
    assert_eq!(state["energy"], 85);
    assert_eq!(state["health"], 100);
}

#[test]
fn test_act_accepts_any_action_spelling() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["act", "see_patients"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    assert_eq!(read_state(data_dir)["energy"], 80);
}

#[test]
fn test_act_cost_modifier() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["act", "forage", "--cost-modifier", "0.5", "--bonus", "2"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    // 100 - round(20 * 0.5) + 2, clamped to the maximum
    assert_eq!(read_state(data_dir)["energy"], 92);
}

#[test]
fn test_act_with_extreme_regen() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["act", "chat", "--regen", "2147483647", "--bonus", "2147483647"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("energy 100 → 100"));

    assert_eq!(read_state(data_dir)["energy"], 100);

    cli()
        .args(["act", "study", "--cost-modifier", "-1e12"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    assert_eq!(read_state(data_dir)["energy"], 100);
}

#[test]
fn test_unknown_action_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["act", "dance"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("dance"));
}

#[test]
fn test_too_tired_to_act() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    write_state(data_dir, 80, 5, 10, 4);

    cli()
        .args(["act", "study"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("too tired to study"));

    let state = read_state(data_dir);
    assert_eq!(state["energy"], 5);
    assert_eq!(state["health"], 80);
    assert_eq!(state["consecutiveLowEnergyTurns"], 4);
}

#[test]
fn test_certain_disease_exposure() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["act", "seePatients", "--health-risk", "1.0"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Disease exposure"));

    assert_eq!(read_state(data_dir)["health"], 90);
}

#[test]
fn test_eat_spends_wealth() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    write_state(data_dir, 50, 50, 10, 0);

    cli()
        .arg("eat")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("hearty meal"));

    let state = read_state(data_dir);
    assert_eq!(state["wealth"], 7);
    assert_eq!(state["energy"], 70);
    assert_eq!(state["health"], 55);
}

#[test]
fn test_sleep_restores_energy() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    write_state(data_dir, 60, 10, 10, 3);

    cli()
        .args(["sleep", "--hours", "8"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("well rested"));

    let state = read_state(data_dir);
    assert_eq!(state["energy"], 84);
    assert_eq!(state["health"], 81);
    assert_eq!(state["consecutiveLowEnergyTurns"], 0);
}

#[test]
fn test_history_written_to_journal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let output = cli()
        .args([
            "history",
            "--patient",
            "ana",
            "--diagnosis",
            "Tertian fever",
            "--symptom",
            "headache",
            "--count",
            "4",
            "--json",
            "--seed",
            "7",
        ])
        .arg("--data-dir")
        .arg(data_dir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let history: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(history.len(), 4);
    for entry in &history {
        assert_eq!(entry["practitioner"]["isPlayer"], false);
        assert!(entry["date"].as_str().unwrap().ends_with("1680"));
    }

    // Oldest first
    let days: Vec<i64> = history
        .iter()
        .map(|e| e["daysAgo"].as_i64().unwrap())
        .collect();
    assert!(days.windows(2).all(|w| w[0] >= w[1]));

    let journal = fs::read_to_string(data_dir.join("patients/ana.jsonl")).unwrap();
    assert_eq!(journal.lines().count(), 4);
}

#[test]
fn test_history_count_is_bounded() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["history", "--patient", "ana", "--count", "4000000000"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--count"));

    assert!(!temp_dir.path().join("patients").exists());
}

#[test]
fn test_history_is_reproducible_with_seed() {
    let run = || {
        let temp_dir = setup_test_dir();
        cli()
            .args(["history", "--patient", "pedro", "--diagnosis", "cough"])
            .args(["--seed", "42"])
            .arg("--data-dir")
            .arg(temp_dir.path())
            .output()
            .unwrap()
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn test_treat_appends_player_entry() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .args(["history", "--patient", "ana", "--diagnosis", "fever"])
        .args(["--count", "2", "--seed", "3"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();

    cli()
        .args(["treat", "--patient", "ana", "--remedy", "Syrup of Violets"])
        .args(["--method", "Three spoonfuls at dawn", "--theory", "Cooling"])
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded Syrup of Violets for ana"))
        .stdout(predicate::str::contains("Outcome:").count(3))
        .stdout(predicate::str::contains("Maria de Lima (you)"));

    let output = cli()
        .args(["show", "--patient", "ana", "--json"])
        .arg("--data-dir")
        .arg(data_dir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.len(), 3);

    let last = &entries[2];
    assert_eq!(last["practitioner"]["isPlayer"], true);
    assert_eq!(last["practitioner"]["name"], "Maria de Lima");
    assert_eq!(last["treatment"]["name"], "Syrup of Violets");
    assert_eq!(last["date"], "August 1, 1680");
}

#[test]
fn test_show_unknown_patient() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["show", "--patient", "nobody"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No treatments recorded for nobody"));
}

#[test]
fn test_patient_id_cannot_escape_data_dir() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["treat", "--patient", "../ana", "--remedy", "Theriac"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();

    assert!(!temp_dir.path().join("patients").exists());
}

#[test]
fn test_config_file_overrides() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[calendar]
current_date = "1681-01-06"

[player]
starting_wealth = 25
"#,
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wealth: 25 reales"));

    cli()
        .args(["treat", "--patient", "juan", "--remedy", "Theriac"])
        .arg("--config")
        .arg(&config_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    let journal = fs::read_to_string(data_dir.join("patients/juan.jsonl")).unwrap();
    assert!(journal.contains("January 6, 1681"));
}

#[test]
fn test_invalid_config_rejected() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[limits]\nmax_health = 0\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}
