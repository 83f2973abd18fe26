use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use gen3_core::builder::CreatureBuilder;
use gen3_core::core_api::Game;
use gen3_core::gender::Gender;
use gen3_core::image::SaveImage;
use serde_json::Value;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gen3-save"))
        .args(args)
        .output()
        .expect("failed to run gen3-save CLI")
}

fn temp_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.sav", std::process::id(), nanos))
}

/// A FireRed image with trainer RED, some money and a two-member team.
fn write_fixture(prefix: &str) -> PathBuf {
    let mut image = SaveImage::blank(Game::FireRed).expect("blank image");
    image.set_trainer_name("RED").unwrap();
    image.set_money(3000).unwrap();
    image.set_coins(50).unwrap();
    image.set_caught(4).unwrap();
    image.set_seen(16).unwrap();
    for (species, level) in [(4u16, 8u8), (16, 5)] {
        let creature = CreatureBuilder::new(Game::FireRed, species)
            .level(level)
            .nickname(format!("MON{species}"))
            .trainer("RED", 0x0002_1234, Gender::Male)
            .base_stats([50; 6])
            .moves([33, 0, 0, 0], [35, 0, 0, 0])
            .build()
            .unwrap();
        image.add_creature(creature).unwrap();
    }

    let path = temp_path(prefix);
    fs::write(&path, image.save().unwrap()).expect("failed to write fixture");
    path
}

#[test]
fn cli_prints_single_money_field() {
    let path = write_fixture("fields_money");
    let output = run_cli(&["--money", &path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "money=3000");
}

#[test]
fn cli_prints_multiple_requested_fields_in_fixed_order() {
    let path = write_fixture("fields_order");
    let output = run_cli(&["--dex", "--coins", "--money", &path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["money=3000", "coins=50", "dex_seen=2", "dex_caught=1"]
    );
}

#[test]
fn cli_lists_team_members() {
    let path = write_fixture("fields_team");
    let output = run_cli(&["--team", "--game", "fr", &path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("team=0: MON4 (#4) Lv8"));
    assert!(lines[1].starts_with("team=1: MON16 (#16) Lv5"));
}

#[test]
fn cli_json_field_mode_only_includes_requested_keys() {
    let path = write_fixture("fields_json");
    let output = run_cli(&["--json", "--trainer", "--team", &path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    let object = json.as_object().expect("top-level JSON object");
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["gender", "public_id", "secret_id", "team", "trainer"]);
    assert_eq!(json["trainer"], "RED");
    assert_eq!(json["team"][0]["species"], 4);
    assert_eq!(json["team"][1]["level"], 5);
}

#[test]
fn cli_default_json_reports_snapshot() {
    let path = write_fixture("fields_default_json");
    let output = run_cli(&["--json", &path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success());

    let json: Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("valid JSON");
    assert_eq!(json["game"], "FireRed");
    assert_eq!(json["trainer_name"], "RED");
    assert_eq!(json["team_size"], 2);
    assert_eq!(json["play_time"], "0:00:00");
    assert!(json["team"].as_array().is_some_and(|team| team.len() == 2));
}

#[test]
fn cli_without_field_flags_prints_summary() {
    let path = write_fixture("fields_summary");
    let output = run_cli(&[&path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FireRed save"));
    assert!(stdout.contains("Trainer: RED"));
    assert!(stdout.contains("Team (2/6)"));
    assert!(stdout.contains("across 14 boxes"));
}

#[test]
fn cli_rejects_unknown_game_value() {
    let path = write_fixture("fields_bad_game");
    let output = run_cli(&["--game", "emerald", &path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid game value 'emerald'"));
}

#[test]
fn cli_reports_load_failures() {
    let path = temp_path("fields_short");
    fs::write(&path, vec![0u8; 1024]).unwrap();
    let output = run_cli(&["--money", &path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading save file"));
    assert!(stderr.contains("Size"));
}

#[test]
fn cli_verbose_logs_to_stderr() {
    let path = write_fixture("fields_verbose");
    let output = run_cli(&["--verbose", "--money", &path.to_string_lossy()]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success());

    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "money=3000");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("save opened"));
}
