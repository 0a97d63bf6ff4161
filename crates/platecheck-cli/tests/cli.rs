use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's real config directory.
fn platecheck(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("platecheck").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn detect_from_args() {
    let home = TempDir::new().unwrap();
    platecheck(home.path())
        .args(["detect", "DL 01 AB 1234", "SCOOTY"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detected: DL01AB1234 (score 185, line_1)"));
}

#[test]
fn detect_json_with_actual() {
    let home = TempDir::new().unwrap();
    let output = platecheck(home.path())
        .args(["detect", "KA05A01234", "--actual", "KA 05 AQ 1234", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["plate"], "KA05AQ1234");
    assert_eq!(json["outcome"], "accepted");
    assert_eq!(json["match"]["similarity"], 100);
    assert_eq!(json["match"]["vin_match"], 100);
    assert!(json.get("candidates").is_none());
}

#[test]
fn detect_reports_missing_plate() {
    let home = TempDir::new().unwrap();
    platecheck(home.path())
        .args(["detect", "XY123456"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No registration detected"));
}

#[test]
fn detect_from_input_file() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("lines.txt");
    fs::write(&input, "HONDA\nUP 32 AB 1234\n").unwrap();

    platecheck(home.path())
        .args(["detect", "--all", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("UP32AB1234"))
        .stdout(predicate::str::contains("Candidates:"));
}

#[test]
fn score_prints_value() {
    let home = TempDir::new().unwrap();
    platecheck(home.path())
        .args(["score", "DL01AB1234", "GJABCDEF", "XY01AB1234", "--explain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ DL01AB1234 185"))
        .stdout(predicate::str::contains("✗ XY01AB1234 0"))
        .stdout(predicate::str::contains("GJABCDEF   105"))
        .stdout(predicate::str::contains("state code: DL"));
}

#[test]
fn compare_prints_metrics() {
    let home = TempDir::new().unwrap();
    platecheck(home.path())
        .args(["compare", "DL01AB1234", "dl 01 ab 1239"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Similarity: 90%"))
        .stdout(predicate::str::contains("VIN match:  75% (1234 vs 1239)"));
}

#[test]
fn batch_writes_summary() {
    let home = TempDir::new().unwrap();
    let dir = home.path();

    fs::write(
        dir.join("bookings.json"),
        r#"[
            {"booking_id": 2, "actual_reg_number": "DL01AB1234",
             "booking_starting_images": "https://img/2a.jpg^https://img/2b.jpg"},
            {"booking_id": 3, "actual_reg_number": "MH12AB1234",
             "booking_starting_images": "https://img/3a.jpg"},
            {"booking_id": 4, "actual_reg_number": "UP32AB1234",
             "booking_starting_images": ""}
        ]"#,
    )
    .unwrap();
    fs::write(
        dir.join("ocr.json"),
        r#"{
            "https://img/2a.jpg": {"kind": "http_status", "status": 500},
            "https://img/2b.jpg": {"kind": "response", "success": true, "extractedText": ["DL 01 AB 1234"]},
            "https://img/3a.jpg": {"kind": "response", "success": true, "extractedText": ["MH 12 AB 9999"]}
        }"#,
    )
    .unwrap();

    let out_dir = dir.join("out");
    platecheck(dir)
        .arg("batch")
        .arg(dir.join("bookings.json"))
        .arg("--ocr")
        .arg(dir.join("ocr.json"))
        .arg("-o")
        .arg(&out_dir)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyzed 2 bookings"))
        .stdout(predicate::str::contains("VIN accurate: 1/2 (50%)"));

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("booking_id,actual_registration,booking_status,image_1"));
    assert!(summary.contains("🔴 OCR Failed (500)"));
    assert!(summary.contains("EXACT MATCH"));
    assert!(out_dir.join("2.json").exists());
    assert!(!out_dir.join("4.json").exists());
}

#[test]
fn config_init_get_set() {
    let home = TempDir::new().unwrap();

    platecheck(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    platecheck(home.path())
        .args(["config", "set", "analysis.similarity_metric", "edit_distance"])
        .assert()
        .success();

    platecheck(home.path())
        .args(["config", "get", "analysis.similarity_metric"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"edit_distance\""));

    platecheck(home.path())
        .args(["config", "set", "analysis.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
