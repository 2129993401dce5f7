use assert_cmd::prelude::*;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/page.html";

/// Command with an isolated (absent) config file
fn picker(config_dir: &TempDir) -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("xpath-picker");
    let mut cmd = Command::new(bin);
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(config_dir.path().join("config.yaml"));
    cmd
}

fn fixture() -> PathBuf {
    let path = Path::new(FIXTURE);
    assert!(path.exists(), "fixture missing");
    path.to_path_buf()
}

fn stdout_json(cmd: &mut Command) -> Value {
    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    serde_json::from_str(&stdout).expect("valid json")
}

fn stdout_text(cmd: &mut Command) -> String {
    let assert = cmd.assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output")
}

#[test]
fn candidates_for_button_are_ranked() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(picker(&dir).args(["--output", "json", "candidates"]).args([
        "--file",
        fixture().to_str().unwrap(),
        "--target",
        r#"//*[@id="submit-btn"]"#,
    ]));

    assert_eq!(value["info"], "button#submit-btn.btn.btn-primary");
    let candidates = value["candidates"].as_array().unwrap();
    let types: Vec<&str> = candidates
        .iter()
        .map(|c| c["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["ID", "Class", "Contains Class", "Text Content"]);
    assert_eq!(candidates[0]["xpath"], r#"//*[@id="submit-btn"]"#);
    assert_eq!(candidates[1]["xpath"], r#"//button[@class="btn btn-primary"]"#);
    assert_eq!(candidates[2]["verified"], false);
}

#[test]
fn quoted_title_is_escaped() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(picker(&dir).args(["-o", "json", "candidates"]).args([
        "-f",
        fixture().to_str().unwrap(),
        "-t",
        r#"//div[@title="Say &quot;hi&quot;"]"#,
    ]));

    let candidates = value["candidates"].as_array().unwrap();
    assert!(candidates.iter().any(|c| {
        c["type"] == "Attribute (title)" && c["xpath"] == r#"//div[@title="Say &quot;hi&quot;"]"#
    }));
    assert_eq!(value["element"]["text"], "Greeting");
}

#[test]
fn walk_and_choose_print_the_chosen_expression() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_text(picker(&dir).arg("candidates").args([
        "--file",
        fixture().to_str().unwrap(),
        "--target",
        "//ul/li[3]",
        "--walk",
        "previous-sibling",
        "--choose",
        "1",
    ]));
    assert_eq!(stdout.trim(), "//ul/li[2]");
}

#[test]
fn human_output_lists_candidates() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_text(picker(&dir).arg("candidates").args([
        "--file",
        fixture().to_str().unwrap(),
        "--target",
        "//ul/li[3]",
    ]));
    assert!(stdout.contains("Element: li"));
    assert!(stdout.contains("1. [Position] //ul/li[3] (unverified)"));
}

#[test]
fn best_prefers_name_then_smart_path() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_text(picker(&dir).arg("best").args([
        "--file",
        fixture().to_str().unwrap(),
        "--target",
        r#"//input[@type="password"]"#,
    ]));
    assert_eq!(stdout.trim(), r#"//*[@name="password"]"#);

    let stdout = stdout_text(picker(&dir).arg("best").args([
        "--file",
        fixture().to_str().unwrap(),
        "--target",
        "//ul/li[3]",
    ]));
    assert_eq!(
        stdout.trim(),
        r#"//div[@id="app"]/ul[contains(@class,"links")]/li[3]"#
    );
}

#[test]
fn absolute_reports_both_paths() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(picker(&dir).args(["--output", "json", "absolute"]).args([
        "--file",
        fixture().to_str().unwrap(),
        "--target",
        r#"//a[@href="/terms"]"#,
    ]));
    assert_eq!(value["absolute"], "/html/body/div[1]/ul/li[2]/a");
    assert_eq!(
        value["smart"],
        r#"//div[@id="app"]/ul[contains(@class,"links")]/li[2]/a"#
    );
}

#[test]
fn eval_counts_matches() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(picker(&dir).args(["--output", "json", "eval"]).args([
        "--file",
        fixture().to_str().unwrap(),
        "//li",
    ]));
    assert_eq!(value["count"], 3);
    assert_eq!(value["matches"].as_array().unwrap().len(), 3);
}

#[test]
fn ambiguous_target_fails() {
    let dir = TempDir::new().unwrap();
    picker(&dir)
        .arg("candidates")
        .args(["--file", fixture().to_str().unwrap(), "--target", "//li"])
        .assert()
        .failure();
}

#[test]
fn picker_panel_target_is_rejected() {
    let dir = TempDir::new().unwrap();
    picker(&dir)
        .arg("candidates")
        .args([
            "--file",
            fixture().to_str().unwrap(),
            "--target",
            r#"//div[@id="xpath-extractor-panel"]/button"#,
        ])
        .assert()
        .failure();
}

#[test]
fn config_file_sets_output_format() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "output:").unwrap();
    writeln!(file, "  format: json").unwrap();

    let value = stdout_json(picker(&dir).arg("best").args([
        "--file",
        fixture().to_str().unwrap(),
        "--target",
        r#"//*[@id="submit-btn"]"#,
    ]));
    assert_eq!(value["xpath"], r#"//*[@id="submit-btn"]"#);
}

#[test]
fn info_reports_version() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(picker(&dir).args(["--output", "json", "info"]));
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(value["config"]["generator"]["text_max_len"], 100);
}
