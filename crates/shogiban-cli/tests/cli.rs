use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

const EMPTY_SFEN: &str = "[sfen]9/9/9/9/9/9/9/9/9 b - 1[/sfen]";
const BROKEN_SFEN: &str = "[sfen]8/9/9/9/9/9/9/9/9 b - 1[/sfen]";

fn shogiban() -> Command {
    Command::cargo_bin("shogiban").expect("binary")
}

#[test]
fn renders_question_and_answer_files() {
    let dir = TempDir::new().unwrap();
    let question = dir.path().join("q.html");
    let answer = dir.path().join("a.html");
    fs::write(&question, format!("Q {EMPTY_SFEN}")).unwrap();
    fs::write(&answer, "no diagram").unwrap();

    let output = shogiban()
        .arg("--question")
        .arg(&question)
        .arg("--answer")
        .arg(&answer)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Q \n\n<figure class=\"shogi_diagram\">"));
    assert!(stdout.contains("1手目、先手番です"));
    assert!(stdout.ends_with("<hr id=answer>\nno diagram\n"));
}

#[test]
fn reads_question_from_stdin() {
    let output = shogiban().args(["--question", "-"]).write_stdin(EMPTY_SFEN).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("shogi_board"));
    assert!(!stdout.contains("<hr id=answer>"));
}

#[test]
fn json_output_counts_errors_and_keeps_original() {
    let output = shogiban()
        .args(["--question", "-", "--format", "json"])
        .write_stdin(BROKEN_SFEN)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["question"], BROKEN_SFEN);
    assert_eq!(value["errors"], 1);
    assert_eq!(value["reports"][0]["question"], BROKEN_SFEN);
}

#[test]
fn config_file_overrides_labels() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("labels.toml");
    fs::write(&config, "sente_to_move = \"Black to move\"\n").unwrap();

    let output = shogiban()
        .args(["--question", "-", "--config"])
        .arg(&config)
        .write_stdin(EMPTY_SFEN)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("1手目、Black to move"));
}

#[test]
fn only_flag_skips_other_notations() {
    let output = shogiban()
        .args(["--question", "-", "--only", "kif"])
        .write_stdin(EMPTY_SFEN)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), format!("{EMPTY_SFEN}\n"));
}

#[test]
fn rejects_stdin_for_both_faces() {
    shogiban().args(["--question", "-", "--answer", "-"]).assert().failure();
}

#[test]
fn missing_input_file_fails() {
    shogiban().args(["--question", "/nonexistent/card.html"]).assert().failure();
}
