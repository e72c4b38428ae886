use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CARD: &str = "\
ACME Technologies Pvt Ltd
RAVI KUMAR SHARMA
Senior Project Manager
Mob: +91 9876543210
Tel: 080-41234567
ravi.sharma@acmetech.in
www.acmetech.in
Block III, MG Road
Bengaluru, KA
560001
";

const AADHAAR: &str = r#"["Government of India", "Unique Identification Authority of India", "Jane Doe", "2345 6789 0123"]"#;

fn cardex(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cardex").unwrap();
    cmd.env_remove("GEMINI_API_KEY")
        .arg("--config")
        .arg(dir.join("config.json"));
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.json"), "{}").unwrap();
    dir
}

#[test]
fn card_json_output() {
    let dir = workspace();
    let input = dir.path().join("card.txt");
    fs::write(&input, CARD).unwrap();

    let output = cardex(dir.path()).arg("card").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "Ravi Kumar Sharma");
    assert_eq!(json["email"], "ravi.sharma@acmetech.in");
    assert_eq!(json["address"], "Block-III, MG Road, Bengaluru, KA - 560001");
    assert_eq!(json.as_object().unwrap().len(), 8);
}

#[test]
fn card_prompt_selects_fields() {
    let dir = workspace();
    let input = dir.path().join("card.txt");
    fs::write(&input, CARD).unwrap();

    let output = cardex(dir.path())
        .args(["card", "--prompt", "only the email and website"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["email", "website"]);
}

#[test]
fn empty_card_is_all_sentinels() {
    let dir = workspace();
    let input = dir.path().join("blank.txt");
    fs::write(&input, "\n\n").unwrap();

    cardex(dir.path())
        .args(["card", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Not Found,Not Found,Not Found,Not Found,Not Found,Not Found,Not Found,Not Found",
        ));
}

#[test]
fn id_document_from_json_lines() {
    let dir = workspace();
    let input = dir.path().join("aadhaar.json");
    fs::write(&input, AADHAAR).unwrap();

    let output = cardex(dir.path()).arg("id").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["detected_card_type"], "Aadhar");
    assert_eq!(json["primary_number"], "234567890123");
    assert_eq!(json["confidence"], "high");
}

#[test]
fn missing_input_fails() {
    let dir = workspace();

    cardex(dir.path())
        .args(["card", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = workspace();
    let inputs = dir.path().join("cards");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), CARD).unwrap();
    fs::write(inputs.join("b.txt"), "Jane Doe\njane@example.com\n").unwrap();

    cardex(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", inputs.display()))
        .arg("--output-dir")
        .arg(&outputs)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("b.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    let mut rows = summary.lines();
    assert!(rows.next().unwrap().starts_with("filename,status,source,name,"));
    assert!(rows.next().unwrap().starts_with("a.txt,success,heuristic,Ravi Kumar Sharma,"));
}

#[test]
fn batch_stops_on_empty_input_unless_told_to_continue() {
    let dir = workspace();
    let inputs = dir.path().join("cards");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), CARD).unwrap();
    fs::write(inputs.join("empty.txt"), "").unwrap();
    let pattern = format!("{}/*.txt", inputs.display());

    cardex(dir.path())
        .args(["batch", &pattern, "-j", "1"])
        .assert()
        .failure();

    cardex(dir.path())
        .args(["batch", &pattern, "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));
}

#[test]
fn config_set_and_get() {
    let dir = workspace();

    cardex(dir.path())
        .args(["config", "set", "extraction.mobile_policy", "strict"])
        .assert()
        .success();

    cardex(dir.path())
        .args(["config", "get", "extraction.mobile_policy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"strict\""));

    cardex(dir.path())
        .args(["config", "set", "extraction.mobile_policy", "sometimes"])
        .assert()
        .failure();
}
