//! Integration tests for the gridcalc binary

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_gridcalc"))
        // Tests must be deterministic and not depend on a user's ~/.config/gridcalc/config.toml.
        .arg("--no-config")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("gridcalc_cli_{}_{}", std::process::id(), name));
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "5 + 3 * 2"]);
    assert_eq!(stdout.trim(), "11");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_prepend_equals() {
    let (stdout1, _, _) = run_command(&["-c", "10 / 4"]);
    let (stdout2, _, _) = run_command(&["-c", "=10 / 4"]);
    assert_eq!(stdout1.trim(), "2.5");
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_division_by_zero() {
    let (stdout, _, code) = run_command(&["-c", "1/0"]);
    assert!(stdout.starts_with("#ERR"));
    assert_eq!(code, 1);
}

#[test]
fn test_command_rejects_functions() {
    let (stdout, _, code) = run_command(&["-c", "pow(2, 10)"]);
    assert_eq!(stdout.trim(), "#ERR: Formula contains invalid characters");
    assert_eq!(code, 1);
}

#[test]
fn test_command_reads_grid_file() {
    let path = temp_file("command.grd", "A1: 4\nB1: =A1*10\n");
    let (stdout, _, code) = run_command(&[path.to_str().unwrap(), "-c", "B1 + A1"]);
    assert_eq!(stdout.trim(), "44");
    assert_eq!(code, 0);
    fs::remove_file(path).ok();
}

#[test]
fn test_markdown_to_stdout() {
    let path = temp_file("stdout.grd", "@size 2x2\nA1: 2\nB2: =A1*A1\n");
    let (stdout, _, code) = run_command(&[path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("|   | A | B |"));
    assert!(stdout.contains("| 2 |  | 4 |"));
    fs::remove_file(path).ok();
}

#[test]
fn test_markdown_output_file() {
    let path = temp_file("export.grd", "A1: =6*7\n");
    let output = std::env::temp_dir().join(format!("gridcalc_cli_{}_export.md", std::process::id()));
    let (_, stderr, code) = run_command(&[
        path.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Exported to"));
    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("| 1 | 42 |"));
    fs::remove_file(path).ok();
    fs::remove_file(output).ok();
}

#[test]
fn test_json_evaluation_result() {
    let path = temp_file("cycle.grd", "A1: =B1\nB1: =A1\nC1: 3\n");
    let (stdout, _, code) = run_command(&[path.to_str().unwrap(), "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["circularReferences"], serde_json::json!(["A1", "B1"]));
    assert_eq!(json["grid"]["cells"][0][2]["value"], 3.0);
    fs::remove_file(path).ok();
}

#[test]
fn test_strict_exit_code() {
    let path = temp_file("strict.grd", "A1: words\nA2: =A1+1\n");
    let (_, _, code) = run_command(&[path.to_str().unwrap()]);
    assert_eq!(code, 0);
    let (_, stderr, code) = run_command(&[path.to_str().unwrap(), "--strict"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("A2: Cell A1 contains non-numeric value: words"));
    fs::remove_file(path).ok();
}

#[test]
fn test_validate_formula() {
    let (stdout, _, code) = run_command(&["--validate", "=A1+B2*A1"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["isValid"], true);
    assert_eq!(json["dependencies"], serde_json::json!(["A1", "B2"]));

    let (stdout, _, code) = run_command(&["--validate", "=(A1"]);
    assert_eq!(code, 1);
    assert!(stdout.contains("Unbalanced parentheses"));
}

#[test]
fn test_fresh_grid_size_and_save() {
    let saved = std::env::temp_dir().join(format!("gridcalc_cli_{}_saved.grd", std::process::id()));
    let (stdout, _, code) = run_command(&[
        "--rows",
        "2",
        "--cols",
        "4",
        "--save",
        saved.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("|   | A | B | C | D |"));
    assert_eq!(fs::read_to_string(&saved).unwrap(), "# Gridcalc Spreadsheet\n@size 2x4\n");
    fs::remove_file(saved).ok();
}

#[test]
fn test_requests_file() {
    let requests = temp_file(
        "requests.json",
        r#"[
            {"op": "updateCell", "cellId": "A1", "input": "5"},
            {"op": "updateCell", "cellId": "A2", "input": "=A1*2"},
            {"op": "deleteRow", "index": 9},
            {"op": "evaluate"}
        ]"#,
    );
    let (stdout, _, code) = run_command(&["--requests", requests.to_str().unwrap()]);
    assert_eq!(code, 0);
    let replies: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(replies[2]["error"], "Row index out of bounds");
    assert_eq!(replies[3]["success"], true);
    assert_eq!(replies[3]["grid"]["cells"][1][0]["value"], 10.0);
    fs::remove_file(requests).ok();
}

#[test]
fn test_rows_past_limit_is_an_error() {
    let (stdout, stderr, code) = run_command(&["--rows", "5000000"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Failed to create grid"));
}

#[test]
fn test_missing_file_is_an_error() {
    let (_, stderr, code) = run_command(&["/nonexistent/gridcalc/sheet.grd"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to load"));
}

#[test]
fn test_bad_grd_reports_line() {
    let path = temp_file("bad.grd", "A1: 1\n\nbogus line\n");
    let (_, stderr, code) = run_command(&[path.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("line 3"));
    fs::remove_file(path).ok();
}
