use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn loctally_bin() -> &'static str {
    env!("CARGO_BIN_EXE_loctally")
}

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("failed to write test file");
}

#[test]
fn cli_prints_report_sections_for_basic_run() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    write_file(
        &temp_dir.path().join("main.cpp"),
        "int main() {}\n// comment\n",
    );
    write_file(&temp_dir.path().join("tool.py"), "x = 1\n# note\n");

    let output = Command::new(loctally_bin())
        .args(["--files", "cpp,py"])
        .arg(temp_dir.path())
        .output()
        .expect("failed to execute loctally");

    assert!(
        output.status.success(),
        "expected success, got status {:?}, stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("loctally"), "stdout missing banner: {stdout}");
    assert!(
        stdout.contains("Breakdown by file type:"),
        "stdout missing breakdown: {stdout}"
    );
    assert!(stdout.contains("Summary:"), "stdout missing summary: {stdout}");
    assert!(
        stdout.contains("Total lines of code:"),
        "stdout missing code total: {stdout}"
    );
    assert!(
        stdout.contains("files/sec"),
        "stdout missing scan rate: {stdout}"
    );
    assert!(
        stdout.contains("Line distribution:"),
        "stdout missing distribution chart: {stdout}"
    );
}

#[test]
fn cli_help_lists_supported_types() {
    let output = Command::new(loctally_bin())
        .arg("--help")
        .output()
        .expect("failed to execute loctally");

    assert!(output.status.success(), "help should exit zero");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--files"), "help missing --files: {stdout}");
    assert!(
        stdout.contains("Supported file types:"),
        "help missing type list: {stdout}"
    );
    for extension in ["cpp", "py", "lua", "rs"] {
        assert!(
            stdout.contains(extension),
            "help missing {extension}: {stdout}"
        );
    }
}

#[test]
fn cli_version_prints_package_name() {
    let output = Command::new(loctally_bin())
        .arg("--version")
        .output()
        .expect("failed to execute loctally");

    assert!(output.status.success(), "version should exit zero");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("loctally"), "unexpected version output: {stdout}");
}
