//! Integration test: Verify binary prints correct version

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_venture"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.contains("0.1.0"),
        "Expected output to contain version '0.1.0', but got: {}",
        stdout
    );
}

#[test]
fn export_requires_a_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_venture"))
        .args(["--export", "out.csv"])
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
