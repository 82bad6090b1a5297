use std::process::Command;

#[test]
fn cli_prints_matrices_and_timing() {
    let bin_path = env!("CARGO_BIN_EXE_pullgrid");

    let output = Command::new(bin_path)
        .args(["--size", "3", "--threads", "2", "--verify"])
        .output()
        .expect("failed to run pullgrid");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for header in ["Matrix A:", "Matrix B:", "Matrix Solution:"] {
        assert!(stdout.contains(header), "missing {header}: {stdout}");
    }

    let timing = stdout
        .lines()
        .last()
        .and_then(|l| l.strip_prefix("Time elapsed (sec): "))
        .unwrap_or_else(|| panic!("no timing line: {stdout}"));
    let (whole, frac) = timing.split_once('.').expect("timing has decimals");
    assert!(whole.parse::<u64>().is_ok());
    assert_eq!(frac.len(), 6);
}

#[test]
fn cli_rejects_zero_bound() {
    let bin_path = env!("CARGO_BIN_EXE_pullgrid");

    let output = Command::new(bin_path)
        .args(["--high", "0"])
        .output()
        .expect("failed to run pullgrid");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: value bound must be positive, got 0"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn cli_rejects_overflowing_bound() {
    let bin_path = env!("CARGO_BIN_EXE_pullgrid");

    let output = Command::new(bin_path)
        .args(["--high", "5000000000"])
        .output()
        .expect("failed to run pullgrid");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("overflow i64"), "unexpected stderr: {stderr}");
}
