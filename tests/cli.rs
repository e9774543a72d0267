//! Exit status and output of the `signal-analysis` binary
//!
//! Only loading and output I/O failures end the run with a non-zero status;
//! a failed analysis is reported in the output and the run still succeeds.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fractal_signals_cli_{}_{}", std::process::id(), name))
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_signal-analysis"))
        .args(args)
        .output()
        .unwrap()
}

fn write_prices(name: &str, rows: usize) -> PathBuf {
    let mut csv = String::from("Date,Price\n");
    let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    for i in 0..rows {
        let date = start + chrono::Duration::days(i as i64);
        let price = 100.0 + (i as f64 * 0.4).sin() + i as f64 * 0.05;
        csv.push_str(&format!("{},{}\n", date.format("%Y-%m-%d"), price));
    }
    let path = temp_path(name);
    fs::write(&path, csv).unwrap();
    path
}

/// Scenario: the input file cannot be opened
#[test]
fn test_missing_file_exits_non_zero() {
    let path = temp_path("absent.csv");
    let output = run(&[path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

/// Scenario: every analysis except rolling variance fails on a single row
#[test]
fn test_failed_analyses_still_exit_zero() {
    let path = write_prices("one_row.csv", 1);
    let output = run(&[path.to_str().unwrap()]);
    fs::remove_file(&path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Observations: 1"));
    assert!(stdout.contains("Spectral analysis failed:"));
    assert!(stdout.contains("Hurst estimation failed:"));
}

/// Scenario: invalid window fails only the rolling variance
#[test]
fn test_invalid_window_is_reported_not_fatal() {
    let path = write_prices("bad_window.csv", 200);
    let output = run(&[path.to_str().unwrap(), "--window", "1"]);
    fs::remove_file(&path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Rolling variance failed: Invalid parameter: window = 1"));
    assert!(stdout.contains("Estimated Hurst Exponent:"));
}

/// Scenario: exports are written, and an unwritable export path is fatal
#[test]
fn test_exports() {
    let path = write_prices("export.csv", 120);
    let spectrum = temp_path("spectrum_out.csv");
    let variance = temp_path("variance_out.csv");

    let output = run(&[
        path.to_str().unwrap(),
        "--spectrum-out",
        spectrum.to_str().unwrap(),
        "--variance-out",
        variance.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let spectrum_text = fs::read_to_string(&spectrum).unwrap();
    assert!(spectrum_text.starts_with("frequency,amplitude"));
    assert_eq!(spectrum_text.lines().count(), 1 + 59);
    let variance_text = fs::read_to_string(&variance).unwrap();
    assert_eq!(variance_text.lines().count(), 1 + 120);

    let unwritable = temp_path("no_such_dir").join("spectrum.csv");
    let output = run(&[
        path.to_str().unwrap(),
        "--spectrum-out",
        unwritable.to_str().unwrap(),
    ]);
    assert!(!output.status.success());

    for p in [&path, &spectrum, &variance] {
        fs::remove_file(p).ok();
    }
}
