//! End-to-end workflow: CSV file in, report and CSV exports out

use fractal_signals::{
    errors::SignalAnalysisError, generate_random_walk, load_csv, load_csv_from_reader,
    write_rolling_variance_csv, write_spectrum_csv, AnalysisConfig, HurstRegime, SignalAnalyzer,
};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fractal_signals_{}_{}", std::process::id(), name))
}

fn price_csv(values: &[f64]) -> String {
    let mut csv = String::from("Date,Open,Price\n");
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    // Written newest first, as many vendors export
    for (i, value) in values.iter().enumerate().rev() {
        let date = start + chrono::Duration::days(i as i64);
        writeln!(csv, "{},0,{}", date.format("%Y-%m-%d"), value).unwrap();
    }
    csv
}

#[test]
fn test_file_to_report() {
    let prices: Vec<f64> = generate_random_walk(600, Some(21))
        .into_iter()
        .map(|x| 100.0 + x)
        .collect();
    let path = temp_path("prices.csv");
    fs::write(&path, price_csv(&prices)).unwrap();

    let series = load_csv(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(series.len(), 600);
    assert_eq!(series.values()[0], prices[0]);
    assert!(series.timestamps().windows(2).all(|w| w[0] <= w[1]));

    let report = SignalAnalyzer::new(AnalysisConfig::default()).analyze(&series);
    assert!(report.failures().is_empty());

    let hurst = report.hurst.as_ref().unwrap().as_ref().unwrap();
    assert_eq!(hurst.regime, HurstRegime::Trending);

    let text = report.to_string();
    assert!(text.starts_with("Observations: 600"));
    assert!(text.contains("Estimated Hurst Exponent: "));
    assert!(text.contains("Indication: Trending behavior (persistent)"));
    assert!(text.contains("Frequency bins: 299"));
    assert!(text.contains("Predicted value for observation 601"));
}

#[test]
fn test_exports_match_report() {
    let csv = price_csv(&generate_random_walk(64, Some(4)));
    let series = load_csv_from_reader(csv.as_bytes()).unwrap();
    let report = SignalAnalyzer::new(AnalysisConfig::core().with_rolling_window(10)).analyze(&series);

    let spectrum = report.spectrum.unwrap().unwrap();
    let mut out = Vec::new();
    write_spectrum_csv(&spectrum, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 1 + 31);

    let rolling = report.rolling_variance.unwrap().unwrap();
    let mut out = Vec::new();
    write_rolling_variance_csv(&rolling, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 65);
    assert_eq!(lines[1], "2020-01-01 00:00:00,");
    assert!(lines[9].ends_with(','));
    assert!(!lines[10].ends_with(','));
}

#[test]
fn test_loading_failures_are_reported() {
    assert!(matches!(
        load_csv(temp_path("does_not_exist.csv")),
        Err(SignalAnalysisError::Io { .. })
    ));

    let missing_column = "Date,Close\n2024-01-01,1.0\n";
    assert!(matches!(
        load_csv_from_reader(missing_column.as_bytes()),
        Err(SignalAnalysisError::DataFormat { .. })
    ));

    let bad_price = "Date,Price\n2024-01-01,1.0\n2024-01-02,n/a\n";
    match load_csv_from_reader(bad_price.as_bytes()) {
        Err(SignalAnalysisError::DataFormat { line, .. }) => assert_eq!(line, Some(3)),
        other => panic!("Expected DataFormat error, got {:?}", other),
    }
}

#[test]
fn test_short_file_reports_each_failure() {
    let csv = "date,price\n2024-01-01,10\n";
    let series = load_csv_from_reader(csv.as_bytes()).unwrap();
    let report = SignalAnalyzer::default().analyze(&series);

    let names: Vec<_> = report.failures().into_iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["Spectral analysis", "Hurst estimation", "Trend fit"]
    );
    // A window longer than the series is not an error
    assert!(report.rolling_variance.unwrap().unwrap().values()[0].is_none());

    let text = SignalAnalyzer::default().analyze(&series).to_string();
    assert!(text.contains("Spectral analysis failed: Insufficient data"));
}
