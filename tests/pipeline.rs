use approx::assert_relative_eq;
use std::io::Write;
use tickstats::prelude::*;

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn csv_to_records_for_both_conventions() {
    let file = write_csv(
        "date,close,symbol\n\
         2024-01-02,100.0,ACME\n\
         2024-01-03,110.0,ACME\n\
         2024-01-04,121.0,ACME\n\
         2024-01-05,99.0,ACME\n",
    );
    let records = load_csv(file.path()).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2024, 1, 5);
    let series = build_price_series(&records, "ACME", None, end).unwrap();

    let config = MetricsConfig::default();
    let simple = compute_series_metrics(&series, ReturnConvention::Simple, &config).unwrap();
    let log = compute_series_metrics(&series, ReturnConvention::Log, &config).unwrap();

    match simple.metrics() {
        ConventionMetrics::Simple(m) => {
            assert_relative_eq!(m.cumulative_return, 1.21, epsilon = 1e-12);
            assert_relative_eq!(m.annualized_return, 25.2, epsilon = 1e-9);
            assert_eq!(m.max_drawdown, 0.0);
        }
        other => panic!("expected simple metrics, got {:?}", other),
    }

    match log.metrics() {
        ConventionMetrics::Log(m) => {
            assert_relative_eq!(m.cumulative_return, 1.21, epsilon = 1e-12);
            assert_relative_eq!(
                m.annualized_return,
                (1.1f64.ln() * 252.0).exp() - 1.0,
                max_relative = 1e-9
            );
        }
        other => panic!("expected log metrics, got {:?}", other),
    }
}

#[test]
fn drawdown_measured_from_running_peak() {
    let record = compute_metrics(
        "DIP",
        &[100.0, 120.0, 90.0, 130.0],
        ReturnConvention::Simple,
        &MetricsConfig::default(),
    )
    .unwrap();

    assert_relative_eq!(
        record.get(MetricName::MaximumDrawdown).unwrap(),
        0.25,
        epsilon = 1e-12
    );
}

#[test]
fn flat_prices_report_non_finite_ratios_by_default() {
    let record = compute_metrics(
        "FLAT",
        &[50.0, 50.0, 50.0, 50.0],
        ReturnConvention::Simple,
        &MetricsConfig::default(),
    )
    .unwrap();

    assert_eq!(record.get(MetricName::SimpleAnnualizedVolatility), Some(0.0));
    assert!(record.get(MetricName::RawSharpeRatio).unwrap().is_nan());
    assert_eq!(
        record.get(MetricName::SharpeRatio),
        Some(f64::NEG_INFINITY)
    );
    assert!(record.has_non_finite());
}

#[test]
fn flat_prices_rejected_under_strict_policy() {
    let config = MetricsConfig::default().with_policy(DegeneratePolicy::Strict);
    let err = compute_metrics("FLAT", &[50.0, 50.0, 50.0], ReturnConvention::Log, &config)
        .unwrap_err();

    assert!(matches!(err, MetricsError::DegenerateSeries(_)));
}

#[test]
fn records_serialize_as_ordered_json() {
    let record = compute_metrics(
        "ACME",
        &[100.0, 101.0, 102.5, 101.7],
        ReturnConvention::Simple,
        &MetricsConfig::default(),
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
    assert_eq!(value["symbol"], "ACME");
    assert_eq!(value["convention"], "simple");

    let keys: Vec<String> = value["metrics"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys.len(), 7);
    assert!(keys.contains(&"CAGR".to_string()));
}
