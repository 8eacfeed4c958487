use std::sync::{Arc, Mutex};

use tabular_extract::observability::{ExtractContext, ExtractObserver, ExtractStats, Severity};
use tabular_extract::{
    extract, extract_with_details, resolve_format, ExtractError, ExtractOptions, Extractor, Format,
};

#[test]
fn formats_resolve_from_extensions() {
    assert_eq!(resolve_format("data.csv").unwrap(), Format::Delimited);
    assert_eq!(resolve_format("data.txt").unwrap(), Format::Delimited);
    assert_eq!(resolve_format("data.json").unwrap(), Format::JsonArray);
    assert_eq!(resolve_format("data.xlsx").unwrap(), Format::Xlsx);
    assert_eq!(resolve_format("data.xls").unwrap(), Format::Xls);
    assert_eq!(resolve_format("data.zip").unwrap(), Format::Archive);
}

#[test]
fn extension_matching_is_case_insensitive() {
    assert_eq!(resolve_format("DATA.CSV").unwrap(), Format::Delimited);
    assert_eq!(resolve_format("report.XlSx").unwrap(), Format::Xlsx);
}

#[test]
fn unknown_extension_is_unsupported() {
    let err = resolve_format("data.parquet").unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains("data.parquet"));
}

#[test]
fn missing_extension_is_unsupported() {
    let err = resolve_format("README").unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
}

#[test]
fn resolution_happens_before_any_io() {
    // The file does not exist; an unknown extension must still fail with
    // UnsupportedFormat, not a filesystem error.
    let err = extract("no/such/file.dat", &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
}

#[test]
fn only_archives_report_as_archives() {
    assert!(Format::Archive.is_archive());
    assert!(!Format::Delimited.is_archive());
    assert!(!Format::JsonArray.is_archive());
    assert!(!Format::Xlsx.is_archive());
    assert!(!Format::Xls.is_archive());
}

#[test]
fn details_report_format_count_and_delimiter() {
    let details =
        extract_with_details("tests/fixtures/test.csv", &ExtractOptions::default()).unwrap();

    assert_eq!(details.format, Format::Delimited);
    assert_eq!(details.row_count, 3);
    assert_eq!(details.row_count, details.records.len());
    assert_eq!(details.delimiter, Some(b','));
}

#[test]
fn details_report_detected_delimiter() {
    let details =
        extract_with_details("tests/fixtures/semicolon.txt", &ExtractOptions::default()).unwrap();
    assert_eq!(details.delimiter, Some(b';'));
}

#[test]
fn details_have_no_delimiter_for_non_delimited_formats() {
    let details =
        extract_with_details("tests/fixtures/test.json", &ExtractOptions::default()).unwrap();
    assert_eq!(details.format, Format::JsonArray);
    assert_eq!(details.delimiter, None);
}

#[test]
fn repeated_extraction_is_idempotent() {
    let extractor = Extractor::new();
    let first = extractor
        .extract("tests/fixtures/semicolon.txt", &ExtractOptions::default())
        .unwrap();
    // The second read hits the delimiter cache; the result must not change.
    let second = extractor
        .extract("tests/fixtures/semicolon.txt", &ExtractOptions::default())
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn clearing_the_cache_does_not_change_results() {
    let extractor = Extractor::new();
    let before = extractor
        .extract("tests/fixtures/semicolon.txt", &ExtractOptions::default())
        .unwrap();
    extractor.clear_cache();
    let after = extractor
        .extract("tests/fixtures/semicolon.txt", &ExtractOptions::default())
        .unwrap();
    assert_eq!(before, after);
}

#[derive(Default)]
struct EventCollector {
    successes: Mutex<Vec<(Format, usize)>>,
    failures: Mutex<Vec<Severity>>,
}

impl ExtractObserver for EventCollector {
    fn on_success(&self, ctx: &ExtractContext, stats: ExtractStats) {
        self.successes.lock().unwrap().push((ctx.format, stats.rows));
    }

    fn on_failure(&self, _ctx: &ExtractContext, severity: Severity, _error: &ExtractError) {
        self.failures.lock().unwrap().push(severity);
    }
}

#[test]
fn observer_sees_success_with_row_count() {
    let collector = Arc::new(EventCollector::default());
    let options = ExtractOptions {
        observer: Some(collector.clone()),
        ..Default::default()
    };
    extract("tests/fixtures/test.csv", &options).unwrap();

    let successes = collector.successes.lock().unwrap();
    assert_eq!(successes.as_slice(), [(Format::Delimited, 3)]);
    assert!(collector.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_sees_missing_file_as_critical() {
    let collector = Arc::new(EventCollector::default());
    let options = ExtractOptions {
        observer: Some(collector.clone()),
        ..Default::default()
    };
    let err = extract("no/such/file.csv", &options).unwrap_err();
    assert!(matches!(err, ExtractError::Io(_)));

    let failures = collector.failures.lock().unwrap();
    assert_eq!(failures.as_slice(), [Severity::Critical]);
    assert!(collector.successes.lock().unwrap().is_empty());
}

#[test]
fn free_functions_match_extractor_methods() {
    let extractor = Extractor::new();
    let via_method = extractor
        .extract("tests/fixtures/test.csv", &ExtractOptions::default())
        .unwrap();
    let via_free = extract("tests/fixtures/test.csv", &ExtractOptions::default()).unwrap();
    assert_eq!(via_free, via_method);
}
