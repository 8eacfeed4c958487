use std::io::Write;
use std::sync::{Arc, Mutex};

use tabular_extract::observability::{ExtractContext, ExtractObserver};
use tabular_extract::{
    extract, extract_as_stream, ExtractError, ExtractOptions, HeaderMode, Record,
};

fn value(records: &[Record], row: usize, key: &str) -> serde_json::Value {
    records[row].get(key).cloned().unwrap()
}

#[derive(Default)]
struct SkipCollector {
    skipped: Mutex<Vec<String>>,
}

impl ExtractObserver for SkipCollector {
    fn on_row_skipped(&self, _ctx: &ExtractContext, error: &ExtractError) {
        self.skipped.lock().unwrap().push(error.to_string());
    }
}

#[test]
fn extract_csv_happy_path() {
    let records = extract("tests/fixtures/test.csv", &ExtractOptions::default()).unwrap();

    assert_eq!(records.len(), 3);
    // CSV values stay strings.
    assert_eq!(value(&records, 0, "name"), serde_json::json!("Alice"));
    assert_eq!(value(&records, 0, "age"), serde_json::json!("30"));
    assert_eq!(value(&records, 0, "city"), serde_json::json!("Paris"));
}

#[test]
fn record_keys_follow_source_column_order() {
    let records = extract("tests/fixtures/test.csv", &ExtractOptions::default()).unwrap();
    let keys: Vec<&String> = records[0].keys().collect();
    assert_eq!(keys, ["name", "age", "city"]);
}

#[test]
fn positional_mode_uses_synthetic_keys() {
    let options = ExtractOptions {
        header_mode: HeaderMode::Positional,
        ..Default::default()
    };
    let records = extract("tests/fixtures/test.csv", &options).unwrap();

    // The header row is data in positional mode.
    assert_eq!(records.len(), 4);
    let keys: Vec<&String> = records[1].keys().collect();
    assert_eq!(keys, ["column_1", "column_2", "column_3"]);
    assert_eq!(value(&records, 1, "column_1"), serde_json::json!("Alice"));
    assert_eq!(value(&records, 1, "column_2"), serde_json::json!("30"));
}

#[test]
fn row_limit_yields_prefix_of_unlimited_result() {
    let unlimited = extract("tests/fixtures/test.csv", &ExtractOptions::default()).unwrap();
    let limited = extract(
        "tests/fixtures/test.csv",
        &ExtractOptions {
            limit: Some(2),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(limited.len(), 2);
    assert_eq!(limited[..], unlimited[..2]);
}

#[test]
fn row_limit_larger_than_file_is_harmless() {
    let records = extract(
        "tests/fixtures/test.csv",
        &ExtractOptions {
            limit: Some(10),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn explicit_delimiter_overrides_detection() {
    let options = ExtractOptions {
        delimiter: Some(b';'),
        ..Default::default()
    };
    let records = extract("tests/fixtures/semicolon.txt", &options).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(value(&records, 0, "name"), serde_json::json!("Alice"));
}

#[test]
fn semicolon_delimiter_is_auto_detected() {
    let records = extract("tests/fixtures/semicolon.txt", &ExtractOptions::default()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(value(&records, 1, "city"), serde_json::json!("Berlin"));
}

#[test]
fn stream_read_matches_batch_read() {
    let batch = extract("tests/fixtures/test.csv", &ExtractOptions::default()).unwrap();
    let stream = extract_as_stream("tests/fixtures/test.csv", &ExtractOptions::default()).unwrap();
    let streamed: Vec<Record> = stream.collect();
    assert_eq!(streamed, batch);
}

#[test]
fn stream_reports_format_and_delimiter() {
    let stream =
        extract_as_stream("tests/fixtures/semicolon.txt", &ExtractOptions::default()).unwrap();
    assert_eq!(stream.format(), tabular_extract::Format::Delimited);
    assert_eq!(stream.delimiter(), Some(b';'));
}

#[test]
fn stream_respects_row_limit() {
    let stream = extract_as_stream(
        "tests/fixtures/test.csv",
        &ExtractOptions {
            limit: Some(2),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(stream.count(), 2);
}

#[test]
fn malformed_row_is_skipped_with_warning() {
    // Row 3 is not valid UTF-8; it should be skipped, not abort the read.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"name,score\nok,1\n\xff\xfe,2\nalso,3\n")
        .unwrap();

    let collector = Arc::new(SkipCollector::default());
    let options = ExtractOptions {
        observer: Some(collector.clone()),
        ..Default::default()
    };
    let records = extract(&path, &options).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("name"), Some(&serde_json::json!("ok")));
    assert_eq!(records[1].get("name"), Some(&serde_json::json!("also")));

    let skipped = collector.skipped.lock().unwrap();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].contains("row 3"));
}

#[test]
fn short_rows_pad_missing_columns_with_empty_strings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    std::fs::write(&path, "a,b,c\n1,2\n4,5,6,7\n").unwrap();

    let records = extract(&path, &ExtractOptions::default()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("c"), Some(&serde_json::json!("")));
    // Extra fields beyond the headers are dropped.
    assert_eq!(records[1].len(), 3);
}

#[test]
fn utf8_bom_is_stripped_from_the_first_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bom.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"\xef\xbb\xbfname,age\nAda,36\n").unwrap();

    let records = extract(&path, &ExtractOptions::default()).unwrap();
    let keys: Vec<&String> = records[0].keys().collect();
    assert_eq!(keys, ["name", "age"]);
    assert_eq!(records[0].get("name"), Some(&serde_json::json!("Ada")));
}

#[test]
fn keyed_values_strip_embedded_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quoted.csv");
    std::fs::write(&path, "name,note\nAli\"ce,fine\n").unwrap();

    let records = extract(&path, &ExtractOptions::default()).unwrap();
    assert_eq!(records[0].get("name"), Some(&serde_json::json!("Alice")));
}

#[test]
fn positional_values_strip_embedded_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quoted.csv");
    std::fs::write(&path, "Ali\"ce,30\n").unwrap();

    let options = ExtractOptions {
        header_mode: HeaderMode::Positional,
        delimiter: Some(b','),
        ..Default::default()
    };
    let records = extract(&path, &options).unwrap();
    assert_eq!(
        records[0].get("column_1"),
        Some(&serde_json::json!("Alice"))
    );
}
