use std::fs;
use std::path::Path;

use fraud_prep::data::loader::load_file;
use fraud_prep::{PrepError, Settings, generate};

fn settings(root: &Path, file: &str) -> Settings {
    Settings {
        data_raw: root.join("raw"),
        data_transformed: root.join("transformed"),
        dataset_file: file.to_string(),
        ..Settings::default()
    }
}

/// Fraud rows hold V10/V12/V14 = 1..=5, giving bounds [-1, 7] on each.
const CSV: &str = "\
,Time,V10,V12,V14,Amount,Class
0,0,1.0,1.0,1.0,10.0,1
1,1,2.0,2.0,2.0,11.5,1
2,2,3.0,3.0,3.0,3.25,1
3,3,4.0,4.0,4.0,0.0,1
4,4,5.0,5.0,5.0,99.0,1
5,5,0.5,0.5,0.5,1.0,0
6,6,7.0,-1.0,6.5,2.0,0
7,7,0.0,0.0,-3.0,4.0,0
8,8,0.0,12.0,0.0,8.0,0
9,9,-1.5,0.0,0.0,16.0,0
";

fn write_raw(settings: &Settings, body: &str) {
    fs::create_dir_all(&settings.data_raw).unwrap();
    fs::write(settings.raw_path(), body).unwrap();
}

#[test]
fn missing_input_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "creditcard.csv");

    let report = generate(&settings).unwrap();
    assert!(report.is_none());
    assert!(!settings.transformed_path().exists());
    assert!(!settings.data_transformed.exists());
}

#[test]
fn removes_outliers_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "creditcard.csv");
    write_raw(&settings, CSV);

    let report = generate(&settings).unwrap().expect("input exists");
    assert_eq!(report.rows_in, 10);
    assert_eq!(report.rows_out, 7);
    assert_eq!(report.rows_removed(), 3);
    assert_eq!(report.distribution.count(1), 5);
    assert_eq!(report.distribution.percent(1), 50.0);

    let v14 = report.thresholds["V14"];
    assert_eq!((v14.lower, v14.upper), (-1.0, 7.0));

    let text = fs::read_to_string(settings.transformed_path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Time,V10,V12,V14,Amount,Class"));
    let times: Vec<&str> = lines.map(|l| l.split(',').next().unwrap()).collect();
    assert_eq!(times, vec!["0", "1", "2", "3", "4", "5", "6"]);
}

#[test]
fn output_never_grows() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "creditcard.csv");
    write_raw(&settings, CSV);

    let report = generate(&settings).unwrap().unwrap();
    let output = load_file(&report.output).unwrap();
    assert!(output.len() <= report.rows_in);
    assert_eq!(output.len(), report.rows_out);
}

#[test]
fn overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "creditcard.csv");
    write_raw(&settings, CSV);
    fs::create_dir_all(&settings.data_transformed).unwrap();
    fs::write(settings.transformed_path(), "stale\n").unwrap();

    generate(&settings).unwrap().unwrap();
    let output = load_file(&settings.transformed_path()).unwrap();
    assert_eq!(output.len(), 7);
}

#[test]
fn parquet_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let csv_settings = settings(dir.path(), "creditcard.csv");
    write_raw(&csv_settings, CSV);

    // Convert the CSV fixture into the raw parquet input.
    let table = load_file(&csv_settings.raw_path()).unwrap();
    let pq_settings = settings(dir.path(), "creditcard.parquet");
    fraud_prep::data::writer::save_file(&table, &pq_settings.raw_path()).unwrap();

    let report = generate(&pq_settings).unwrap().unwrap();
    assert_eq!(report.rows_out, 7);
    assert_eq!(load_file(&pq_settings.transformed_path()).unwrap().len(), 7);
}

#[test]
fn empty_and_nan_cells_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "creditcard.csv");
    write_raw(
        &settings,
        "V10,V12,V14,Class\n1,1,1,1\n2,2,2,1\n3,3,3,1\n4,4,4,1\n0,0,,0\n0,0,NaN,0\n",
    );

    let report = generate(&settings).unwrap().expect("input exists");
    assert_eq!(report.rows_out, 6);
    // fraud V14 = 1..=4 → q25 = 1.75, q75 = 3.25
    let v14 = report.thresholds["V14"];
    assert_eq!((v14.lower, v14.upper), (-0.5, 5.5));

    let text = fs::read_to_string(settings.transformed_path()).unwrap();
    let tail: Vec<&str> = text.lines().skip(5).collect();
    assert_eq!(tail, vec!["0,0,,0", "0,0,NaN,0"]);
}

#[test]
fn text_in_feature_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "creditcard.csv");
    write_raw(&settings, "V10,V12,V14,Class\n1,1,1,1\n0,0,n/a,0\n");

    let err = generate(&settings).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PrepError>(),
        Some(PrepError::NonNumeric { row: 1, .. })
    ));
}

#[test]
fn no_fraud_rows_fails() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "creditcard.csv");
    write_raw(&settings, "V10,V12,V14,Class\n1.0,1.0,1.0,0\n2.0,2.0,2.0,0\n");

    let err = generate(&settings).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PrepError>(),
        Some(PrepError::NoMinorityRows { .. })
    ));
    assert!(!settings.transformed_path().exists());
}

#[test]
fn missing_feature_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "creditcard.csv");
    write_raw(&settings, "V10,V12,Class\n1.0,1.0,1\n");

    let err = generate(&settings).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PrepError>(),
        Some(PrepError::MissingColumn(c)) if c == "V14"
    ));
}
