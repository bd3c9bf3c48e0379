use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Record, Table, Value};
use crate::error::PrepError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (the Kaggle layout)
/// * `.parquet` – flat scalar columns, as written by `df.to_parquet()`
/// * `.json`    – `[{ "V1": ..., "Class": 0 }, ...]` (`orient='records'`)
///
/// A leading unnamed index column is dropped.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = extension(path);
    let mut table = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => return Err(PrepError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if table.drop_index_column() {
        log::debug!("Dropped unnamed index column from {}", path.display());
    }
    Ok(table)
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = record.iter().map(|field| Value::parse(field.trim())).collect();
        records.push(Record { cells });
    }

    Ok(Table::new(columns, records)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Columns are taken in first-seen key order; a key missing from a row
/// becomes a null cell.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(rows.len());
    let mut columns: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let records = objects
        .iter()
        .map(|obj| Record {
            cells: columns
                .iter()
                .map(|col| obj.get(col).map_or(Value::Null, json_to_value))
                .collect(),
        })
        .collect();

    Ok(Table::new(columns, records)?)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested columns are rejected.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let arrays = batch.columns();

        for (array, name) in arrays.iter().zip(&columns) {
            if !is_scalar(array.data_type()) {
                bail!("column '{name}' has unsupported type {:?}", array.data_type());
            }
        }

        for row in 0..batch.num_rows() {
            let cells = arrays.iter().map(|col| extract_value(col, row)).collect();
            records.push(Record { cells });
        }
    }

    Ok(Table::new(columns, records)?)
}

// -- Arrow helpers --

fn is_scalar(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
            | DataType::Null
    )
}

/// Extract a single cell from an Arrow column at a given row.
/// The column type must already have passed [`is_scalar`].
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_typed_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "t.csv", "Time,V14,Amount,Class\n0,-1.25,149.62,0\n1,3e-2,2.69,1\n");

        let table = load_file(&path).unwrap();
        assert_eq!(table.columns, vec!["Time", "V14", "Amount", "Class"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].cells[1], Value::Float(-1.25));
        assert_eq!(table.records[1].cells[1], Value::Float(0.03));
        assert_eq!(table.column_labels("Class").unwrap(), vec![0, 1]);
    }

    #[test]
    fn csv_index_column_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "t.csv", ",V14,Class\n0,1.5,0\n1,2.5,1\n");

        let table = load_file(&path).unwrap();
        assert_eq!(table.columns, vec!["V14", "Class"]);
        assert_eq!(table.records[1].cells, vec![Value::Float(2.5), Value::Integer(1)]);
    }

    #[test]
    fn ragged_csv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "t.csv", "V14,Class\n1.0,0\n2.0\n");
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "t.json",
            r#"[{"V14": -0.5, "Class": 0}, {"V14": 4, "Class": 1, "note": "x"}]"#,
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.columns, vec!["V14", "Class", "note"]);
        assert_eq!(table.records[0].cells[2], Value::Null);
        assert_eq!(table.column_f64("V14").unwrap(), vec![-0.5, 4.0]);
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "t.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }
}
