use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value as JsonValue};

use super::loader::extension;
use super::model::{Table, Value};
use crate::error::PrepError;

/// Write a table to `path`, choosing the format from the extension.
///
/// No row-index column is ever written: the output has exactly the
/// table's own columns.
pub fn save_file(table: &Table, path: &Path) -> Result<()> {
    let ext = extension(path);
    let written = match ext.as_str() {
        "csv" => save_csv(table, path),
        "parquet" | "pq" => save_parquet(table, path),
        "json" => save_json(table, path),
        other => return Err(PrepError::UnsupportedFormat(other.to_string()).into()),
    };
    written.with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

fn save_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for (row_no, rec) in table.records.iter().enumerate() {
        writer
            .write_record(rec.cells.iter().map(|c| c.to_string()))
            .with_context(|| format!("CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON writer
// ---------------------------------------------------------------------------

fn save_json(table: &Table, path: &Path) -> Result<()> {
    let rows: Vec<JsonValue> = table
        .records
        .iter()
        .map(|rec| {
            let obj: Map<String, JsonValue> = table
                .columns
                .iter()
                .cloned()
                .zip(rec.cells.iter().map(value_to_json))
                .collect();
            JsonValue::Object(obj)
        })
        .collect();

    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer(std::io::BufWriter::new(file), &rows).context("serializing JSON")?;
    Ok(())
}

fn value_to_json(val: &Value) -> JsonValue {
    match val {
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Integer(i) => JsonValue::from(*i),
        // Non-finite floats have no JSON form.
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

/// Narrowest Arrow type that holds every non-null cell of a column.
fn column_type(table: &Table, idx: usize) -> DataType {
    let mut ty = DataType::Null;
    for rec in &table.records {
        let cell_ty = match &rec.cells[idx] {
            Value::Null => continue,
            Value::Integer(_) => DataType::Int64,
            Value::Float(_) => DataType::Float64,
            Value::Bool(_) => DataType::Boolean,
            Value::String(_) => DataType::Utf8,
        };
        ty = match (&ty, &cell_ty) {
            (DataType::Null, _) => cell_ty.clone(),
            (a, b) if a == b => continue,
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                DataType::Float64
            }
            _ => DataType::Utf8,
        };
    }
    ty
}

fn build_array(table: &Table, idx: usize, ty: &DataType) -> ArrayRef {
    let cells = table.records.iter().map(|rec| &rec.cells[idx]);
    match ty {
        DataType::Int64 => Arc::new(Int64Array::from(
            cells
                .map(|c| match c {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        DataType::Float64 => Arc::new(Float64Array::from(
            cells.map(Value::as_f64).collect::<Vec<_>>(),
        )),
        DataType::Boolean => Arc::new(BooleanArray::from(
            cells
                .map(|c| match c {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        // All-null columns are stored as nullable strings.
        _ => Arc::new(StringArray::from(
            cells
                .map(|c| match c {
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect::<Vec<_>>(),
        )),
    }
}

fn save_parquet(table: &Table, path: &Path) -> Result<()> {
    let mut fields = Vec::with_capacity(table.columns.len());
    let mut arrays = Vec::with_capacity(table.columns.len());
    for (idx, name) in table.columns.iter().enumerate() {
        let ty = match column_type(table, idx) {
            DataType::Null => DataType::Utf8,
            other => other,
        };
        arrays.push(build_array(table, idx, &ty));
        fields.push(Field::new(name, ty, true));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
