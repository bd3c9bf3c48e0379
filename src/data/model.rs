use std::fmt;

use crate::error::PrepError;

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the pandas dtypes a CSV can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Value {
    /// Full precision: this is what gets written back to disk.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            // Keep integral floats recognisable as floats ("2.0", not "2").
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:?}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    /// Interpret the cell as an `f64` for threshold computation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the cell as an integer class label.
    ///
    /// Pandas happily writes `Class` as `1.0` once a column has been
    /// touched by a float operation, so integral floats are accepted.
    pub fn as_label(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Guess the type of a raw text cell.
    pub fn parse(s: &str) -> Value {
        if s.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        if s == "true" || s == "false" || s == "True" || s == "False" {
            return Value::Bool(s.eq_ignore_ascii_case("true"));
        }
        Value::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single row; `cells[i]` belongs to `Table::columns[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cells: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Header names that mark a leftover row-index column.
const INDEX_HEADERS: [&str; 2] = ["", "Unnamed: 0"];

/// An ordered, column-named sequence of records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    /// Build a table, checking that every record matches the header width.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self, PrepError> {
        for (row, rec) in records.iter().enumerate() {
            if rec.cells.len() != columns.len() {
                return Err(PrepError::RaggedRow {
                    row,
                    expected: columns.len(),
                    found: rec.cells.len(),
                });
            }
        }
        Ok(Table { columns, records })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, PrepError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PrepError::MissingColumn(name.to_string()))
    }

    /// All values of a column as `f64`, failing on the first non-numeric cell.
    ///
    /// Empty cells read as NaN, the way pandas loads them.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, PrepError> {
        let idx = self.column_index(name)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, rec)| {
                let cell = &rec.cells[idx];
                if *cell == Value::Null {
                    return Ok(f64::NAN);
                }
                cell.as_f64().ok_or_else(|| PrepError::NonNumeric {
                    row,
                    column: name.to_string(),
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    /// All values of a column as integer class labels.
    pub fn column_labels(&self, name: &str) -> Result<Vec<i64>, PrepError> {
        let idx = self.column_index(name)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, rec)| {
                let cell = &rec.cells[idx];
                cell.as_label().ok_or_else(|| PrepError::InvalidLabel {
                    row,
                    column: name.to_string(),
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    /// Keep only the records at `indices` (ascending), preserving order.
    pub fn retain_indices(&mut self, indices: &[usize]) {
        let mut keep = indices.iter().peekable();
        let mut row = 0;
        self.records.retain(|_| {
            let hit = keep.peek() == Some(&&row);
            if hit {
                keep.next();
            }
            row += 1;
            hit
        });
    }

    /// Drop a leading unnamed column left behind by an index-writing export.
    ///
    /// Returns `true` if a column was removed.
    pub fn drop_index_column(&mut self) -> bool {
        match self.columns.first() {
            Some(first) if INDEX_HEADERS.contains(&first.as_str()) => {
                self.columns.remove(0);
                for rec in &mut self.records {
                    rec.cells.remove(0);
                }
                true
            }
            _ => false,
        }
    }
}
