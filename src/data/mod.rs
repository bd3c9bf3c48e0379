/// Data layer: core types, loading, outlier filtering and saving.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  column names, Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  minority-class IQR bounds → kept rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  Table → file, no index column
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod writer;
