//! Outlier removal for the credit-card fraud dataset.
//!
//! Bounds for a handful of features are learned from the fraud rows with
//! the IQR rule and then applied to every row of the table.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;

pub use config::Settings;
pub use error::PrepError;
pub use pipeline::{RunReport, generate};
