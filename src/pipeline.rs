use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::data::filter::{ThresholdSet, compute_thresholds, remove_outliers};
use crate::data::loader::load_file;
use crate::data::stats::ClassDistribution;
use crate::data::writer::save_file;

const DOWNLOAD_URL: &str = "https://www.kaggle.com/mlg-ulb/creditcardfraud/download";

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_in: usize,
    pub rows_out: usize,
    pub distribution: ClassDistribution,
    pub thresholds: ThresholdSet,
}

impl RunReport {
    pub fn rows_removed(&self) -> usize {
        self.rows_in - self.rows_out
    }
}

/// Load the raw dataset, drop outliers and write it to the transformed
/// directory.
///
/// A missing input file is not an error: the download location is logged
/// and `Ok(None)` is returned without touching the output directory.
pub fn generate(settings: &Settings) -> Result<Option<RunReport>> {
    log::info!("Loading dataset");
    let input = settings.raw_path();
    if !input.is_file() {
        log::info!(
            "{} not found in {}",
            settings.dataset_file,
            settings.data_raw.display()
        );
        log::info!(
            "please download the file from url = '{DOWNLOAD_URL}' and place it in {}",
            settings.data_raw.display()
        );
        return Ok(None);
    }

    let mut table = load_file(&input)?;
    let rows_in = table.len();

    log::info!("Preprocessing dataset from raw to transformed");
    let distribution = ClassDistribution::from_labels(&table.column_labels(&settings.class_column)?);
    let minority = settings.minority_label;
    log::info!(
        "No Frauds {} % of the dataset",
        distribution.percent_other(minority)
    );
    log::info!("Frauds {} % of the dataset", distribution.percent(minority));

    log::info!("Outlier removal");
    let thresholds = compute_thresholds(&table, &settings.threshold_spec())?;
    remove_outliers(&mut table, &thresholds)?;

    let output = settings.transformed_path();
    std::fs::create_dir_all(&settings.data_transformed).with_context(|| {
        format!("creating {}", settings.data_transformed.display())
    })?;
    save_file(&table, &output)?;

    log::info!("Done!");
    Ok(Some(RunReport {
        input,
        output,
        rows_in,
        rows_out: table.len(),
        distribution,
        thresholds,
    }))
}
