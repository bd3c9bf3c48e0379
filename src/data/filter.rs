use std::collections::BTreeMap;

use super::model::Table;
use super::stats::percentile_sorted;
use crate::error::PrepError;

// ---------------------------------------------------------------------------
// Threshold definitions
// ---------------------------------------------------------------------------

/// Tukey fence multiplier applied to the IQR.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Which rows the bounds are learned from and how wide the fences are.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSpec {
    pub features: Vec<String>,
    pub class_column: String,
    pub minority_label: i64,
    pub iqr_multiplier: f64,
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        Self {
            features: vec!["V14".into(), "V12".into(), "V10".into()],
            class_column: "Class".into(),
            minority_label: 1,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

/// Inclusive cut-off range for one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureBounds {
    pub q25: f64,
    pub q75: f64,
    pub lower: f64,
    pub upper: f64,
    /// Minority-class values of this feature outside `[lower, upper]`.
    pub minority_outliers: usize,
}

impl FeatureBounds {
    pub fn iqr(&self) -> f64 {
        self.q75 - self.q25
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lower && v <= self.upper
    }

    /// Strictly below `lower` or above `upper`. NaN is never an outlier.
    pub fn is_outlier(&self, v: f64) -> bool {
        v < self.lower || v > self.upper
    }
}

/// Feature name → bounds.
pub type ThresholdSet = BTreeMap<String, FeatureBounds>;

// ---------------------------------------------------------------------------
// Threshold computation
// ---------------------------------------------------------------------------

/// Compute IQR bounds per feature from the minority-class rows only.
///
/// An empty minority class leaves the percentiles undefined and is
/// reported as [`PrepError::NoMinorityRows`].
pub fn compute_thresholds(table: &Table, spec: &ThresholdSpec) -> Result<ThresholdSet, PrepError> {
    let labels = table.column_labels(&spec.class_column)?;
    let mut thresholds = ThresholdSet::new();

    for feature in &spec.features {
        let values = table.column_f64(feature)?;
        let mut minority: Vec<f64> = values
            .iter()
            .zip(&labels)
            .filter_map(|(&v, &label)| (label == spec.minority_label).then_some(v))
            .filter(|v| !v.is_nan())
            .collect();
        minority.sort_by(f64::total_cmp);

        let no_rows = || PrepError::NoMinorityRows {
            feature: feature.clone(),
        };
        let q25 = percentile_sorted(&minority, 25.0).ok_or_else(no_rows)?;
        let q75 = percentile_sorted(&minority, 75.0).ok_or_else(no_rows)?;
        let cut_off = (q75 - q25) * spec.iqr_multiplier;

        let mut bounds = FeatureBounds {
            q25,
            q75,
            lower: q25 - cut_off,
            upper: q75 + cut_off,
            minority_outliers: 0,
        };
        bounds.minority_outliers = minority.iter().filter(|&&v| bounds.is_outlier(v)).count();

        log::info!(
            "Feature {feature} Outliers for Fraud Cases: {}",
            bounds.minority_outliers
        );
        log::debug!(
            "{feature}: q25={q25} q75={q75} iqr={} bounds=[{}, {}]",
            bounds.iqr(),
            bounds.lower,
            bounds.upper
        );
        thresholds.insert(feature.clone(), bounds);
    }

    Ok(thresholds)
}

// ---------------------------------------------------------------------------
// Row filtering
// ---------------------------------------------------------------------------

/// Return indices of records that lie within every feature's bounds.
///
/// Class is ignored here: a majority row outside the fraud-derived range
/// is dropped as well.
pub fn filtered_indices(table: &Table, thresholds: &ThresholdSet) -> Result<Vec<usize>, PrepError> {
    let mut keep = vec![true; table.len()];
    for (feature, bounds) in thresholds {
        let values = table.column_f64(feature)?;
        for (flag, v) in keep.iter_mut().zip(values) {
            if bounds.is_outlier(v) {
                *flag = false;
            }
        }
    }
    Ok(keep
        .iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect())
}

/// Drop every record that falls outside any threshold.
pub fn remove_outliers(table: &mut Table, thresholds: &ThresholdSet) -> Result<usize, PrepError> {
    let before = table.len();
    let keep = filtered_indices(table, thresholds)?;
    table.retain_indices(&keep);
    log::info!(
        "Number of Instances after outliers removal: {}",
        table.len()
    );
    Ok(before - table.len())
}
