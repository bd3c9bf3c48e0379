use std::collections::BTreeMap;

/// The `p`-th percentile (0..=100) of `values`, interpolating linearly
/// between the two closest ranks.
///
/// Returns `None` for an empty slice. NaN values sort last and should be
/// filtered out by the caller.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, p)
}

/// [`percentile`] over an already ascending slice.
///
/// Interpolates from the nearer rank, as numpy's `linear` method does, so
/// fences computed here agree with numpy to the last bit.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    let (a, b) = (sorted[lo], sorted[hi]);
    if frac >= 0.5 {
        Some(b - (b - a) * (1.0 - frac))
    } else {
        Some(a + (b - a) * frac)
    }
}

// ---------------------------------------------------------------------------
// Class distribution
// ---------------------------------------------------------------------------

/// Row counts per class label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDistribution {
    pub counts: BTreeMap<i64, usize>,
    pub total: usize,
}

impl ClassDistribution {
    pub fn from_labels(labels: &[i64]) -> Self {
        let mut counts = BTreeMap::new();
        for &label in labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        ClassDistribution {
            counts,
            total: labels.len(),
        }
    }

    pub fn count(&self, label: i64) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Share of `label` in percent, rounded to two decimals.
    pub fn percent(&self, label: i64) -> f64 {
        self.share(self.count(label))
    }

    /// Share of every row not labelled `label`, rounded to two decimals.
    pub fn percent_other(&self, label: i64) -> f64 {
        self.share(self.total - self.count(label))
    }

    fn share(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let pct = count as f64 / self.total as f64 * 100.0;
        (pct * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        // rank 0.75 between 1 and 2
        assert_eq!(percentile(&v, 25.0), Some(1.75));
        assert_eq!(percentile(&v, 50.0), Some(2.5));
        assert_eq!(percentile(&v, 75.0), Some(3.25));
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 100.0), Some(4.0));
    }

    #[test]
    fn percentile_exact_rank() {
        let v = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&v, 25.0), Some(20.0));
        assert_eq!(percentile(&v, 75.0), Some(40.0));
    }

    #[test]
    fn percentile_upper_half_interpolates_from_above() {
        // rank 3.75: a + (b - a) * 0.75 would give 2.922441882615642
        let v = [
            -3.0,
            -2.0,
            -1.5,
            -1.4467888839335323,
            4.378852138132034,
            10.0,
        ];
        assert_eq!(percentile(&v, 75.0), Some(2.9224418826156424));
    }

    #[test]
    fn percentile_edge_cases() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.0], 25.0), Some(7.0));
        assert_eq!(percentile(&[7.0], 75.0), Some(7.0));
    }

    #[test]
    fn class_distribution_percentages() {
        let dist = ClassDistribution::from_labels(&[0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(dist.total, 12);
        assert_eq!(dist.count(1), 1);
        assert_eq!(dist.count(2), 0);
        assert_eq!(dist.percent(1), 8.33);
        assert_eq!(dist.percent(0), 91.67);
        assert_eq!(dist.percent_other(1), 91.67);
        assert_eq!(ClassDistribution::default().percent(1), 0.0);
        assert_eq!(ClassDistribution::default().percent_other(1), 0.0);
    }

    #[test]
    fn percent_other_pools_every_non_minority_label() {
        let dist = ClassDistribution::from_labels(&[0, 0, 2, 1]);
        assert_eq!(dist.percent(1), 25.0);
        assert_eq!(dist.percent_other(1), 75.0);
    }
}
