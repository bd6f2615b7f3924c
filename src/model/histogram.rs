//! Fixed-length probability histograms merged by cumulative moving average,
//! and the log-spaced binning used for local variance.

/// `log10(variance)` values below this floor land in the lowest bin.
pub const LOG10_VARIANCE_FLOOR: f64 = -6.0;

/// Guards bin boundaries against floating point misclassification.
const BIN_EPS: f64 = 1e-6;

/// Probability histogram averaged over the images merged into it.
///
/// Every merged image carries the same weight, independent of its size.
#[derive(Clone, Debug, PartialEq)]
pub struct RunningHistogram {
    values: Vec<f32>,
}

impl RunningHistogram {
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub(crate) fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn sum(&self) -> f32 {
        self.values.iter().sum()
    }

    /// Merge one image's normalized histogram. `prior_images` is the number of
    /// images already averaged in; the first merge copies `sample` verbatim.
    pub fn merge(&mut self, sample: &[f32], prior_images: usize) {
        debug_assert_eq!(sample.len(), self.values.len());
        if prior_images == 0 {
            self.values.copy_from_slice(sample);
            return;
        }
        let n = prior_images as f32;
        for (acc, &x) in self.values.iter_mut().zip(sample) {
            *acc = (n * *acc + x) / (n + 1.0);
        }
    }
}

/// Normalize raw counts by `total` into probabilities.
pub fn normalize_counts(counts: &[u64], total: usize) -> Vec<f32> {
    let total = total as f64;
    counts
        .iter()
        .map(|&c| (c as f64 / total) as f32)
        .collect()
}

/// Bin index of `variance` among `bins` log-spaced bins covering
/// `log10(variance) ∈ [−6, 0]`.
///
/// Variances at or below `1e-6` (including zero) fall into bin 0; values
/// above 1 are clamped into the top bin.
pub fn variance_bin(variance: f32, bins: usize) -> usize {
    debug_assert!(bins > 0);
    let log = (variance as f64).log10().max(LOG10_VARIANCE_FLOOR);
    let f = (log - LOG10_VARIANCE_FLOOR) / -LOG10_VARIANCE_FLOOR;
    let idx = (bins as f64 * f - BIN_EPS).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(bins - 1)
    }
}

/// Normalized variance histogram for one image.
pub fn variance_histogram(variances: &[f32], bins: usize) -> Vec<f32> {
    let mut counts = vec![0u64; bins];
    for &v in variances {
        counts[variance_bin(v, bins)] += 1;
    }
    normalize_counts(&counts, variances.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_merge_copies_then_averages_per_image() {
        let mut hist = RunningHistogram::new(3);
        hist.merge(&[1.0, 0.0, 0.0], 0);
        assert_eq!(hist.values(), &[1.0, 0.0, 0.0]);
        hist.merge(&[0.0, 1.0, 0.0], 1);
        assert_eq!(hist.values(), &[0.5, 0.5, 0.0]);
        hist.merge(&[0.0, 0.0, 1.0], 2);
        for (v, e) in hist.values().iter().zip([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]) {
            assert!((v - e).abs() < 1e-6);
        }
        assert!((hist.sum() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn variance_bins_are_log_spaced() {
        assert_eq!(variance_bin(0.0, 10), 0);
        assert_eq!(variance_bin(1e-9, 10), 0);
        assert_eq!(variance_bin(1e-6, 10), 0);
        // log10 = -3 sits in the middle of the range.
        assert_eq!(variance_bin(1e-3, 10), 4);
        assert_eq!(variance_bin(2e-3, 10), 5);
        assert_eq!(variance_bin(0.9, 10), 9);
        assert_eq!(variance_bin(1.0, 10), 9);
    }

    #[test]
    fn variance_above_one_is_clamped_to_top_bin() {
        assert_eq!(variance_bin(4.0, 10), 9);
        assert_eq!(variance_bin(1e6, 3), 2);
    }

    #[test]
    fn variance_histogram_is_normalized() {
        let h = variance_histogram(&[0.0, 0.0, 1e-3, 0.5], 6);
        assert_eq!(h.len(), 6);
        assert!((h.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((h[0] - 0.5).abs() < 1e-6);
    }
}
