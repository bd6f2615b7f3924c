//! Single-resolution texture model.
//!
//! Holds the `riu2` pattern histogram (`p + 2` cells) and, when `b > 0`, the
//! log-spaced local variance histogram (`b` cells) for one `(p, r, b)`
//! triple. Both are running averages over the incorporated images.
//!
//! Scoring is a log-likelihood style goodness of fit of a *sample* against a
//! *reference*: `Σ sample · ln(reference)` over the (joint) cells. Cells with
//! zero reference probability are skipped. The score is not symmetric.

use super::histogram::{normalize_counts, variance_histogram, RunningHistogram};
use crate::error::{LbpError, Result};
use crate::features::{lbp_riu2, local_variance, CircleSampler};
use crate::image::ImageF32;
use crate::params::{min_image_side, LbpTriple};
use log::{debug, warn};

/// Raw statistics of one image for one resolution.
#[derive(Clone, Debug)]
pub struct ImageStatistics {
    /// Count of interior pixels per `riu2` code (length `p + 2`).
    pub pattern_counts: Vec<u64>,
    /// Local variance per interior pixel; empty when `b == 0`.
    pub variances: Vec<f32>,
    /// Number of interior pixels visited.
    pub interior_pixels: usize,
}

/// Fails with [`LbpError::ImageTooSmall`] unless both sides are at least
/// `2 * radius + 1`.
pub(crate) fn check_margin(plane: &ImageF32, radius: usize) -> Result<()> {
    match min_image_side(radius) {
        Some(side) if plane.w >= side && plane.h >= side => Ok(()),
        _ => Err(LbpError::ImageTooSmall {
            width: plane.w,
            height: plane.h,
            radius,
        }),
    }
}

/// Compute the raw per-image statistics over every pixel at least `r` away
/// from the border.
pub fn image_statistics(
    triple: &LbpTriple,
    sampler: &CircleSampler,
    plane: &ImageF32,
) -> Result<ImageStatistics> {
    triple.validate()?;
    check_margin(plane, triple.radius)?;
    let r = triple.radius;
    let (w, h) = (plane.w, plane.h);
    let interior_pixels = (w - 2 * r) * (h - 2 * r);
    let mut pattern_counts = vec![0u64; triple.pattern_bins()];
    let mut variances = Vec::with_capacity(if triple.has_variance() {
        interior_pixels
    } else {
        0
    });
    let mut samples = vec![0.0f32; triple.neighbors];
    for y in r..h - r {
        for x in r..w - r {
            let center = plane.get(x, y);
            sampler.sample(plane, x, y, &mut samples);
            pattern_counts[lbp_riu2(center, &samples)] += 1;
            if triple.has_variance() {
                variances.push(local_variance(&samples));
            }
        }
    }
    Ok(ImageStatistics {
        pattern_counts,
        variances,
        interior_pixels,
    })
}

#[derive(Clone, Debug)]
pub struct SubModel {
    triple: LbpTriple,
    sampler: CircleSampler,
    pattern_hist: RunningHistogram,
    var_hist: Option<RunningHistogram>,
    image_count: usize,
}

impl SubModel {
    /// Empty sub-model for `triple`, which must come from a validated
    /// parameter set. Histogram lengths are fixed here.
    pub(crate) fn new(triple: LbpTriple) -> Self {
        Self {
            triple,
            sampler: CircleSampler::new(triple.neighbors, triple.radius),
            pattern_hist: RunningHistogram::new(triple.pattern_bins()),
            var_hist: triple
                .has_variance()
                .then(|| RunningHistogram::new(triple.bins)),
            image_count: 0,
        }
    }

    /// Rebuild a sub-model from persisted histograms.
    ///
    /// The stored layout carries no image count; the result counts as one
    /// image so it can serve as a sample or a reference.
    pub(crate) fn from_histograms(
        triple: LbpTriple,
        pattern: Vec<f32>,
        variance: Option<Vec<f32>>,
    ) -> Self {
        debug_assert_eq!(pattern.len(), triple.pattern_bins());
        debug_assert_eq!(variance.as_ref().map_or(0, Vec::len), triple.bins);
        Self {
            triple,
            sampler: CircleSampler::new(triple.neighbors, triple.radius),
            pattern_hist: RunningHistogram::from_values(pattern),
            var_hist: variance.map(RunningHistogram::from_values),
            image_count: 1,
        }
    }

    pub fn triple(&self) -> &LbpTriple {
        &self.triple
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    /// Pattern probabilities, `None` until an image has been incorporated.
    pub fn pattern_histogram(&self) -> Option<&[f32]> {
        (self.image_count > 0).then(|| self.pattern_hist.values())
    }

    /// Variance probabilities, `None` when `b == 0` or nothing is incorporated.
    pub fn variance_histogram(&self) -> Option<&[f32]> {
        if self.image_count == 0 {
            return None;
        }
        self.var_hist.as_ref().map(RunningHistogram::values)
    }

    /// Add one image to the running histograms.
    ///
    /// On error (image smaller than the sampling margin) the model is left
    /// unchanged.
    pub fn incorporate(&mut self, plane: &ImageF32) -> Result<()> {
        let stats = image_statistics(&self.triple, &self.sampler, plane)?;
        self.absorb(&stats);
        Ok(())
    }

    /// Merge precomputed statistics of one image.
    pub fn absorb(&mut self, stats: &ImageStatistics) {
        debug!(
            "incorporating image #{} into {} ({} interior pixels)",
            self.image_count + 1,
            self.triple,
            stats.interior_pixels
        );
        let probs = normalize_counts(&stats.pattern_counts, stats.interior_pixels);
        self.pattern_hist.merge(&probs, self.image_count);
        if let Some(var_hist) = self.var_hist.as_mut() {
            let out_of_range = stats.variances.iter().filter(|&&v| v > 1.0).count();
            if out_of_range > 0 {
                warn!(
                    "{out_of_range} local variances above 1 clamped into the top bin for {}; \
                     are the samples normalized?",
                    self.triple
                );
            }
            let hist = variance_histogram(&stats.variances, self.triple.bins);
            var_hist.merge(&hist, self.image_count);
        }
        self.image_count += 1;
    }

    /// Goodness of fit of `self` (the sample) given `reference`.
    ///
    /// Higher is better. Both sub-models must share `(p, r, b)` and hold data.
    pub fn goodness_of_fit(&self, reference: &SubModel) -> Result<f32> {
        if self.triple != reference.triple {
            return Err(LbpError::ParameterMismatch {
                sample: self.triple.to_string(),
                reference: reference.triple.to_string(),
            });
        }
        if self.image_count == 0 {
            return Err(LbpError::EmptySample);
        }
        if reference.image_count == 0 {
            return Err(LbpError::EmptyReference);
        }

        let sample_p = self.pattern_hist.values();
        let ref_p = reference.pattern_hist.values();
        let mut gof = 0.0f64;
        match (&self.var_hist, &reference.var_hist) {
            (Some(sample_v), Some(ref_v)) => {
                for (&sp, &rp) in sample_p.iter().zip(ref_p) {
                    for (&sv, &rv) in sample_v.values().iter().zip(ref_v.values()) {
                        let q = rp * rv;
                        if q > 0.0 {
                            gof += (sp * sv) as f64 * (q as f64).ln();
                        }
                    }
                }
            }
            _ => {
                for (&sp, &rp) in sample_p.iter().zip(ref_p) {
                    if rp > 0.0 {
                        gof += sp as f64 * (rp as f64).ln();
                    }
                }
            }
        }
        Ok(gof as f32)
    }
}
