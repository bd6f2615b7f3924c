//! Multi-resolution texture model.
//!
//! An [`LbpModel`] owns a canonical [`LbpParameters`] set and one
//! [`SubModel`] per triple. Images are fanned out to every sub-model; scores
//! are summed across resolutions. A model is either a trained class (many
//! images) or a sample to classify (usually one image).

pub mod histogram;
pub mod persist;
pub mod submodel;

pub use self::histogram::RunningHistogram;
pub use self::submodel::{image_statistics, ImageStatistics, SubModel};

use crate::error::{LbpError, Result};
use crate::image::io::{GrayImageU8, ImageFiles};
use crate::image::{ImageF32, ImageView, Intensity};
use crate::params::LbpParameters;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;

/// Scores of one sample against a list of candidates.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Index of the best scoring candidate (first one on ties).
    pub best: usize,
    /// Goodness of fit against each candidate, in candidate order.
    pub scores: Vec<f32>,
}

#[derive(Clone, Debug)]
pub struct LbpModel {
    params: LbpParameters,
    sub_models: Vec<SubModel>,
}

impl LbpModel {
    /// Empty model; incorporate images before scoring.
    pub fn new(params: LbpParameters) -> Self {
        let sub_models = params.iter().copied().map(SubModel::new).collect();
        Self { params, sub_models }
    }

    /// Build a model from a sequence of images, consumed one at a time.
    pub fn from_images<I, V>(params: LbpParameters, images: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: ImageView,
        V::Pixel: Intensity,
    {
        let mut model = Self::new(params);
        for image in images {
            model.incorporate(&image)?;
        }
        Ok(model)
    }

    /// Model of a single image, typically a sample to classify.
    pub fn from_image<V>(params: LbpParameters, image: &V) -> Result<Self>
    where
        V: ImageView,
        V::Pixel: Intensity,
    {
        let mut model = Self::new(params);
        model.incorporate(image)?;
        Ok(model)
    }

    /// Build a model from image files. Files are decoded lazily so only one
    /// image is resident at a time.
    pub fn from_files<P: AsRef<Path>>(
        params: LbpParameters,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        let mut model = Self::new(params);
        for image in ImageFiles::new(paths) {
            model.incorporate_gray(&image?)?;
        }
        Ok(model)
    }

    /// Model of a single image file.
    pub fn from_file(params: LbpParameters, path: &Path) -> Result<Self> {
        Self::from_files(params, [path])
    }

    pub fn parameters(&self) -> &LbpParameters {
        &self.params
    }

    pub fn sub_models(&self) -> &[SubModel] {
        &self.sub_models
    }

    /// Number of images incorporated (identical across sub-models).
    pub fn image_count(&self) -> usize {
        self.sub_models
            .first()
            .map_or(0, SubModel::image_count)
    }

    /// Incorporate a single-band image of any supported sample type.
    pub fn incorporate<V>(&mut self, image: &V) -> Result<()>
    where
        V: ImageView,
        V::Pixel: Intensity,
    {
        let plane = ImageF32::from_view(image);
        self.incorporate_plane(&plane)
    }

    /// Decode `path` and incorporate it.
    pub fn incorporate_file(&mut self, path: &Path) -> Result<()> {
        let gray = crate::image::io::load_grayscale_image(path)?;
        self.incorporate_gray(&gray)
    }

    fn incorporate_gray(&mut self, gray: &GrayImageU8) -> Result<()> {
        self.incorporate(&gray.as_view())
    }

    /// Incorporate an already normalized plane into every sub-model.
    ///
    /// The image must leave room for the largest radius; otherwise nothing
    /// is modified.
    pub fn incorporate_plane(&mut self, plane: &ImageF32) -> Result<()> {
        submodel::check_margin(plane, self.params.max_radius())?;
        debug!(
            "incorporating {}x{} image into model {}",
            plane.w, plane.h, self.params
        );
        self.fan_out(plane)
    }

    #[cfg(feature = "parallel")]
    fn fan_out(&mut self, plane: &ImageF32) -> Result<()> {
        use rayon::prelude::*;

        self.sub_models
            .par_iter_mut()
            .try_for_each(|sub| sub.incorporate(plane))
    }

    #[cfg(not(feature = "parallel"))]
    fn fan_out(&mut self, plane: &ImageF32) -> Result<()> {
        for sub in &mut self.sub_models {
            sub.incorporate(plane)?;
        }
        Ok(())
    }

    /// Sum of the per-resolution goodness of fit of `self` (the sample)
    /// given `reference`.
    pub fn goodness_of_fit(&self, reference: &LbpModel) -> Result<f32> {
        if self.sub_models.len() != reference.sub_models.len() {
            return Err(LbpError::ParameterMismatch {
                sample: self.params.to_string(),
                reference: reference.params.to_string(),
            });
        }
        let mut gof = 0.0f32;
        for (sample, model) in self.sub_models.iter().zip(&reference.sub_models) {
            gof += sample.goodness_of_fit(model)?;
        }
        Ok(gof)
    }

    /// Score against every candidate and pick the best fit.
    pub fn score_candidates(&self, candidates: &[LbpModel]) -> Result<Classification> {
        if candidates.is_empty() {
            return Err(LbpError::NoCandidates);
        }
        let mut best = 0;
        let mut max_gof = f32::NEG_INFINITY;
        let mut scores = Vec::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            let gof = self.goodness_of_fit(candidate)?;
            debug!("candidate {i}: goodness of fit {gof}");
            if gof > max_gof {
                max_gof = gof;
                best = i;
            }
            scores.push(gof);
        }
        info!(
            "best of {} candidates: #{best} (score {max_gof})",
            candidates.len()
        );
        Ok(Classification { best, scores })
    }

    /// Index of the candidate that fits `self` best.
    pub fn classify(&self, candidates: &[LbpModel]) -> Result<usize> {
        self.score_candidates(candidates).map(|c| c.best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageU8;
    use crate::params::LbpTriple;

    fn stripes(w: usize, h: usize, period: usize) -> Vec<u8> {
        (0..w * h)
            .map(|i| if (i % w / period) % 2 == 0 { 30 } else { 220 })
            .collect()
    }

    fn two_resolutions() -> LbpParameters {
        LbpParameters::new(&[8, 16], &[1, 2], &[0, 6]).unwrap()
    }

    #[test]
    fn sub_models_follow_canonical_order() {
        let model = LbpModel::new(two_resolutions());
        let triples: Vec<LbpTriple> = model.sub_models().iter().map(|s| *s.triple()).collect();
        assert_eq!(triples, model.parameters().triples());
        assert_eq!(triples[0], LbpTriple::new(16, 2, 6));
        assert_eq!(model.image_count(), 0);
    }

    #[test]
    fn incorporate_fans_out_to_every_resolution() {
        let data = stripes(24, 20, 3);
        let view = ImageU8::packed(24, 20, &data);
        let model = LbpModel::from_images(two_resolutions(), [view.clone(), view]).unwrap();
        assert_eq!(model.image_count(), 2);
        for sub in model.sub_models() {
            assert_eq!(sub.image_count(), 2);
            let sum: f32 = sub.pattern_histogram().unwrap().iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn too_small_for_largest_radius_leaves_model_untouched() {
        let data = vec![0u8; 4 * 4];
        let mut model = LbpModel::new(two_resolutions());
        let err = model.incorporate(&ImageU8::packed(4, 4, &data)).unwrap_err();
        assert!(matches!(err, LbpError::ImageTooSmall { radius: 2, .. }));
        assert!(model.sub_models().iter().all(|s| s.image_count() == 0));
    }

    #[test]
    fn goodness_of_fit_sums_sub_model_scores() {
        let data = stripes(20, 20, 2);
        let view = ImageU8::packed(20, 20, &data);
        let model = LbpModel::from_image(two_resolutions(), &view).unwrap();
        let total = model.goodness_of_fit(&model).unwrap();
        let parts: f32 = model
            .sub_models()
            .iter()
            .map(|s| s.goodness_of_fit(s).unwrap())
            .sum();
        assert!((total - parts).abs() < 1e-6);
        assert!(total <= 0.0);
    }

    #[test]
    fn mismatched_model_shapes_are_rejected() {
        let data = stripes(20, 20, 2);
        let view = ImageU8::packed(20, 20, &data);
        let a = LbpModel::from_image(two_resolutions(), &view).unwrap();
        let b = LbpModel::from_image(LbpParameters::single(8, 1, 0).unwrap(), &view).unwrap();
        assert!(matches!(
            a.goodness_of_fit(&b),
            Err(LbpError::ParameterMismatch { .. })
        ));
    }

    #[test]
    fn ties_resolve_to_the_first_candidate() {
        let data = stripes(20, 20, 2);
        let view = ImageU8::packed(20, 20, &data);
        let sample = LbpModel::from_image(two_resolutions(), &view).unwrap();
        let candidates = vec![sample.clone(), sample.clone(), sample.clone()];
        let result = sample.score_candidates(&candidates).unwrap();
        assert_eq!(result.best, 0);
        assert_eq!(result.scores.len(), 3);
        assert!(matches!(sample.classify(&[]), Err(LbpError::NoCandidates)));
    }

    #[test]
    fn empty_sample_cannot_be_classified() {
        let data = stripes(20, 20, 2);
        let view = ImageU8::packed(20, 20, &data);
        let trained = LbpModel::from_image(two_resolutions(), &view).unwrap();
        let empty = LbpModel::new(two_resolutions());
        assert!(matches!(
            empty.classify(std::slice::from_ref(&trained)),
            Err(LbpError::EmptySample)
        ));
    }
}
