//! Texture classification with rotation-invariant uniform local binary
//! patterns (LBP `riu2`) and local variance.
//!
//! A [`LbpModel`] accumulates, per resolution `(p, r, b)`, a histogram of
//! `riu2` codes and a log-spaced histogram of local variances over any
//! number of images. A sample model is classified by the candidate that
//! maximizes the log-likelihood style goodness of fit.

// Public modules
pub mod config;
pub mod error;
pub mod features;
pub mod image;
pub mod model;
pub mod params;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{LbpError, Result};
pub use crate::model::{Classification, LbpModel, SubModel};
pub use crate::params::{LbpParameters, LbpTriple};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lbp_texture::prelude::*;
///
/// # fn main() -> lbp_texture::Result<()> {
/// let (w, h) = (64usize, 64usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let class = LbpModel::from_image(LbpParameters::default(), &img)?;
/// let sample = LbpModel::from_image(class.parameters().clone(), &img)?;
/// println!("best={}", sample.classify(&[class])?);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{LbpModel, LbpParameters, LbpTriple};
}
