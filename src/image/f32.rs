//! Owned single-band f32 plane in row-major layout (stride == width).
//!
//! Samples are intensities normalized to `[0, 1]`; this is the plane the
//! feature extractor reads from.
use super::traits::{ImageView, Intensity};

#[derive(Clone, Debug)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Copy any single-band view into a normalized plane (`u8` samples are
    /// divided by 255).
    pub fn from_view<I>(view: &I) -> Self
    where
        I: ImageView,
        I::Pixel: Intensity,
    {
        let mut out = Self::new(view.width(), view.height());
        for (dst, src) in out.data.chunks_exact_mut(out.w.max(1)).zip(view.rows()) {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = s.normalized();
            }
        }
        out
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::ImageF32;
    use crate::image::ImageU8;

    #[test]
    fn from_view_normalizes_u8_samples_and_skips_padding() {
        let data = [0u8, 255, 99, 51, 0, 99];
        let view = ImageU8 {
            w: 2,
            h: 2,
            stride: 3,
            data: &data,
        };
        let plane = ImageF32::from_view(&view);
        assert_eq!((plane.w, plane.h), (2, 2));
        assert_eq!(plane.get(0, 0), 0.0);
        assert_eq!(plane.get(1, 0), 1.0);
        assert!((plane.get(0, 1) - 0.2).abs() < 1e-6);
        assert_eq!(plane.get(1, 1), 0.0);
    }

    #[test]
    fn from_view_handles_empty_images() {
        let view = ImageU8::packed(0, 0, &[]);
        let plane = ImageF32::from_view(&view);
        assert!(plane.data.is_empty());
    }
}
