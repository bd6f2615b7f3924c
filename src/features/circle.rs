//! Circular neighborhood sampling with bilinear interpolation.
//!
//! Neighbor `i` of `p` sits at angle `θ = i·2π/p` and is read at
//! `(x − r·sin θ, y + r·cos θ)`. The offsets depend only on `(p, r)` and are
//! computed once per resolution.
//!
//! No bounds checks are performed: callers keep the center at least `r`
//! pixels away from every image border.
use crate::image::ImageF32;

/// Fractional parts closer than this to an integer are snapped to it.
pub const SNAP_EPS: f32 = 1e-4;

/// Integer bounds and weight for one interpolation axis.
#[inline]
fn bracket(c: f32) -> (usize, usize, f32) {
    let rounded = c.round();
    if (c - rounded).abs() < SNAP_EPS {
        let i = rounded as usize;
        (i, i, 0.0)
    } else {
        let lo = c.floor();
        let i = lo as usize;
        (i, i + 1, c - lo)
    }
}

/// Bilinear interpolation of `plane` at fractional `(x, y)`.
///
/// Coordinates within [`SNAP_EPS`] of an integer collapse both bounding
/// samples onto that integer, so a neighbor lying exactly on a pixel never
/// touches the next row or column.
#[inline]
pub fn interpolate(plane: &ImageF32, x: f32, y: f32) -> f32 {
    let (x1, x2, fx) = bracket(x);
    let (y1, y2, fy) = bracket(y);
    let ll = plane.get(x1, y1);
    let ul = plane.get(x1, y2);
    let lr = plane.get(x2, y1);
    let ur = plane.get(x2, y2);
    // Lerp form: flat neighborhoods reproduce their value exactly.
    let lower = ll + (lr - ll) * fx;
    let upper = ul + (ur - ul) * fx;
    lower + (upper - lower) * fy
}

/// Precomputed sampling offsets for `neighbors` points on a circle.
#[derive(Clone, Debug)]
pub struct CircleSampler {
    offsets: Vec<[f32; 2]>,
}

impl CircleSampler {
    pub fn new(neighbors: usize, radius: usize) -> Self {
        let step = 2.0 * std::f64::consts::PI / neighbors as f64;
        let r = radius as f64;
        let offsets = (0..neighbors)
            .map(|i| {
                let theta = i as f64 * step;
                [(-r * theta.sin()) as f32, (r * theta.cos()) as f32]
            })
            .collect();
        Self { offsets }
    }

    pub fn offsets(&self) -> &[[f32; 2]] {
        &self.offsets
    }

    /// Fill `out` (length `neighbors`) with the circle samples around `(x, y)`.
    #[inline]
    pub fn sample(&self, plane: &ImageF32, x: usize, y: usize, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.offsets.len());
        let (cx, cy) = (x as f32, y as f32);
        for (dst, [dx, dy]) in out.iter_mut().zip(&self.offsets) {
            *dst = interpolate(plane, cx + dx, cy + dy);
        }
    }
}
