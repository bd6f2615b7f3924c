#![allow(dead_code)]

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let cx = (x / cell) as i32;
            let cy = (y / cell) as i32;
            let sum = cx + cy;
            let val = if sum & 1 == 0 { 32u8 } else { 220u8 };
            img[y * width + x] = val;
        }
    }
    img
}

/// Uniform gray image.
pub fn constant_u8(width: usize, height: usize, value: u8) -> Vec<u8> {
    vec![value; width * height]
}

/// Deterministic xorshift32 byte stream.
pub struct XorShift(u32);

impl XorShift {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u8(&mut self) -> u8 {
        let mut s = self.0;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.0 = s;
        (s >> 24) as u8
    }
}

/// Per-pixel uniform white noise.
pub fn noise_u8(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut rng = XorShift::new(seed);
    (0..width * height).map(|_| rng.next_u8()).collect()
}

/// Smooth value noise: random levels on a coarse lattice of `step` pixels,
/// bilinearly interpolated in between.
pub fn value_noise_u8(width: usize, height: usize, step: usize, seed: u32) -> Vec<u8> {
    assert!(step > 0, "lattice step must be positive");
    let mut rng = XorShift::new(seed);
    let gw = width / step + 2;
    let gh = height / step + 2;
    let lattice: Vec<f32> = (0..gw * gh).map(|_| rng.next_u8() as f32).collect();
    let at = |i: usize, j: usize| lattice[j * gw + i];

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let (x0, y0) = (x / step, y / step);
            let fx = (x % step) as f32 / step as f32;
            let fy = (y % step) as f32 / step as f32;
            let top = at(x0, y0) + (at(x0 + 1, y0) - at(x0, y0)) * fx;
            let bottom = at(x0, y0 + 1) + (at(x0 + 1, y0 + 1) - at(x0, y0 + 1)) * fx;
            let v = top + (bottom - top) * fy;
            img[y * width + x] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    img
}
