//! Per-pixel texture descriptors: the uniform rotation-invariant LBP code
//! (`riu2`) and the local variance of the circle samples.

/// Uniform rotation-invariant LBP code for `center` and its circle samples.
///
/// Each neighbor contributes the sign bit `neighbor − center ≥ 0`. When the
/// circular bit string has at most two transitions the code is the number of
/// set bits (`0..=p`); every other pattern maps to `p + 1`.
pub fn lbp_riu2(center: f32, neighbors: &[f32]) -> usize {
    let p = neighbors.len();
    let bit = |i: usize| neighbors[i] - center >= 0.0;
    let mut transitions = 0;
    let mut ones = 0;
    for i in 0..p {
        let s = bit(i);
        if s != bit((i + 1) % p) {
            transitions += 1;
        }
        ones += usize::from(s);
    }
    if transitions <= 2 {
        ones
    } else {
        p + 1
    }
}

/// Population variance of the circle samples (order independent).
pub fn local_variance(neighbors: &[f32]) -> f32 {
    if neighbors.is_empty() {
        return 0.0;
    }
    let n = neighbors.len() as f32;
    let mean = neighbors.iter().sum::<f32>() / n;
    neighbors.iter().map(|g| (g - mean) * (g - mean)).sum::<f32>() / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_signs(signs: &[u8]) -> Vec<f32> {
        signs
            .iter()
            .map(|&s| if s == 1 { 0.75 } else { 0.25 })
            .collect()
    }

    #[test]
    fn all_neighbors_darker_is_code_zero() {
        assert_eq!(lbp_riu2(0.5, &from_signs(&[0; 8])), 0);
    }

    #[test]
    fn alternating_signs_are_non_uniform() {
        let g = from_signs(&[1, 0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(lbp_riu2(0.5, &g), 9);
    }

    #[test]
    fn equal_neighbor_counts_as_set_bit() {
        assert_eq!(lbp_riu2(0.5, &[0.5; 8]), 8);
    }

    #[test]
    fn uniform_code_counts_set_bits_regardless_of_rotation() {
        let a = from_signs(&[1, 1, 1, 0, 0, 0, 0, 0]);
        let b = from_signs(&[0, 0, 0, 0, 0, 1, 1, 1]);
        let c = from_signs(&[1, 0, 0, 0, 0, 0, 1, 1]);
        assert_eq!(lbp_riu2(0.5, &a), 3);
        assert_eq!(lbp_riu2(0.5, &b), 3);
        assert_eq!(lbp_riu2(0.5, &c), 3);
    }

    #[test]
    fn four_transitions_fall_into_the_non_uniform_bucket() {
        let g = from_signs(&[1, 1, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(lbp_riu2(0.5, &g), 17);
    }

    #[test]
    fn variance_ignores_neighbor_order() {
        let g = [0.1, 0.4, 0.4, 0.9];
        let mut rotated = g;
        rotated.rotate_left(1);
        let v = local_variance(&g);
        assert!((v - local_variance(&rotated)).abs() < 1e-7);
        assert!((v - 0.0825).abs() < 1e-6, "v={v}");
        assert_eq!(local_variance(&[0.5; 8]), 0.0);
    }
}
