//! LBP resolution parameters.
//!
//! A parameter set is a list of `(neighbors, radius, bins)` triples, each
//! describing one resolution of the joint LBP/variance model. Triples are
//! kept in a canonical order (descending neighbors, then radius, then bins)
//! so two sets built from the same triples in a different order compare
//! equal and serialize identically.
//!
//! The textual form is `"p/r/b:p/r/b:..."`.

use crate::error::{LbpError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Largest accepted neighbor count per resolution.
pub const MAX_NEIGHBORS: usize = 1024;

/// Largest accepted sampling radius in pixels.
pub const MAX_RADIUS: usize = 1 << 16;

/// One LBP resolution: `neighbors` samples on a circle of `radius` pixels,
/// and `bins` log-spaced variance bins (`0` disables variance modeling).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LbpTriple {
    pub neighbors: usize,
    pub radius: usize,
    pub bins: usize,
}

impl LbpTriple {
    pub fn new(neighbors: usize, radius: usize, bins: usize) -> Self {
        Self {
            neighbors,
            radius,
            bins,
        }
    }

    /// Number of distinct `riu2` codes: `neighbors + 2`.
    pub fn pattern_bins(&self) -> usize {
        self.neighbors + 2
    }

    pub fn has_variance(&self) -> bool {
        self.bins > 0
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(LbpError::invalid_parameters(format!(
                "neighbor count must be >= 1 in {self}"
            )));
        }
        if self.neighbors > MAX_NEIGHBORS {
            return Err(LbpError::invalid_parameters(format!(
                "neighbor count must be <= {MAX_NEIGHBORS} in {self}"
            )));
        }
        if self.radius == 0 {
            return Err(LbpError::invalid_parameters(format!(
                "radius must be >= 1 in {self}"
            )));
        }
        if self.radius > MAX_RADIUS {
            return Err(LbpError::invalid_parameters(format!(
                "radius must be <= {MAX_RADIUS} in {self}"
            )));
        }
        Ok(())
    }

    /// Canonical ordering key: descending neighbors, radius, bins.
    pub(crate) fn sort_key(&self) -> Reverse<(usize, usize, usize)> {
        Reverse((self.neighbors, self.radius, self.bins))
    }
}

impl fmt::Display for LbpTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.neighbors, self.radius, self.bins)
    }
}

impl FromStr for LbpTriple {
    type Err = LbpError;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split('/').collect();
        if fields.len() != 3 {
            return Err(LbpError::invalid_parameters(format!(
                "expected 3 '/'-separated fields in '{s}', found {}",
                fields.len()
            )));
        }
        let parse = |name: &str, field: &str| {
            field.trim().parse::<usize>().map_err(|_| {
                LbpError::invalid_parameters(format!(
                    "{name} '{field}' in '{s}' is not a non-negative integer"
                ))
            })
        };
        Ok(Self {
            neighbors: parse("neighbor count", fields[0])?,
            radius: parse("radius", fields[1])?,
            bins: parse("bin count", fields[2])?,
        })
    }
}

/// Canonically ordered set of LBP resolutions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<LbpTriple>", into = "Vec<LbpTriple>")]
pub struct LbpParameters {
    triples: Vec<LbpTriple>,
}

impl LbpParameters {
    /// Build from per-component arrays, which must have equal lengths.
    pub fn new(neighbors: &[usize], radii: &[usize], bins: &[usize]) -> Result<Self> {
        if neighbors.len() != radii.len() || neighbors.len() != bins.len() {
            return Err(LbpError::invalid_parameters(format!(
                "component arrays must have the same length (neighbors={}, radii={}, bins={})",
                neighbors.len(),
                radii.len(),
                bins.len()
            )));
        }
        let triples = neighbors
            .iter()
            .zip(radii)
            .zip(bins)
            .map(|((&p, &r), &b)| LbpTriple::new(p, r, b))
            .collect();
        Self::from_triples(triples)
    }

    /// Single-resolution parameter set.
    pub fn single(neighbors: usize, radius: usize, bins: usize) -> Result<Self> {
        Self::from_triples(vec![LbpTriple::new(neighbors, radius, bins)])
    }

    pub fn from_triples(mut triples: Vec<LbpTriple>) -> Result<Self> {
        if triples.is_empty() {
            return Err(LbpError::invalid_parameters(
                "at least one resolution is required",
            ));
        }
        for triple in &triples {
            triple.validate()?;
        }
        canonicalize(&mut triples);
        Ok(Self { triples })
    }

    /// Number of resolutions.
    pub fn size(&self) -> usize {
        self.triples.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LbpTriple> + '_ {
        self.triples.iter()
    }

    pub fn triples(&self) -> &[LbpTriple] {
        &self.triples
    }

    pub fn neighbors(&self) -> Vec<usize> {
        self.triples.iter().map(|t| t.neighbors).collect()
    }

    pub fn radii(&self) -> Vec<usize> {
        self.triples.iter().map(|t| t.radius).collect()
    }

    pub fn bins(&self) -> Vec<usize> {
        self.triples.iter().map(|t| t.bins).collect()
    }

    /// Largest radius; the image margin every resolution needs.
    pub fn max_radius(&self) -> usize {
        self.triples.iter().map(|t| t.radius).max().unwrap_or(0)
    }
}

impl Default for LbpParameters {
    /// Three resolutions `(8,1,10)`, `(16,2,10)`, `(24,3,10)`.
    fn default() -> Self {
        let mut triples = vec![
            LbpTriple::new(8, 1, 10),
            LbpTriple::new(16, 2, 10),
            LbpTriple::new(24, 3, 10),
        ];
        canonicalize(&mut triples);
        Self { triples }
    }
}

/// Smallest image side with at least one interior pixel: `2r + 1`.
/// `None` when that does not fit in `usize`.
pub(crate) fn min_image_side(radius: usize) -> Option<usize> {
    radius.checked_mul(2)?.checked_add(1)
}

/// Stable sort by `(neighbors, radius, bins)`, all descending.
pub(crate) fn canonicalize(triples: &mut [LbpTriple]) {
    triples.sort_by_key(LbpTriple::sort_key);
}

/// Parse the `"p/r/b:p/r/b"` form, keeping the order the triples appear in.
pub(crate) fn parse_triples(s: &str) -> Result<Vec<LbpTriple>> {
    s.trim().split(':').map(str::parse).collect()
}

impl fmt::Display for LbpParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, triple) in self.triples.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{triple}")?;
        }
        Ok(())
    }
}

impl FromStr for LbpParameters {
    type Err = LbpError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_triples(parse_triples(s)?)
    }
}

impl TryFrom<Vec<LbpTriple>> for LbpParameters {
    type Error = LbpError;

    fn try_from(triples: Vec<LbpTriple>) -> Result<Self> {
        Self::from_triples(triples)
    }
}

impl From<LbpParameters> for Vec<LbpTriple> {
    fn from(params: LbpParameters) -> Self {
        params.triples
    }
}
