//! Line-oriented text layout of a trained model.
//!
//! ```text
//! 24/3/10:16/2/10:8/1/10          <- parameter set, canonical order
//! h0/h1/.../h25:v0/v1/.../v9      <- one line per sub-model, same order
//! ...
//! ```
//!
//! Each sub-model line holds the `p + 2` pattern probabilities, a `:`, and
//! the `b` variance probabilities (empty when `b == 0`).

use super::{LbpModel, SubModel};
use crate::error::{LbpError, Result};
use crate::image::io::ensure_parent_dir;
use crate::params::{parse_triples, LbpParameters, LbpTriple};
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

impl LbpModel {
    /// Render the persisted text form. Fails for a model without images.
    pub fn to_model_string(&self) -> Result<String> {
        let mut out = self.params.to_string();
        out.push('\n');
        for sub in &self.sub_models {
            let pattern = sub.pattern_histogram().ok_or(LbpError::EmptyReference)?;
            out.push_str(&join(pattern));
            out.push(':');
            if let Some(variance) = sub.variance_histogram() {
                out.push_str(&join(variance));
            }
            out.push('\n');
        }
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        out.write_all(self.to_model_string()?.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Parse the persisted text form.
    ///
    /// Histogram lines are paired with the triples in the order the first
    /// line lists them and then canonicalized together, so files written
    /// with a different triple order still load correctly.
    pub fn read_from<R: BufRead>(input: R) -> Result<Self> {
        let mut lines = input.lines();
        let header = next_line(&mut lines, 1)?
            .ok_or_else(|| LbpError::invalid_model(1, "missing parameter line"))?;
        let file_order =
            parse_triples(&header).map_err(|e| LbpError::invalid_model(1, e.to_string()))?;
        let params = LbpParameters::from_triples(file_order.clone())
            .map_err(|e| LbpError::invalid_model(1, e.to_string()))?;

        let mut sub_models = Vec::with_capacity(file_order.len());
        for (i, triple) in file_order.iter().enumerate() {
            let line_no = i + 2;
            let line = next_line(&mut lines, line_no)?.ok_or_else(|| {
                LbpError::invalid_model(line_no, format!("missing histograms for {triple}"))
            })?;
            sub_models.push(parse_sub_model(*triple, &line, line_no)?);
        }
        for (line, line_no) in lines.zip(file_order.len() + 2..) {
            if !decode_line(line, line_no)?.trim().is_empty() {
                return Err(LbpError::invalid_model(
                    line_no,
                    "unexpected content after the last sub-model",
                ));
            }
        }

        // Same stable key as the parameter set, so both end up aligned.
        sub_models.sort_by_key(|s| s.triple().sort_key());

        Ok(Self { params, sub_models })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        debug!("saved model {} to {}", self.params, path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let model = Self::read_from(BufReader::new(file))?;
        debug!("loaded model {} from {}", model.params, path.display());
        Ok(model)
    }
}

impl FromStr for LbpModel {
    type Err = LbpError;

    fn from_str(s: &str) -> Result<Self> {
        Self::read_from(s.as_bytes())
    }
}

/// `/`-joined values, each in the shortest form that parses back to the
/// same `f32`.
fn join(values: &[f32]) -> String {
    values
        .iter()
        .map(f32::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// Undecodable text is a model error at `line_no`; other failures stay I/O.
fn decode_line(line: io::Result<String>, line_no: usize) -> Result<String> {
    line.map_err(|err| match err.kind() {
        io::ErrorKind::InvalidData => LbpError::invalid_model(line_no, "not valid UTF-8"),
        _ => err.into(),
    })
}

fn next_line<R: BufRead>(lines: &mut io::Lines<R>, line_no: usize) -> Result<Option<String>> {
    lines.next().map(|line| decode_line(line, line_no)).transpose()
}

fn parse_histogram(
    segment: &str,
    expected: usize,
    what: &str,
    triple: &LbpTriple,
    line_no: usize,
) -> Result<Vec<f32>> {
    let fields: Vec<&str> = segment.split('/').collect();
    if fields.len() != expected {
        return Err(LbpError::invalid_model(
            line_no,
            format!(
                "{what} histogram for {triple} needs {expected} values, found {}",
                fields.len()
            ),
        ));
    }
    fields
        .iter()
        .map(|field| {
            let field = field.trim();
            match field.parse::<f32>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
                _ => Err(LbpError::invalid_model(
                    line_no,
                    format!("{what} value '{field}' is not a non-negative number"),
                )),
            }
        })
        .collect()
}

fn parse_sub_model(triple: LbpTriple, line: &str, line_no: usize) -> Result<SubModel> {
    let segments: Vec<&str> = line.trim_end().split(':').collect();
    if segments.len() != 2 {
        return Err(LbpError::invalid_model(
            line_no,
            format!(
                "expected 'pattern:variance' segments, found {}",
                segments.len()
            ),
        ));
    }
    let pattern = parse_histogram(segments[0], triple.pattern_bins(), "pattern", &triple, line_no)?;
    let variance = if triple.has_variance() {
        Some(parse_histogram(
            segments[1],
            triple.bins,
            "variance",
            &triple,
            line_no,
        )?)
    } else {
        if !segments[1].trim().is_empty() {
            return Err(LbpError::invalid_model(
                line_no,
                format!("{triple} has no variance bins but the line carries some"),
            ));
        }
        None
    };
    Ok(SubModel::from_histograms(triple, pattern, variance))
}
