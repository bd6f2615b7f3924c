//! JSON configuration for the `lbpdemo` tool.
//!
//! ```json
//! {
//!   "parameters": [
//!     { "neighbors": 8, "radius": 1, "bins": 10 },
//!     { "neighbors": 16, "radius": 2, "bins": 10 }
//!   ],
//!   "report_json": "out/report.json"
//! }
//! ```
//!
//! Every field is optional; missing parameters fall back to the default
//! three-resolution set.
use crate::error::{LbpError, Result};
use crate::params::LbpParameters;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Resolutions used when training a model.
    pub parameters: LbpParameters,
    /// Where to write the classification report, if anywhere.
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ToolConfig> {
    let data = fs::read_to_string(path).map_err(|e| LbpError::Config {
        path: path.to_path_buf(),
        reason: format!("failed to read: {e}"),
    })?;
    serde_json::from_str(&data).map_err(|e| LbpError::Config {
        path: path.to_path_buf(),
        reason: format!("failed to parse: {e}"),
    })
}
